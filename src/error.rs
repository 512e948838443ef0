// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for fetching HAL resources and resolving their associations.

use thiserror::Error;

/// Boxed cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to fetch and decode a single HAL document.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server answered 404
    #[error("resource not found: {uri}")]
    NotFound { uri: String },

    /// The server answered with any other non-2xx status
    #[error("unexpected HTTP status {status} from {uri}")]
    Status { uri: String, status: u16 },

    /// Connection refused, timeout, DNS failure and the like
    #[error("transport error requesting {uri}: {source}")]
    Transport {
        uri: String,
        #[source]
        source: BoxError,
    },

    /// Body is not JSON or does not have the expected shape
    #[error("cannot decode field `{field}` of {uri}: {message}")]
    Decode {
        uri: String,
        field: String,
        message: String,
    },
}

impl FetchError {
    /// URI of the request that failed.
    pub fn uri(&self) -> &str {
        match self {
            Self::NotFound { uri }
            | Self::Status { uri, .. }
            | Self::Transport { uri, .. }
            | Self::Decode { uri, .. } => uri,
        }
    }

    pub(crate) fn decode(
        uri: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Decode {
            uri: uri.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure to resolve an association field to its full representation.
///
/// `uri` is the link that was followed, or the URI of the document holding
/// the field when there was no usable link at all.
#[derive(Error, Debug)]
#[error("cannot resolve link {uri}: {cause}")]
pub struct LinkResolutionError {
    pub uri: String,
    #[source]
    pub cause: FetchError,
}

impl LinkResolutionError {
    pub fn new(uri: impl Into<String>, cause: FetchError) -> Self {
        Self {
            uri: uri.into(),
            cause,
        }
    }
}

/// Any failure while loading and rendering a customer.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The customer document or its accounts collection could not be loaded
    #[error("failed to load customer: {0}")]
    Customer(#[from] FetchError),

    /// An account association could not be resolved
    #[error(transparent)]
    Link(#[from] LinkResolutionError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            FetchError::NotFound {
                uri: "http://localhost:8080/accountTypes/9".to_string()
            }
            .to_string(),
            "resource not found: http://localhost:8080/accountTypes/9"
        );
        assert_eq!(
            FetchError::Status {
                uri: "http://h/x".to_string(),
                status: 503
            }
            .to_string(),
            "unexpected HTTP status 503 from http://h/x"
        );
        assert_eq!(
            FetchError::decode("http://h/x", "creditLimit", "expected a decimal").to_string(),
            "cannot decode field `creditLimit` of http://h/x: expected a decimal"
        );
    }

    #[test]
    fn transport_message_names_target() {
        let err = FetchError::Transport {
            uri: "http://nowhere:1/customers/1".to_string(),
            source: "connection refused".into(),
        };
        assert!(err.to_string().contains("http://nowhere:1/customers/1"));
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.uri(), "http://nowhere:1/customers/1");
    }

    #[test]
    fn link_error_carries_uri_and_cause() {
        let err = LinkResolutionError::new(
            "http://h/accountTypes/1",
            FetchError::NotFound {
                uri: "http://h/accountTypes/1".to_string(),
            },
        );
        assert_eq!(err.uri, "http://h/accountTypes/1");
        assert!(matches!(err.cause, FetchError::NotFound { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn client_error_wraps_both_kinds() {
        let customer: ClientError = FetchError::NotFound {
            uri: "http://h/customers/2".to_string(),
        }
        .into();
        assert_eq!(
            customer.to_string(),
            "failed to load customer: resource not found: http://h/customers/2"
        );

        let link: ClientError = LinkResolutionError::new(
            "http://h/t",
            FetchError::Status {
                uri: "http://h/t".to_string(),
                status: 500,
            },
        )
        .into();
        assert_eq!(
            link.to_string(),
            "cannot resolve link http://h/t: unexpected HTTP status 500 from http://h/t"
        );
    }
}
