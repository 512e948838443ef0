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

//! Association resolution.
//!
//! An association field on a HAL resource arrives in one of three shapes:
//!
//! | Shape | Example | Network |
//! |-------|---------|---------|
//! | Inline object | `"type": {"name": "PlatyPlus"}` | none |
//! | HAL embedded | `"_embedded": {"type": {...}}` | none |
//! | Link only | `"_links": {"type": {"href": "..."}}` | one GET |
//!
//! [`AssociationResolver`] turns any of them into the associated document.
//! Resolution is explicit: callers name each field they want resolved.

use crate::error::{FetchError, LinkResolutionError};
use crate::fetch::Fetch;
use crate::hal;
use serde_json::Value;
use tracing::debug;

/// Names an association field on a fetched resource.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor<'a> {
    /// The document carrying the field.
    pub resource: &'a Value,
    /// Field / relation name, e.g. `"type"`.
    pub name: &'a str,
    /// URI the document was fetched from, used when reporting failures.
    pub origin: &'a str,
}

impl<'a> FieldDescriptor<'a> {
    pub fn new(resource: &'a Value, name: &'a str, origin: &'a str) -> Self {
        Self {
            resource,
            name,
            origin,
        }
    }

    /// Returns the representation already present in the document.
    pub fn embedded(&self) -> Option<&'a Value> {
        self.resource
            .get(self.name)
            .filter(|v| v.is_object())
            .or_else(|| hal::embedded(self.resource, self.name).filter(|v| v.is_object()))
    }

    /// URI the association would be fetched from.
    pub fn link_target(&self) -> Option<String> {
        hal::link(self.resource, self.name).map(|l| l.target())
    }
}

/// Produces the full representation of an association field.
pub trait AssociationResolver {
    fn resolve(&self, field: &FieldDescriptor<'_>) -> Result<Value, LinkResolutionError>;
}

/// Resolves associations by reading embedded data or following links.
///
/// Nothing is cached: resolving the same link twice issues two requests.
#[derive(Debug, Clone)]
pub struct LinkResolver<F> {
    fetcher: F,
}

impl<F: Fetch> LinkResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl<F: Fetch> AssociationResolver for LinkResolver<F> {
    fn resolve(&self, field: &FieldDescriptor<'_>) -> Result<Value, LinkResolutionError> {
        if let Some(doc) = field.embedded() {
            debug!(field = field.name, origin = field.origin, "association embedded");
            return Ok(doc.clone());
        }

        let Some(target) = field.link_target() else {
            return Err(LinkResolutionError::new(
                field.origin,
                FetchError::decode(field.origin, field.name, "neither embedded nor linked"),
            ));
        };

        debug!(field = field.name, uri = %target, "following association link");
        let doc = self
            .fetcher
            .get_json(&target)
            .map_err(|cause| LinkResolutionError::new(target.clone(), cause))?;

        if !doc.is_object() {
            return Err(LinkResolutionError::new(
                target.clone(),
                FetchError::decode(target, field.name, "expected a JSON object"),
            ));
        }
        Ok(doc)
    }
}

/// Resolves `field` and decodes the result.
///
/// Decode failures are reported against the followed link, or the origin
/// document when the association was embedded.
pub fn resolve_with<R, T, D>(
    resolver: &R,
    field: &FieldDescriptor<'_>,
    decode: D,
) -> Result<T, LinkResolutionError>
where
    R: AssociationResolver + ?Sized,
    D: FnOnce(&Value, &str) -> Result<T, FetchError>,
{
    let doc = resolver.resolve(field)?;
    let uri = match field.embedded() {
        Some(_) => field.origin.to_string(),
        None => field.link_target().unwrap_or_else(|| field.origin.to_string()),
    };
    decode(&doc, &uri).map_err(|cause| LinkResolutionError::new(uri, cause))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFetcher;
    use crate::model::AccountType;
    use serde_json::json;

    const ORIGIN: &str = "http://h/customers/1";
    const TYPE_URI: &str = "http://h/accountTypes/1";

    fn linked_account() -> Value {
        json!({ "creditLimit": 2000.0, "_links": { "type": { "href": TYPE_URI } } })
    }

    #[test]
    fn inline_object_needs_no_request() {
        let fetcher = MockFetcher::new();
        let resolver = LinkResolver::new(&fetcher);
        let account = json!({
            "creditLimit": 2000.0,
            "type": { "name": "Aardvantage" },
            "_links": { "type": { "href": TYPE_URI } }
        });

        let doc = resolver
            .resolve(&FieldDescriptor::new(&account, "type", ORIGIN))
            .unwrap();

        assert_eq!(doc["name"], "Aardvantage");
        assert!(fetcher.calls().is_empty());
    }

    #[test]
    fn hal_embedded_needs_no_request() {
        let fetcher = MockFetcher::new();
        let resolver = LinkResolver::new(&fetcher);
        let account = json!({
            "creditLimit": 1000.0,
            "_embedded": { "type": { "name": "PlatyPlus" } },
            "_links": { "type": { "href": TYPE_URI } }
        });

        let doc = resolver
            .resolve(&FieldDescriptor::new(&account, "type", ORIGIN))
            .unwrap();

        assert_eq!(doc["name"], "PlatyPlus");
        assert!(fetcher.calls().is_empty());
    }

    #[test]
    fn link_is_followed_exactly_once() {
        let fetcher =
            MockFetcher::new().with_document(TYPE_URI, json!({ "name": "Aardvantage" }));
        let resolver = LinkResolver::new(&fetcher);
        let account = linked_account();

        let doc = resolver
            .resolve(&FieldDescriptor::new(&account, "type", ORIGIN))
            .unwrap();

        assert_eq!(doc["name"], "Aardvantage");
        assert_eq!(fetcher.calls(), vec![TYPE_URI.to_string()]);
    }

    #[test]
    fn repeated_resolution_is_not_cached() {
        let fetcher =
            MockFetcher::new().with_document(TYPE_URI, json!({ "name": "Aardvantage" }));
        let resolver = LinkResolver::new(&fetcher);
        let account = linked_account();
        let field = FieldDescriptor::new(&account, "type", ORIGIN);

        let first = resolver.resolve(&field).unwrap();
        let second = resolver.resolve(&field).unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls_to(TYPE_URI), 2);
    }

    #[test]
    fn templated_link_is_expanded_before_request() {
        let fetcher = MockFetcher::new().with_document(TYPE_URI, json!({ "name": "PlatyPlus" }));
        let resolver = LinkResolver::new(&fetcher);
        let account = json!({
            "_links": { "type": { "href": "http://h/accountTypes/1{?projection}", "templated": true } }
        });

        resolver
            .resolve(&FieldDescriptor::new(&account, "type", ORIGIN))
            .unwrap();

        assert_eq!(fetcher.calls(), vec![TYPE_URI.to_string()]);
    }

    #[test]
    fn not_found_carries_link_uri() {
        let fetcher = MockFetcher::new().with_status(TYPE_URI, 404);
        let resolver = LinkResolver::new(&fetcher);
        let account = linked_account();

        let err = resolver
            .resolve(&FieldDescriptor::new(&account, "type", ORIGIN))
            .unwrap_err();

        assert_eq!(err.uri, TYPE_URI);
        assert!(matches!(err.cause, FetchError::NotFound { .. }));
    }

    #[test]
    fn transport_and_malformed_failures_propagate() {
        let account = linked_account();
        let field = FieldDescriptor::new(&account, "type", ORIGIN);

        let down = MockFetcher::new().with_transport_error(TYPE_URI, "connection refused");
        let err = LinkResolver::new(&down).resolve(&field).unwrap_err();
        assert!(matches!(err.cause, FetchError::Transport { .. }));

        let garbled = MockFetcher::new().with_malformed_body(TYPE_URI, "<html>");
        let err = LinkResolver::new(&garbled).resolve(&field).unwrap_err();
        assert!(matches!(err.cause, FetchError::Decode { .. }));

        let scalar = MockFetcher::new().with_document(TYPE_URI, json!("Aardvantage"));
        let err = LinkResolver::new(&scalar).resolve(&field).unwrap_err();
        assert!(matches!(err.cause, FetchError::Decode { .. }));
    }

    #[test]
    fn missing_association_is_an_error() {
        let fetcher = MockFetcher::new();
        let resolver = LinkResolver::new(&fetcher);
        let account = json!({ "creditLimit": 5, "_links": {} });

        let err = resolver
            .resolve(&FieldDescriptor::new(&account, "type", ORIGIN))
            .unwrap_err();

        assert_eq!(err.uri, ORIGIN);
        assert!(matches!(err.cause, FetchError::Decode { ref field, .. } if field == "type"));
        assert!(fetcher.calls().is_empty());
    }

    #[test]
    fn resolve_with_reports_decode_errors_against_link() {
        let fetcher = MockFetcher::new().with_document(TYPE_URI, json!({ "title": "oops" }));
        let resolver = LinkResolver::new(&fetcher);
        let account = linked_account();

        let err = resolve_with(
            &resolver,
            &FieldDescriptor::new(&account, "type", ORIGIN),
            AccountType::from_document,
        )
        .unwrap_err();

        assert_eq!(err.uri, TYPE_URI);
        assert!(matches!(err.cause, FetchError::Decode { ref field, .. } if field == "name"));
    }
}
