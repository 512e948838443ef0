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

//! HAL document conventions.
//!
//! A HAL resource is a JSON object whose links live under `_links` and whose
//! inlined sub-resources live under `_embedded`, both keyed by relation name:
//!
//! ```json
//! {
//!   "creditLimit": 2000.0,
//!   "_links": { "type": { "href": "http://localhost:8080/accountTypes/1" } }
//! }
//! ```
//!
//! Documents are kept as [`serde_json::Value`] and inspected with the helpers
//! here rather than being mapped onto fixed structs, because whether a
//! relation is embedded or linked depends on the server.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Media type for HAL responses.
pub const MEDIA_TYPE: &str = "application/hal+json";

/// Reserved property holding link objects.
pub const LINKS: &str = "_links";

/// Reserved property holding embedded resources.
pub const EMBEDDED: &str = "_embedded";

/// Relation naming the resource itself.
pub const SELF_REL: &str = "self";

/// A HAL link object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: false,
        }
    }

    /// Returns the URI to request.
    ///
    /// Templated hrefs are expanded with no variables bound, which for the
    /// RFC 6570 forms servers emit (`{?page,size}`, `{/id}`) means dropping
    /// every expression.
    pub fn target(&self) -> String {
        if !self.templated {
            return self.href.clone();
        }

        let mut out = String::with_capacity(self.href.len());
        let mut depth = 0usize;
        for c in self.href.chars() {
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                _ if depth == 0 => out.push(c),
                _ => {}
            }
        }
        out
    }
}

/// Looks up the link for `rel` in the document's `_links`.
///
/// When the relation holds an array of links the first one wins. Returns
/// `None` if the relation is absent or not a link object.
pub fn link(doc: &Value, rel: &str) -> Option<Link> {
    let entry = doc.get(LINKS)?.get(rel)?;
    let entry = match entry {
        Value::Array(items) => items.first()?,
        other => other,
    };
    serde_json::from_value(entry.clone()).ok()
}

/// Returns the `_embedded` resource for `rel`, if any.
pub fn embedded<'a>(doc: &'a Value, rel: &str) -> Option<&'a Value> {
    doc.get(EMBEDDED)?.get(rel)
}

/// The resource's own URI, if it advertises one.
pub fn self_href(doc: &Value) -> Option<String> {
    link(doc, SELF_REL).map(|l| l.target())
}

/// Builds a `_links` object from `(rel, href)` pairs.
pub fn links<'a, I>(pairs: I) -> Value
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let map: Map<String, Value> = pairs
        .into_iter()
        .map(|(rel, href)| (rel.to_string(), serde_json::json!({ "href": href })))
        .collect();
    Value::Object(map)
}
