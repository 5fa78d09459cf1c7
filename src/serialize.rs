//! Rendering of the document model to the json-home wire format.
//!
//! ```json
//! {
//!   "resources": {
//!     "http://example.org/rel/product": {
//!       "href-template": "http://example.org/products/{productId}",
//!       "href-vars": { "productId": "http://example.org/rel/product#productId" },
//!       "hints": { "allow": ["GET", "PUT"], "representations": ["application/json"] }
//!     }
//!   }
//! }
//! ```
//!
//! Empty hint fields are omitted, `status` is omitted for current resources and
//! `docs` renders the documentation link.
//!
//! The wire format has no place for description lines or the HTML of markdown
//! includes. [`docs_to_json`] renders them separately, keyed by relation type,
//! for documentation pages:
//!
//! ```json
//! {
//!   "http://example.org/rel/product": {
//!     "description": ["A single product."],
//!     "detailed-description": "<h1>Product</h1>",
//!     "link": "http://example.org/docs/product.html",
//!     "href-vars": { "productId": { "description": ["The product id."] } }
//!   }
//! }
//! ```

use serde_json::{json, Map, Value};

use crate::document::JsonHome;
use crate::hints::Hints;
use crate::link::{ResourceLink, Target};

/// Media type of json-home documents.
pub const JSON_HOME_MEDIA_TYPE: &str = "application/json-home";

/// Render a document.
pub fn to_json(document: &JsonHome) -> Value {
    let mut resources = Map::new();
    for link in document {
        resources.insert(link.relation_type().to_string(), link_to_json(link));
    }
    json!({ "resources": resources })
}

/// Render a single resource link.
pub fn link_to_json(link: &ResourceLink) -> Value {
    let mut obj = Map::new();
    match link.target() {
        Target::Href(href) => {
            obj.insert("href".into(), Value::String(href.to_string()));
        }
        Target::Template { template, vars } => {
            obj.insert("href-template".into(), Value::String(template.clone()));
            let vars: Map<String, Value> = vars
                .iter()
                .map(|v| (v.name.clone(), Value::String(v.var_type.to_string())))
                .collect();
            obj.insert("href-vars".into(), Value::Object(vars));
        }
    }
    obj.insert("hints".into(), hints_to_json(link.hints()));
    Value::Object(obj)
}

/// Render hints.
pub fn hints_to_json(hints: &Hints) -> Value {
    let mut obj = Map::new();

    if !hints.allows().is_empty() {
        obj.insert(
            "allow".into(),
            hints.allows().iter().map(|a| a.as_str()).collect(),
        );
    }
    insert_list(&mut obj, "representations", hints.representations().as_slice());
    insert_list(&mut obj, "accept-put", hints.accept_put().as_slice());
    insert_list(&mut obj, "accept-post", hints.accept_post().as_slice());
    if !hints.precondition_req().is_empty() {
        obj.insert(
            "precondition-req".into(),
            hints.precondition_req().iter().map(|p| p.as_str()).collect(),
        );
    }
    if !hints.auth_req().is_empty() {
        obj.insert("auth-req".into(), json!(hints.auth_req()));
    }
    if let Some(status) = hints.status().wire_value() {
        obj.insert("status".into(), Value::String(status.to_string()));
    }
    if let Some(link) = hints.docs().link() {
        obj.insert("docs".into(), Value::String(link.to_string()));
    }

    Value::Object(obj)
}

/// Render the documentation of every resource link.
///
/// Links without documentation are left out, as are undocumented variables.
pub fn docs_to_json(document: &JsonHome) -> Value {
    let mut resources = Map::new();
    for link in document {
        let mut entry = match serde_json::to_value(link.hints().docs()) {
            Ok(Value::Object(obj)) => obj,
            _ => Map::new(),
        };
        let vars: Map<String, Value> = link
            .href_vars()
            .iter()
            .filter(|var| !var.docs.is_empty())
            .map(|var| (var.name.clone(), json!(var.docs)))
            .collect();
        if !vars.is_empty() {
            entry.insert("href-vars".into(), Value::Object(vars));
        }
        if !entry.is_empty() {
            resources.insert(link.relation_type().to_string(), Value::Object(entry));
        }
    }
    Value::Object(resources)
}

fn insert_list(obj: &mut Map<String, Value>, key: &str, items: &[String]) {
    if !items.is_empty() {
        obj.insert(key.into(), items.iter().cloned().collect());
    }
}
