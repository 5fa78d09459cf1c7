//! json-home document assembly
//!
//! Builds json-home API discovery documents (draft-nottingham-json-home) from
//! independently declared endpoint descriptors.
//!
//! Each descriptor names a relation type, a fixed URI or URI template, and the
//! hints of one HTTP-method/media-type mapping. The assembler groups
//! descriptors by relation type, merges their hints and produces a document
//! with one resource link per relation type, in first-seen order.
//!
//! # Example
//!
//! ```
//! use json_home::{assemble, to_json, Allow, Descriptor, Hints, Target};
//! use url::Url;
//!
//! let rel = Url::parse("http://example.org/rel/products").unwrap();
//! let href = Url::parse("http://example.org/products").unwrap();
//!
//! let html = Hints::builder()
//!     .allow(Allow::Get)
//!     .representations(["text/html"])
//!     .build()
//!     .unwrap();
//! let form = Hints::builder()
//!     .allow(Allow::Post)
//!     .accept_post(["application/x-www-form-urlencoded"])
//!     .build()
//!     .unwrap();
//!
//! let document = assemble(vec![
//!     Descriptor::new(rel.clone(), Target::Href(href.clone()), html),
//!     Descriptor::new(rel.clone(), Target::Href(href), form),
//! ])
//! .unwrap();
//!
//! let json = to_json(&document);
//! assert_eq!(
//!     json["resources"]["http://example.org/rel/products"]["hints"]["allow"],
//!     serde_json::json!(["GET", "POST"])
//! );
//! ```
//!
//! # Merge Rules
//!
//! | Field | Merge |
//! |-------|-------|
//! | `allow` | set union |
//! | `representations`, `accept-put`, `accept-post` | union in first-seen order |
//! | `precondition-req`, `auth-req` | union in first-seen order |
//! | `status` | most restrictive (`current` < `deprecated` < `gone`) |
//! | docs description | concatenated |
//! | docs detailed description, link | first declared wins |
//!
//! Descriptors of one relation type must agree on their target; a fixed URI
//! and a template for the same relation type are a configuration error.

mod assembler;
mod cache;
mod docs;
mod document;
mod error;
mod generator;
mod hints;
mod link;
mod linter;
mod loader;
mod ordered;
mod resolver;
mod serialize;
mod types;
mod validator;

pub use assembler::{assemble, assemble_lenient, Assembler, Descriptor, DescriptorSource};
pub use cache::JsonHomeCache;
pub use docs::Docs;
pub use document::JsonHome;
pub use error::{AssembleError, HintsError, LoadError, SchemaError};
pub use generator::JsonHomeGenerator;
pub use hints::{Hints, HintsBuilder};
pub use link::{template_variables, HrefVar, ResourceLink, Target, VarConstraint};
pub use linter::{lint, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity};
pub use loader::{
    descriptors_from_value, is_url, load_descriptors, load_descriptors_auto, load_descriptors_str,
    DescriptorEntry, DescriptorFile, DescriptorSet, HintsEntry, HrefVarEntry, VarKind,
};
pub use ordered::OrderedSet;
pub use resolver::{
    render_markdown, resolve_link, DocSource, DocsResolver, IncludeRoot, ResolvedDocs, Unresolved,
};
pub use serialize::{docs_to_json, hints_to_json, link_to_json, to_json, JSON_HOME_MEDIA_TYPE};
pub use types::{
    Allow, Authentication, GeneratorOptions, Precondition, Status, DEFAULT_BASE_URI,
    DEFAULT_INCLUDE_ROOT,
};
pub use validator::{descriptor_schema, validate_descriptors};

#[cfg(feature = "remote")]
pub use loader::load_descriptors_url;
