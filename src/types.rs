//! Leaf value types shared by hints, resource links and the generator.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Default include-root pattern used to locate markdown includes.
pub const DEFAULT_INCLUDE_ROOT: &str = "docs/*";

/// Default application base URI when none is configured.
pub const DEFAULT_BASE_URI: &str = "http://localhost";

/// HTTP methods a resource link may allow.
///
/// Ordering follows declaration order and determines how `allow` is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Allow {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Allow {
    /// Returns the method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Allow::Get => "GET",
            Allow::Head => "HEAD",
            Allow::Post => "POST",
            Allow::Put => "PUT",
            Allow::Patch => "PATCH",
            Allow::Delete => "DELETE",
            Allow::Options => "OPTIONS",
        }
    }

    /// Parse a method name (case-insensitive).
    ///
    /// Returns `None` for unknown methods.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Allow::Get),
            "HEAD" => Some(Allow::Head),
            "POST" => Some(Allow::Post),
            "PUT" => Some(Allow::Put),
            "PATCH" => Some(Allow::Patch),
            "DELETE" => Some(Allow::Delete),
            "OPTIONS" => Some(Allow::Options),
            _ => None,
        }
    }
}

impl fmt::Display for Allow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a relation type.
///
/// Variants are ordered from least to most restrictive; merging two statuses
/// keeps the more restrictive one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Current,
    Deprecated,
    Gone,
}

impl Status {
    /// Merge two statuses declared for the same relation type.
    pub fn merge_with(self, other: Status) -> Status {
        self.max(other)
    }

    /// Returns the wire value, or `None` for `Current` (which is not rendered).
    pub fn wire_value(&self) -> Option<&'static str> {
        match self {
            Status::Current => None,
            Status::Deprecated => Some("deprecated"),
            Status::Gone => Some("gone"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value().unwrap_or("current"))
    }
}

/// Conditional-request mechanism required before a mutating method is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precondition {
    Etag,
    LastModified,
}

impl Precondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Precondition::Etag => "etag",
            Precondition::LastModified => "last-modified",
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hint that a resource requires authentication using the HTTP
/// Authentication Framework.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Authentication {
    pub scheme: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub realms: Vec<String>,
}

impl Authentication {
    /// Authentication with a scheme and no realms.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            realms: Vec::new(),
        }
    }

    /// Authentication with a scheme and an ordered list of realms.
    pub fn with_realms<I, S>(scheme: impl Into<String>, realms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scheme: scheme.into(),
            realms: realms.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.realms.is_empty() {
            f.write_str(&self.scheme)
        } else {
            write!(f, "{} realms={}", self.scheme, self.realms.join(","))
        }
    }
}

/// Options for document generation.
///
/// Supplied once per generator; every documentation resolution during one
/// generation pass uses the same values.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Base URI that descriptor `href`s and templates are relative to.
    pub application_base_uri: Url,
    /// Base URI that relative relation types are resolved against.
    pub relation_type_base_uri: Url,
    /// Directory markdown includes are looked up in.
    pub doc_root_dir: PathBuf,
    /// Glob pattern (e.g. `docs/*`) locating includes below `doc_root_dir`.
    pub include_root: String,
}

impl GeneratorOptions {
    /// Create options where relation types share the application base URI.
    pub fn new(application_base_uri: Url) -> Self {
        Self {
            relation_type_base_uri: application_base_uri.clone(),
            application_base_uri,
            doc_root_dir: PathBuf::from("."),
            include_root: DEFAULT_INCLUDE_ROOT.to_string(),
        }
    }

    /// Set a separate base URI for relation types.
    pub fn relation_type_base_uri(mut self, uri: Url) -> Self {
        self.relation_type_base_uri = uri;
        self
    }

    /// Set the directory markdown includes are read from.
    pub fn doc_root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.doc_root_dir = dir.into();
        self
    }

    /// Set the include-root glob pattern.
    pub fn include_root(mut self, pattern: impl Into<String>) -> Self {
        self.include_root = pattern.into();
        self
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_BASE_URI).expect("default base URI is valid"))
    }
}
