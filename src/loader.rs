//! Descriptor loading from files, strings, and HTTP URLs.
//!
//! A descriptor file is the static stand-in for scanning controllers: each
//! entry declares one mapping of a relation type.
//!
//! ```json
//! {
//!   "resources": [
//!     {
//!       "rel": "/rel/product",
//!       "href-template": "/products/{productId}",
//!       "href-vars": { "productId": { "type": "integer" } },
//!       "hints": { "allow": ["GET"], "representations": ["application/json"] },
//!       "doc": { "value": ["A single product."], "include": "/product.md" }
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::assembler::{Descriptor, DescriptorSource};
use crate::error::{AssembleError, LoadError};
use crate::hints::Hints;
use crate::link::{template_variables, HrefVar, Target, VarConstraint};
use crate::resolver::{DocSource, DocsResolver};
use crate::types::{Allow, Authentication, GeneratorOptions, Precondition, Status};
use crate::validator::validate_descriptors;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Parsed contents of a descriptor file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorSet {
    pub resources: Vec<DescriptorEntry>,
}

/// One entry of a descriptor file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorEntry {
    /// Relation type, absolute or relative to the relation type base URI.
    pub rel: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default, rename = "href-template")]
    pub href_template: Option<String>,
    #[serde(default, rename = "href-vars")]
    pub href_vars: BTreeMap<String, HrefVarEntry>,
    #[serde(default)]
    pub hints: HintsEntry,
    #[serde(default)]
    pub doc: Option<DocSource>,
}

/// Declared hints of a descriptor entry, checked when converted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HintsEntry {
    #[serde(default)]
    pub allow: Vec<Allow>,
    #[serde(default)]
    pub representations: Vec<String>,
    #[serde(default, rename = "accept-put")]
    pub accept_put: Vec<String>,
    #[serde(default, rename = "accept-post")]
    pub accept_post: Vec<String>,
    #[serde(default, rename = "precondition-req")]
    pub precondition_req: Vec<Precondition>,
    #[serde(default, rename = "auth-req")]
    pub auth_req: Vec<Authentication>,
    #[serde(default)]
    pub status: Status,
}

/// Kind of value a template variable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKind {
    Integer,
    String,
}

/// Declared constraint and documentation of a template variable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HrefVarEntry {
    #[serde(default, rename = "type")]
    pub kind: Option<VarKind>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub doc: Option<DocSource>,
}

impl DescriptorSet {
    /// Convert entries into descriptors, resolving URIs and documentation.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidUri`, `LoadError::InvalidPattern` or
    /// `LoadError::InvalidDescriptor` for malformed entries and
    /// `LoadError::Assemble` wrapping `AssembleError::InvalidHints` when an
    /// entry's hints violate the accept-put / accept-post invariant.
    pub fn into_descriptors(
        self,
        options: &GeneratorOptions,
    ) -> Result<Vec<Descriptor>, LoadError> {
        let resolver = DocsResolver::from_options(options);
        self.resources
            .into_iter()
            .map(|entry| entry.into_descriptor(options, &resolver))
            .collect()
    }

    /// Convert entries into descriptors, skipping malformed entries.
    ///
    /// Returns the descriptors of every valid entry together with the errors
    /// of the skipped ones.
    pub fn into_descriptors_lenient(
        self,
        options: &GeneratorOptions,
    ) -> (Vec<Descriptor>, Vec<LoadError>) {
        let resolver = DocsResolver::from_options(options);
        let mut descriptors = Vec::new();
        let mut errors = Vec::new();
        for entry in self.resources {
            match entry.into_descriptor(options, &resolver) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(err) => {
                    warn!(error = %err, "skipping descriptor entry");
                    errors.push(err);
                }
            }
        }
        (descriptors, errors)
    }
}

impl DescriptorEntry {
    pub(crate) fn into_descriptor(
        self,
        options: &GeneratorOptions,
        resolver: &DocsResolver,
    ) -> Result<Descriptor, LoadError> {
        let relation_type = join_uri(&options.relation_type_base_uri, &self.rel)?;

        let target = match (&self.href, &self.href_template) {
            (Some(_), Some(_)) => return Err(self.invalid("both href and href-template are set")),
            (None, None) => return Err(self.invalid("one of href or href-template is required")),
            (Some(href), None) => {
                if !self.href_vars.is_empty() {
                    return Err(self.invalid("href-vars require href-template"));
                }
                Target::Href(join_uri(&options.application_base_uri, href)?)
            }
            (None, Some(template)) => {
                let template = absolute_template(&options.application_base_uri, template);
                let vars = self.resolve_vars(&template, &relation_type, resolver)?;
                Target::Template { template, vars }
            }
        };

        let docs = self
            .doc
            .as_ref()
            .map(|doc| resolver.resolve(&relation_type, doc).into_docs())
            .unwrap_or_default();

        let HintsEntry {
            allow,
            representations,
            accept_put,
            accept_post,
            precondition_req,
            auth_req,
            status,
        } = self.hints;
        let hints = Hints::builder()
            .allows(allow)
            .representations(representations)
            .accept_put(accept_put)
            .accept_post(accept_post)
            .precondition_req(precondition_req)
            .auth_req(auth_req)
            .status(status)
            .docs(docs)
            .build()
            .map_err(|source| AssembleError::InvalidHints {
                relation_type: relation_type.clone(),
                source,
            })?;

        debug!(%relation_type, "loaded descriptor");
        Ok(Descriptor::new(relation_type, target, hints))
    }

    /// Variables in template order, with their declared constraints.
    fn resolve_vars(
        &self,
        template: &str,
        relation_type: &Url,
        resolver: &DocsResolver,
    ) -> Result<Vec<HrefVar>, LoadError> {
        let names = template_variables(template);
        if let Some(unknown) = self.href_vars.keys().find(|k| !names.contains(*k)) {
            return Err(self.invalid(&format!(
                "href-var \"{unknown}\" does not occur in href-template"
            )));
        }

        names
            .into_iter()
            .map(|name| {
                let mut var_type = relation_type.clone();
                var_type.set_fragment(Some(&name));

                let Some(entry) = self.href_vars.get(&name) else {
                    return Ok(HrefVar::new(name, var_type, VarConstraint::Any));
                };
                let constraint = match (entry.kind, entry.pattern.as_deref()) {
                    (Some(VarKind::Integer), Some(_)) => {
                        return Err(self.invalid(&format!(
                            "href-var \"{name}\" has both an integer type and a pattern"
                        )))
                    }
                    (Some(VarKind::Integer), None) => VarConstraint::Integer,
                    (_, Some(pattern)) => VarConstraint::pattern(pattern).map_err(|source| {
                        LoadError::InvalidPattern {
                            var: name.clone(),
                            source,
                        }
                    })?,
                    (_, None) => VarConstraint::Any,
                };
                let docs = entry
                    .doc
                    .as_ref()
                    .map(|doc| resolver.resolve(relation_type, doc).into_docs())
                    .unwrap_or_default();
                Ok(HrefVar::new(name, var_type, constraint).with_docs(docs))
            })
            .collect()
    }

    fn invalid(&self, message: &str) -> LoadError {
        LoadError::InvalidDescriptor {
            rel: self.rel.clone(),
            message: message.to_string(),
        }
    }
}

/// Resolve a `rel` or `href` value against a base URI.
///
/// Absolute values are kept. Relative values are prefixed with the base,
/// including its path, by [`prefixed`].
pub(crate) fn join_uri(base: &Url, value: &str) -> Result<Url, LoadError> {
    if let Ok(url) = Url::parse(value) {
        return Ok(url);
    }
    Url::parse(&prefixed(base, value)).map_err(|source| LoadError::InvalidUri {
        value: value.to_string(),
        source,
    })
}

/// Resolve an href-template against the application base URI.
///
/// Templates are not valid URIs, so the prefix is applied textually, with the
/// same rule as [`join_uri`].
fn absolute_template(base: &Url, template: &str) -> String {
    if Url::parse(template).is_ok() {
        return template.to_string();
    }
    prefixed(base, template)
}

/// `value` below the base path: `/products` and `products` under
/// `http://example.org/shop` both give `http://example.org/shop/products`.
fn prefixed(base: &Url, value: &str) -> String {
    let mut base = base.clone();
    base.set_query(None);
    base.set_fragment(None);
    let base = base.as_str().trim_end_matches('/');
    format!("{base}/{}", value.trim_start_matches('/'))
}

/// A descriptor file (path or URL) used as a [`DescriptorSource`].
#[derive(Debug, Clone)]
pub struct DescriptorFile {
    location: String,
}

impl DescriptorFile {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl DescriptorSource for DescriptorFile {
    fn descriptors(&self, options: &GeneratorOptions) -> Result<Vec<Descriptor>, LoadError> {
        load_descriptors_auto(&self.location)?.into_descriptors(options)
    }
}

/// Load descriptors from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidJson` if the file isn't valid JSON, or
/// `LoadError::Invalid` if it doesn't match the descriptor schema.
pub fn load_descriptors(path: &Path) -> Result<DescriptorSet, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_descriptors_str(&content)
}

/// Load descriptors from a JSON string.
pub fn load_descriptors_str(content: &str) -> Result<DescriptorSet, LoadError> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    descriptors_from_value(value)
}

/// Validate and deserialize an already parsed descriptor document.
pub fn descriptors_from_value(value: Value) -> Result<DescriptorSet, LoadError> {
    validate_descriptors(&value)?;
    serde_json::from_value(value).map_err(|source| LoadError::InvalidJson { source })
}

/// Load descriptors from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, or the errors of
/// [`descriptors_from_value`] for the response body.
#[cfg(feature = "remote")]
pub fn load_descriptors_url(url: &str) -> Result<DescriptorSet, LoadError> {
    let network_error = |source: reqwest::Error| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    let value: Value = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network_error)?;

    descriptors_from_value(value)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load descriptors from a file path or URL.
///
/// URL loading requires the `remote` feature.
pub fn load_descriptors_auto(source: &str) -> Result<DescriptorSet, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_descriptors_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_descriptors(Path::new(source))
    }
}
