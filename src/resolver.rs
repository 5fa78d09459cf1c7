//! Documentation resolution.
//!
//! Turns a declared documentation source (description lines, a link, a
//! markdown include) into [`Docs`] for one relation type:
//!
//! | Source | Result |
//! |--------|--------|
//! | absolute link | kept verbatim |
//! | relative link | resolved against the relation type URI |
//! | markdown include | rendered to HTML as the detailed description |
//!
//! Resolution is best-effort. A missing include or an unresolvable link never
//! fails; the result is flagged partial and the affected field stays empty.

use std::fs;
use std::path::{Path, PathBuf};

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::docs::Docs;
use crate::types::GeneratorOptions;

/// Declared documentation for a relation type or template variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocSource {
    /// Short description lines.
    #[serde(default)]
    pub value: Vec<String>,
    /// Absolute or relative link to further documentation.
    #[serde(default)]
    pub link: Option<String>,
    /// Path of a markdown fragment below the include root.
    #[serde(default)]
    pub include: Option<String>,
}

impl DocSource {
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.link.is_none() && self.include.is_none()
    }
}

/// Part of a documentation source that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    /// Include not found or unreadable.
    Include { path: String },
    /// Link that is neither absolute nor resolvable against the relation type.
    Link { link: String, reason: String },
}

/// Outcome of resolving a [`DocSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocs {
    pub docs: Docs,
    pub unresolved: Vec<Unresolved>,
}

impl ResolvedDocs {
    /// True if some part of the source was dropped.
    pub fn is_partial(&self) -> bool {
        !self.unresolved.is_empty()
    }

    pub fn into_docs(self) -> Docs {
        self.docs
    }
}

/// Root directory and glob pattern markdown includes are looked up under.
///
/// Patterns look like `docs/*`, `/docs/*`, `docs/*.md` or `docs/**`. The
/// directory part is taken relative to the documentation root; the last part
/// restricts which include paths resolve. `**` admits nested paths.
#[derive(Debug, Clone)]
pub struct IncludeRoot {
    dir: PathBuf,
    recursive: bool,
    file_pattern: Option<Regex>,
}

impl IncludeRoot {
    pub fn parse(pattern: &str) -> Self {
        let segments: Vec<&str> = pattern
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let glob_at = segments.iter().position(|s| is_glob(s));
        let Some(glob_at) = glob_at else {
            return Self {
                dir: segments.iter().collect(),
                recursive: false,
                file_pattern: None,
            };
        };

        let dir: PathBuf = segments[..glob_at].iter().collect();
        let rest = &segments[glob_at..];
        let recursive = rest.iter().any(|s| *s == "**");
        let file_pattern = rest
            .last()
            .filter(|last| **last != "*" && **last != "**")
            .and_then(|last| glob_to_regex(last));

        Self {
            dir,
            recursive,
            file_pattern,
        }
    }

    /// Path of `include` below `doc_root`, or `None` if the pattern excludes it.
    pub fn locate(&self, doc_root: &Path, include: &str) -> Option<PathBuf> {
        let relative = include.trim_start_matches('/');
        let parts: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
        let file_name = *parts.last()?;

        if parts.iter().any(|p| *p == "..") {
            return None;
        }
        if parts.len() > 1 && !self.recursive {
            return None;
        }
        if let Some(pattern) = &self.file_pattern {
            if !pattern.is_match(file_name) {
                return None;
            }
        }

        let mut path = doc_root.join(&self.dir);
        path.extend(parts);
        Some(path)
    }
}

fn is_glob(segment: &str) -> bool {
    segment.contains(['*', '?'])
}

fn glob_to_regex(glob: &str) -> Option<Regex> {
    let mut expr = String::from("^");
    for c in glob.chars() {
        match c {
            '*' => expr.push_str("[^/]*"),
            '?' => expr.push_str("[^/]"),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr).ok()
}

/// Resolves documentation sources for one generation pass.
#[derive(Debug, Clone)]
pub struct DocsResolver {
    doc_root: PathBuf,
    include_root: IncludeRoot,
}

impl DocsResolver {
    pub fn new(doc_root: impl Into<PathBuf>, include_root: &str) -> Self {
        Self {
            doc_root: doc_root.into(),
            include_root: IncludeRoot::parse(include_root),
        }
    }

    pub fn from_options(options: &GeneratorOptions) -> Self {
        Self::new(options.doc_root_dir.clone(), &options.include_root)
    }

    /// Resolve `source` as documentation of `relation_type`.
    pub fn resolve(&self, relation_type: &Url, source: &DocSource) -> ResolvedDocs {
        let mut unresolved = Vec::new();

        let link = source
            .link
            .as_deref()
            .and_then(|link| match resolve_link(relation_type, link) {
                Ok(url) => Some(url),
                Err(reason) => {
                    debug!(%relation_type, link, %reason, "dropping unresolvable doc link");
                    unresolved.push(Unresolved::Link {
                        link: link.to_string(),
                        reason,
                    });
                    None
                }
            });

        let detailed_description = source.include.as_deref().and_then(|include| {
            let rendered = self.render_include(include);
            if rendered.is_none() {
                debug!(%relation_type, include, "markdown include not found");
                unresolved.push(Unresolved::Include {
                    path: include.to_string(),
                });
            }
            rendered
        });

        ResolvedDocs {
            docs: Docs::new(source.value.clone(), detailed_description, link),
            unresolved,
        }
    }

    fn render_include(&self, include: &str) -> Option<String> {
        let path = self.include_root.locate(&self.doc_root, include)?;
        let markdown = match fs::read_to_string(&path) {
            Ok(markdown) => markdown,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cannot read markdown include");
                return None;
            }
        };
        Some(render_markdown(&markdown))
    }
}

/// Resolve a documentation link against the relation type it documents.
///
/// Absolute links are returned unchanged; path-absolute, scheme-relative and
/// bare relative references follow RFC 3986 resolution.
pub fn resolve_link(relation_type: &Url, link: &str) -> Result<Url, String> {
    match Url::parse(link) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            relation_type.join(link).map_err(|e| e.to_string())
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Render markdown to HTML, without trailing whitespace.
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
    );
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output.trim_end().to_string()
}
