//! Human-readable documentation attached to relation types and href-vars.

use std::fmt;

use serde::Serialize;
use url::Url;

/// Documentation of a resource link or template variable.
///
/// `Docs::empty()` is the identity for [`Docs::merge_with`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Docs {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    description: Vec<String>,
    #[serde(rename = "detailed-description", skip_serializing_if = "Option::is_none")]
    detailed_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<Url>,
}

impl Docs {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(
        description: Vec<String>,
        detailed_description: Option<String>,
        link: Option<Url>,
    ) -> Self {
        Self {
            description,
            detailed_description,
            link,
        }
    }

    /// Docs consisting only of description lines.
    pub fn from_description<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Docs consisting only of a link to external documentation.
    pub fn from_link(link: Url) -> Self {
        Self {
            link: Some(link),
            ..Self::default()
        }
    }

    /// Short description lines.
    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// HTML rendered from a markdown include.
    pub fn detailed_description(&self) -> Option<&str> {
        self.detailed_description.as_deref()
    }

    /// Link to further documentation.
    pub fn link(&self) -> Option<&Url> {
        self.link.as_ref()
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.detailed_description.is_none() && self.link.is_none()
    }

    /// Combine documentation declared at two mapping points.
    ///
    /// Description lines are concatenated (repeats kept). The detailed
    /// description and the link keep the first declared value.
    pub fn merge_with(&self, other: &Docs) -> Docs {
        let mut description = self.description.clone();
        description.extend(other.description.iter().cloned());
        Docs {
            description,
            detailed_description: self
                .detailed_description
                .clone()
                .or_else(|| other.detailed_description.clone()),
            link: self.link.clone().or_else(|| other.link.clone()),
        }
    }
}

impl fmt::Display for Docs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Docs{{description={:?}", self.description)?;
        if let Some(detailed) = &self.detailed_description {
            write!(f, ", detailed={:?}", detailed)?;
        }
        if let Some(link) = &self.link {
            write!(f, ", link={}", link)?;
        }
        f.write_str("}")
    }
}
