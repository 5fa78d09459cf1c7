//! Resource links: a relation type bound to a URI or URI template plus hints.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::docs::Docs;
use crate::error::AssembleError;
use crate::hints::Hints;

/// Validation rule attached to a template variable.
///
/// Carried into the document for downstream consumers; assembly never
/// evaluates it.
#[derive(Debug, Clone)]
pub enum VarConstraint {
    /// Any value.
    Any,
    /// One or more ASCII digits.
    Integer,
    /// Values matching a regular expression in full.
    Pattern { source: String, regex: Regex },
}

impl VarConstraint {
    /// Compile a pattern constraint. The expression must match the whole value.
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(VarConstraint::Pattern {
            source: source.to_string(),
            regex,
        })
    }

    /// Whether `value` satisfies the constraint.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            VarConstraint::Any => true,
            VarConstraint::Integer => {
                !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
            }
            VarConstraint::Pattern { regex, .. } => regex.is_match(value),
        }
    }
}

impl PartialEq for VarConstraint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (VarConstraint::Any, VarConstraint::Any) => true,
            (VarConstraint::Integer, VarConstraint::Integer) => true,
            (
                VarConstraint::Pattern { source: a, .. },
                VarConstraint::Pattern { source: b, .. },
            ) => {
                a == b
            }
            _ => false,
        }
    }
}

impl Eq for VarConstraint {}

impl fmt::Display for VarConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarConstraint::Any => f.write_str("any"),
            VarConstraint::Integer => f.write_str("integer"),
            VarConstraint::Pattern { source, .. } => write!(f, "pattern {source}"),
        }
    }
}

/// A variable of a URI template (one `href-vars` entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrefVar {
    pub name: String,
    /// URI describing the variable; rendered as the `href-vars` value.
    pub var_type: Url,
    pub constraint: VarConstraint,
    pub docs: Docs,
}

impl HrefVar {
    pub fn new(name: impl Into<String>, var_type: Url, constraint: VarConstraint) -> Self {
        Self {
            name: name.into(),
            var_type,
            constraint,
            docs: Docs::empty(),
        }
    }

    pub fn with_docs(mut self, docs: Docs) -> Self {
        self.docs = docs;
        self
    }

    /// Whether `value` is acceptable for this variable.
    pub fn accepts(&self, value: &str) -> bool {
        self.constraint.accepts(value)
    }

    fn same_shape(&self, other: &HrefVar) -> bool {
        self.name == other.name
            && self.var_type == other.var_type
            && self.constraint == other.constraint
    }
}

/// Where a relation type points: one URI, or a family of URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Href(Url),
    Template { template: String, vars: Vec<HrefVar> },
}

impl Target {
    pub fn is_templated(&self) -> bool {
        matches!(self, Target::Template { .. })
    }

    /// Whether two targets describe the same URI or the same template shape.
    fn agrees_with(&self, other: &Target) -> bool {
        match (self, other) {
            (Target::Href(a), Target::Href(b)) => a == b,
            (
                Target::Template { template: a, vars: va },
                Target::Template { template: b, vars: vb },
            ) => {
                a == b
                    && va.len() == vb.len()
                    && va
                        .iter()
                        .all(|v| vb.iter().any(|w| v.same_shape(w)))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Href(href) => write!(f, "href {href}"),
            Target::Template { template, vars } => {
                write!(f, "href-template {template}")?;
                if !vars.is_empty() {
                    let vars: Vec<String> = vars
                        .iter()
                        .map(|v| format!("{}:{}", v.name, v.constraint))
                        .collect();
                    write!(f, " [{}]", vars.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// One entry of a json-home document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    relation_type: Url,
    target: Target,
    hints: Hints,
}

impl ResourceLink {
    pub fn new(relation_type: Url, target: Target, hints: Hints) -> Self {
        Self {
            relation_type,
            target,
            hints,
        }
    }

    /// Resource link with a fixed URI.
    pub fn with_href(relation_type: Url, href: Url, hints: Hints) -> Self {
        Self::new(relation_type, Target::Href(href), hints)
    }

    /// Resource link with a URI template.
    pub fn templated(
        relation_type: Url,
        template: impl Into<String>,
        vars: Vec<HrefVar>,
        hints: Hints,
    ) -> Self {
        Self::new(
            relation_type,
            Target::Template {
                template: template.into(),
                vars,
            },
            hints,
        )
    }

    pub fn relation_type(&self) -> &Url {
        &self.relation_type
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn hints(&self) -> &Hints {
        &self.hints
    }

    /// The fixed URI, if not templated.
    pub fn href(&self) -> Option<&Url> {
        match &self.target {
            Target::Href(href) => Some(href),
            Target::Template { .. } => None,
        }
    }

    /// The URI template, if templated.
    pub fn href_template(&self) -> Option<&str> {
        match &self.target {
            Target::Href(_) => None,
            Target::Template { template, .. } => Some(template),
        }
    }

    /// Template variables; empty for fixed links.
    pub fn href_vars(&self) -> &[HrefVar] {
        match &self.target {
            Target::Href(_) => &[],
            Target::Template { vars, .. } => vars,
        }
    }

    pub fn is_templated(&self) -> bool {
        self.target.is_templated()
    }

    /// Merge with another link declared for the same relation type.
    ///
    /// # Errors
    ///
    /// Returns `AssembleError::ConflictingResourceLink` if the links differ in
    /// relation type, fixed-vs-templated shape, href, template or variables.
    pub fn merge_with(&self, other: &ResourceLink) -> Result<ResourceLink, AssembleError> {
        if self.relation_type != other.relation_type || !self.target.agrees_with(&other.target) {
            return Err(AssembleError::ConflictingResourceLink {
                relation_type: self.relation_type.clone(),
                existing: self.target.to_string(),
                conflicting: other.target.to_string(),
            });
        }

        let target = match (&self.target, &other.target) {
            (Target::Template { template, vars }, Target::Template { vars: theirs, .. }) => {
                let vars = vars
                    .iter()
                    .map(|var| {
                        let docs = theirs
                            .iter()
                            .find(|t| t.name == var.name)
                            .map(|t| var.docs.merge_with(&t.docs))
                            .unwrap_or_else(|| var.docs.clone());
                        var.clone().with_docs(docs)
                    })
                    .collect();
                Target::Template {
                    template: template.clone(),
                    vars,
                }
            }
            _ => self.target.clone(),
        };

        Ok(ResourceLink {
            relation_type: self.relation_type.clone(),
            target,
            hints: self.hints.merge_with(&other.hints),
        })
    }
}

/// Names of the variables of an RFC 6570 URI template, in order of appearance.
///
/// Operators (`+ # . / ; ? &`) and modifiers (`*`, `:n`) are stripped.
pub fn template_variables(template: &str) -> Vec<String> {
    static EXPRESSION: OnceLock<Regex> = OnceLock::new();
    let expression =
        EXPRESSION.get_or_init(|| Regex::new(r"\{([^}]*)\}").expect("static regex is valid"));

    let mut names: Vec<String> = Vec::new();
    for caps in expression.captures_iter(template) {
        let body = caps[1].trim_start_matches(['+', '#', '.', '/', ';', '?', '&']);
        for varspec in body.split(',') {
            let name = varspec
                .split(':')
                .next()
                .unwrap_or(varspec)
                .trim_end_matches('*')
                .trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}
