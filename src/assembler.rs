//! Document assembly: grouping descriptors by relation type and merging them.

use std::collections::HashMap;

use tracing::{debug, warn};
use url::Url;

use crate::document::JsonHome;
use crate::error::{AssembleError, LoadError};
use crate::hints::Hints;
use crate::link::{ResourceLink, Target};
use crate::types::GeneratorOptions;

/// One declared mapping: a relation type, its target and the hints of a
/// single HTTP-method/media-type combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub relation_type: Url,
    pub target: Target,
    pub hints: Hints,
}

impl Descriptor {
    pub fn new(relation_type: Url, target: Target, hints: Hints) -> Self {
        Self {
            relation_type,
            target,
            hints,
        }
    }

    fn into_link(self) -> ResourceLink {
        ResourceLink::new(self.relation_type, self.target, self.hints)
    }
}

/// Supplier of descriptors (static configuration, code generation, runtime
/// inspection...).
pub trait DescriptorSource {
    /// Produce the descriptors for one generation pass.
    fn descriptors(&self, options: &GeneratorOptions) -> Result<Vec<Descriptor>, LoadError>;
}

impl DescriptorSource for Vec<Descriptor> {
    fn descriptors(&self, _options: &GeneratorOptions) -> Result<Vec<Descriptor>, LoadError> {
        Ok(self.clone())
    }
}

/// Incremental assembler.
///
/// Descriptors for the same relation type are merged as they arrive; the
/// first descriptor of a relation type fixes its position in the document.
#[derive(Debug, Default)]
pub struct Assembler {
    links: Vec<ResourceLink>,
    index: HashMap<Url, usize>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one descriptor.
    ///
    /// # Errors
    ///
    /// Returns `AssembleError::ConflictingResourceLink` if the descriptor's
    /// target disagrees with earlier descriptors of its relation type. The
    /// assembler is left unchanged in that case.
    pub fn add(&mut self, descriptor: Descriptor) -> Result<(), AssembleError> {
        match self.index.get(&descriptor.relation_type) {
            Some(&i) => {
                let merged = self.links[i].merge_with(&descriptor.into_link())?;
                debug!(relation_type = %merged.relation_type(), "merged descriptor");
                self.links[i] = merged;
            }
            None => {
                debug!(relation_type = %descriptor.relation_type, "new relation type");
                let position = self.links.len();
                self.index.insert(descriptor.relation_type.clone(), position);
                self.links.push(descriptor.into_link());
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Finish assembly.
    pub fn finish(self) -> JsonHome {
        JsonHome::from_links(self.links)
    }
}

/// Assemble a document, failing on the first conflicting descriptor.
pub fn assemble<I>(descriptors: I) -> Result<JsonHome, AssembleError>
where
    I: IntoIterator<Item = Descriptor>,
{
    let mut assembler = Assembler::new();
    for descriptor in descriptors {
        assembler.add(descriptor)?;
    }
    Ok(assembler.finish())
}

/// Assemble a document, skipping conflicting descriptors.
///
/// Returns the document built from every compatible descriptor together with
/// the errors of the skipped ones.
pub fn assemble_lenient<I>(descriptors: I) -> (JsonHome, Vec<AssembleError>)
where
    I: IntoIterator<Item = Descriptor>,
{
    let mut assembler = Assembler::new();
    let mut errors = Vec::new();
    for descriptor in descriptors {
        if let Err(err) = assembler.add(descriptor) {
            warn!(error = %err, "skipping descriptor");
            errors.push(err);
        }
    }
    (assembler.finish(), errors)
}
