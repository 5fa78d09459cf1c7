//! Document generation from a descriptor source.

use tracing::{debug, info};

use crate::assembler::{assemble, DescriptorSource};
use crate::document::JsonHome;
use crate::error::LoadError;
use crate::types::GeneratorOptions;

/// Generates json-home documents from a [`DescriptorSource`].
///
/// Each call to [`generate`](Self::generate) is an independent pass sharing
/// no mutable state with earlier ones.
#[derive(Debug, Clone)]
pub struct JsonHomeGenerator<S> {
    options: GeneratorOptions,
    source: S,
}

impl<S: DescriptorSource> JsonHomeGenerator<S> {
    pub fn new(options: GeneratorOptions, source: S) -> Self {
        Self { options, source }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Collect descriptors and assemble them into a document.
    ///
    /// # Errors
    ///
    /// Returns the source's `LoadError`, or `LoadError::Assemble` if
    /// descriptors of one relation type conflict.
    pub fn generate(&self) -> Result<JsonHome, LoadError> {
        let descriptors = self.source.descriptors(&self.options)?;
        debug!(count = descriptors.len(), "collected descriptors");
        let document = assemble(descriptors)?;
        info!(resources = document.len(), "generated json-home document");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::Descriptor;
    use crate::error::AssembleError;
    use crate::hints::Hints;
    use crate::link::Target;
    use crate::types::Allow;
    use url::Url;

    fn descriptor(rel: &str, target: Target) -> Descriptor {
        Descriptor::new(
            Url::parse(rel).unwrap(),
            target,
            Hints::builder().allow(Allow::Get).build().unwrap(),
        )
    }

    #[test]
    fn generates_from_static_source() {
        let source = vec![
            descriptor(
                "http://example.org/rel/a",
                Target::Href(Url::parse("http://example.org/a").unwrap()),
            ),
            descriptor(
                "http://example.org/rel/a",
                Target::Href(Url::parse("http://example.org/a").unwrap()),
            ),
        ];
        let generator = JsonHomeGenerator::new(GeneratorOptions::default(), source);
        assert_eq!(generator.generate().unwrap().len(), 1);
    }

    #[test]
    fn conflicts_surface_as_load_errors() {
        let source = vec![
            descriptor(
                "http://example.org/rel/a",
                Target::Href(Url::parse("http://example.org/a").unwrap()),
            ),
            descriptor(
                "http://example.org/rel/a",
                Target::Template {
                    template: "http://example.org/a/{id}".into(),
                    vars: vec![],
                },
            ),
        ];
        let generator = JsonHomeGenerator::new(GeneratorOptions::default(), source);
        assert!(matches!(
            generator.generate(),
            Err(LoadError::Assemble(AssembleError::ConflictingResourceLink { .. }))
        ));
    }
}
