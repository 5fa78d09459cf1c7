//! Copy-on-write publication of generated documents.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::assembler::DescriptorSource;
use crate::document::JsonHome;
use crate::error::LoadError;
use crate::generator::JsonHomeGenerator;

#[derive(Debug)]
struct Published {
    document: Arc<JsonHome>,
    published_at: Instant,
}

/// Holds the currently published document.
///
/// A new document is always generated in full before it replaces the old
/// one, so readers never see a partially merged document. Readers get an
/// `Arc` and keep using it for as long as they like.
#[derive(Debug)]
pub struct JsonHomeCache<S> {
    generator: JsonHomeGenerator<S>,
    max_age: Option<Duration>,
    published: RwLock<Option<Published>>,
}

impl<S: DescriptorSource> JsonHomeCache<S> {
    /// Create a cache. With `max_age` set, documents older than that are
    /// regenerated on the next read.
    pub fn new(generator: JsonHomeGenerator<S>, max_age: Option<Duration>) -> Self {
        Self {
            generator,
            max_age,
            published: RwLock::new(None),
        }
    }

    /// The published document, generating it first if there is none yet or
    /// the published one expired.
    ///
    /// If regeneration of an expired document fails, the expired document is
    /// still served.
    ///
    /// # Errors
    ///
    /// Returns the generation error if no document was published yet.
    pub fn current(&self) -> Result<Arc<JsonHome>, LoadError> {
        let stale = {
            let published = self.published.read();
            match published.as_ref() {
                Some(p) if !self.is_expired(p) => return Ok(Arc::clone(&p.document)),
                Some(p) => Some(Arc::clone(&p.document)),
                None => None,
            }
        };

        match (self.refresh(), stale) {
            (Ok(document), _) => Ok(document),
            (Err(err), Some(stale)) => {
                warn!(error = %err, "regeneration failed, serving expired document");
                Ok(stale)
            }
            (Err(err), None) => Err(err),
        }
    }

    /// Generate a new document and publish it.
    pub fn refresh(&self) -> Result<Arc<JsonHome>, LoadError> {
        let document = self.generator.generate()?;
        Ok(self.publish(document))
    }

    /// Publish an externally built document.
    pub fn publish(&self, document: JsonHome) -> Arc<JsonHome> {
        let document = Arc::new(document);
        *self.published.write() = Some(Published {
            document: Arc::clone(&document),
            published_at: Instant::now(),
        });
        debug!(resources = document.len(), "published json-home document");
        document
    }

    fn is_expired(&self, published: &Published) -> bool {
        self.max_age
            .is_some_and(|max_age| published.published_at.elapsed() >= max_age)
    }
}
