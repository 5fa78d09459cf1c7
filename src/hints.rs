//! Resource hints: the machine-readable capabilities of one relation type.

use std::collections::BTreeSet;
use std::fmt;

use crate::docs::Docs;
use crate::error::HintsError;
use crate::ordered::OrderedSet;
use crate::types::{Allow, Authentication, Precondition, Status};

/// Hints of a resource link.
///
/// Immutable once constructed. A value with a non-empty `accept_post` always
/// allows POST, and one with a non-empty `accept_put` always allows PUT.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hints {
    allows: BTreeSet<Allow>,
    representations: OrderedSet<String>,
    accept_put: OrderedSet<String>,
    accept_post: OrderedSet<String>,
    precondition_req: OrderedSet<Precondition>,
    auth_req: OrderedSet<Authentication>,
    status: Status,
    docs: Docs,
}

impl Hints {
    /// Create hints, checking the accept-put / accept-post invariant.
    ///
    /// # Errors
    ///
    /// Returns `HintsError::AcceptPostWithoutPost` if `accept_post` is
    /// non-empty but POST is not allowed, and `HintsError::AcceptPutWithoutPut`
    /// for the same situation with PUT.
    pub fn new(
        allows: impl IntoIterator<Item = Allow>,
        representations: impl IntoIterator<Item = String>,
        accept_put: impl IntoIterator<Item = String>,
        accept_post: impl IntoIterator<Item = String>,
        precondition_req: impl IntoIterator<Item = Precondition>,
        status: Status,
        docs: Docs,
    ) -> Result<Self, HintsError> {
        Self::builder()
            .allows(allows)
            .representations(representations)
            .accept_put(accept_put)
            .accept_post(accept_post)
            .precondition_req(precondition_req)
            .status(status)
            .docs(docs)
            .build()
    }

    pub fn builder() -> HintsBuilder {
        HintsBuilder::default()
    }

    /// Allowed HTTP methods.
    pub fn allows(&self) -> &BTreeSet<Allow> {
        &self.allows
    }

    /// Media types of the available representations, in order of preference.
    pub fn representations(&self) -> &OrderedSet<String> {
        &self.representations
    }

    /// Media types accepted as PUT request bodies.
    pub fn accept_put(&self) -> &OrderedSet<String> {
        &self.accept_put
    }

    /// Media types accepted as POST request bodies.
    pub fn accept_post(&self) -> &OrderedSet<String> {
        &self.accept_post
    }

    pub fn precondition_req(&self) -> &OrderedSet<Precondition> {
        &self.precondition_req
    }

    pub fn auth_req(&self) -> &OrderedSet<Authentication> {
        &self.auth_req
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn docs(&self) -> &Docs {
        &self.docs
    }

    /// Copy of these hints with different documentation.
    pub fn with_docs(&self, docs: Docs) -> Hints {
        Hints {
            docs,
            ..self.clone()
        }
    }

    /// Merge the hints of two mappings of the same relation type.
    ///
    /// Allowed methods are united; list fields keep their first-seen order
    /// and drop duplicates; status and docs use their own merge rules. The
    /// result satisfies the accept-put / accept-post invariant whenever both
    /// operands do.
    pub fn merge_with(&self, other: &Hints) -> Hints {
        Hints {
            allows: self.allows.union(&other.allows).copied().collect(),
            representations: self.representations.union(&other.representations),
            accept_put: self.accept_put.union(&other.accept_put),
            accept_post: self.accept_post.union(&other.accept_post),
            precondition_req: self.precondition_req.union(&other.precondition_req),
            auth_req: self.auth_req.union(&other.auth_req),
            status: self.status.merge_with(other.status),
            docs: self.docs.merge_with(&other.docs),
        }
    }

    fn check(&self) -> Result<(), HintsError> {
        if !self.accept_post.is_empty() && !self.allows.contains(&Allow::Post) {
            return Err(HintsError::AcceptPostWithoutPost);
        }
        if !self.accept_put.is_empty() && !self.allows.contains(&Allow::Put) {
            return Err(HintsError::AcceptPutWithoutPut);
        }
        Ok(())
    }
}

impl fmt::Display for Hints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let allows: Vec<&str> = self.allows.iter().map(Allow::as_str).collect();
        write!(
            f,
            "Hints{{allows={:?}, representations={:?}, acceptPut={:?}, acceptPost={:?}, \
             preconditionReq={:?}, authReq={:?}, status={}, docs={}}}",
            allows,
            self.representations.as_slice(),
            self.accept_put.as_slice(),
            self.accept_post.as_slice(),
            self.precondition_req.as_slice(),
            self.auth_req.as_slice(),
            self.status,
            self.docs
        )
    }
}

/// Builder for [`Hints`]; validation happens in [`HintsBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct HintsBuilder {
    hints: Hints,
}

impl HintsBuilder {
    pub fn allow(mut self, method: Allow) -> Self {
        self.hints.allows.insert(method);
        self
    }

    pub fn allows(mut self, methods: impl IntoIterator<Item = Allow>) -> Self {
        self.hints.allows.extend(methods);
        self
    }

    pub fn representations<S: Into<String>>(mut self, media: impl IntoIterator<Item = S>) -> Self {
        for m in media {
            self.hints.representations.insert(m.into());
        }
        self
    }

    pub fn accept_put<S: Into<String>>(mut self, media: impl IntoIterator<Item = S>) -> Self {
        for m in media {
            self.hints.accept_put.insert(m.into());
        }
        self
    }

    pub fn accept_post<S: Into<String>>(mut self, media: impl IntoIterator<Item = S>) -> Self {
        for m in media {
            self.hints.accept_post.insert(m.into());
        }
        self
    }

    pub fn precondition_req(
        mut self,
        preconditions: impl IntoIterator<Item = Precondition>,
    ) -> Self {
        for p in preconditions {
            self.hints.precondition_req.insert(p);
        }
        self
    }

    pub fn auth_req(mut self, auth: impl IntoIterator<Item = Authentication>) -> Self {
        for a in auth {
            self.hints.auth_req.insert(a);
        }
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.hints.status = status;
        self
    }

    pub fn docs(mut self, docs: Docs) -> Self {
        self.hints.docs = docs;
        self
    }

    /// Validate and return the hints.
    pub fn build(self) -> Result<Hints, HintsError> {
        self.hints.check()?;
        Ok(self.hints)
    }
}
