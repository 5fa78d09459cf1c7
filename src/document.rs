//! The assembled json-home document.

use std::collections::HashMap;

use url::Url;

use crate::link::ResourceLink;

/// Ordered mapping from relation type to merged resource link.
///
/// Iteration order is the order in which relation types were first seen by
/// the assembler. Built once and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonHome {
    links: Vec<ResourceLink>,
    index: HashMap<Url, usize>,
}

impl JsonHome {
    /// Document with no resources.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_links(links: Vec<ResourceLink>) -> Self {
        let index = links
            .iter()
            .enumerate()
            .map(|(i, link)| (link.relation_type().clone(), i))
            .collect();
        Self { links, index }
    }

    pub fn get(&self, relation_type: &Url) -> Option<&ResourceLink> {
        self.index.get(relation_type).map(|&i| &self.links[i])
    }

    pub fn contains(&self, relation_type: &Url) -> bool {
        self.index.contains_key(relation_type)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceLink> {
        self.links.iter()
    }

    pub fn relation_types(&self) -> impl Iterator<Item = &Url> {
        self.links.iter().map(ResourceLink::relation_type)
    }

    pub fn resources(&self) -> &[ResourceLink] {
        &self.links
    }
}

impl<'a> IntoIterator for &'a JsonHome {
    type Item = &'a ResourceLink;
    type IntoIter = std::slice::Iter<'a, ResourceLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}
