//! Accepted nodes of a run, with duplicate-label reporting and tag selection.

use crate::builder::BuiltComponent;
use crate::core::Node;
use crate::diagnostics::{Diagnostics, WarningKind};
use std::collections::HashMap;

/// Label occurrences across a whole run, shared by every catalog of the run.
#[derive(Debug, Default)]
pub struct LabelRegistry {
    counts: HashMap<String, usize>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `label`; every repeat emits one warning.
    pub fn record(&mut self, label: &str, diagnostics: &mut Diagnostics) {
        let count = self.counts.entry(label.to_string()).or_insert(0);
        *count += 1;
        if *count > 1 {
            diagnostics.warn(
                WarningKind::DuplicateLabel,
                label,
                format!("label seen {} times; components with the same label are all kept", count),
            );
        }
    }
}

#[derive(Debug)]
pub struct NodeCatalog<'a> {
    entries: Vec<BuiltComponent>,
    labels: &'a mut LabelRegistry,
}

impl<'a> NodeCatalog<'a> {
    pub fn new(labels: &'a mut LabelRegistry) -> Self {
        Self {
            entries: Vec::new(),
            labels,
        }
    }

    /// Accept a component. Repeated labels are kept and reported.
    pub fn insert(&mut self, component: BuiltComponent, diagnostics: &mut Diagnostics) {
        self.labels.record(&component.node.text, diagnostics);
        self.entries.push(component);
    }

    pub fn extend(
        &mut self,
        components: impl IntoIterator<Item = BuiltComponent>,
        diagnostics: &mut Diagnostics,
    ) {
        for component in components {
            self.insert(component, diagnostics);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nodes whose tag equals `tag`; every node when `tag` is empty.
    pub fn select(self, tag: &str) -> Vec<Node> {
        let tag = tag.trim();
        self.entries
            .into_iter()
            .filter(|component| tag.is_empty() || component.meta.tag == tag)
            .map(|component| component.node)
            .collect()
    }
}
