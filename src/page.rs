use std::collections::{BTreeMap, BTreeSet};

/// Element groups the applicator may hide directly, for content that
/// re-renders as the user navigates within a single-page app.
///
/// The concrete selectors that locate these on a real page are site-specific
/// configuration owned by the embedding shell, not part of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureTarget {
    ShortsShelf,
    RelatedVideos,
    Comments,
    Recommendations,
    Trends,
}

/// The live page representation the applicator reconciles against.
///
/// Markers are the applicator's only persistent memory: correct state must
/// be reconstructible from settings and the current decision alone, so every
/// operation here is safe to repeat.
pub trait Page {
    /// Set a presence marker. Setting an already-set marker is a no-op.
    fn set_marker(&mut self, marker: &str);

    /// Clear a presence marker. Clearing an absent marker is a no-op.
    fn clear_marker(&mut self, marker: &str);

    fn has_marker(&self, marker: &str) -> bool;

    /// Hide every currently-present element in the group, reporting how many
    /// were newly hidden. An empty or missing group is a normal transient
    /// state (the page may not have rendered yet), never a fault.
    fn hide_matching(&mut self, target: FeatureTarget) -> usize;
}

/// In-memory page model used by tests and the watch loop.
#[derive(Debug, Default)]
pub struct MemoryPage {
    markers: BTreeSet<String>,
    elements: BTreeMap<FeatureTarget, Vec<bool>>, // true = hidden
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate lazily-rendered content arriving in a group.
    pub fn insert_elements(&mut self, target: FeatureTarget, count: usize) {
        self.elements
            .entry(target)
            .or_default()
            .extend(std::iter::repeat_n(false, count));
    }

    pub fn markers(&self) -> Vec<String> {
        self.markers.iter().cloned().collect()
    }

    pub fn hidden_count(&self, target: FeatureTarget) -> usize {
        self.elements
            .get(&target)
            .map(|group| group.iter().filter(|hidden| **hidden).count())
            .unwrap_or(0)
    }

    pub fn visible_count(&self, target: FeatureTarget) -> usize {
        self.elements
            .get(&target)
            .map(|group| group.iter().filter(|hidden| !**hidden).count())
            .unwrap_or(0)
    }
}

impl Page for MemoryPage {
    fn set_marker(&mut self, marker: &str) {
        if self.markers.insert(marker.to_string()) {
            tracing::debug!("marker set: {}", marker);
        }
    }

    fn clear_marker(&mut self, marker: &str) {
        if self.markers.remove(marker) {
            tracing::debug!("marker cleared: {}", marker);
        }
    }

    fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    fn hide_matching(&mut self, target: FeatureTarget) -> usize {
        let Some(group) = self.elements.get_mut(&target) else {
            return 0;
        };

        let mut newly_hidden = 0;
        for hidden in group.iter_mut() {
            if !*hidden {
                *hidden = true;
                newly_hidden += 1;
            }
        }
        newly_hidden
    }
}
