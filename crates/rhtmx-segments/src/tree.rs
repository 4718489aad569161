//! Loader tree: the nested layout / page / parallel slot structure of an app page

use crate::module::ModuleRef;

/// Segment name marking a page leaf
pub const PAGE_SEGMENT_KEY: &str = "__PAGE__";

/// Segment name filling a parallel slot that has no matching page
pub const DEFAULT_SEGMENT_KEY: &str = "__DEFAULT__";

/// Key of the implicit slot holding a node's regular children
pub const CHILDREN_SLOT: &str = "children";

/// Modules declared by one tree node
#[derive(Debug, Clone, Default)]
pub struct SegmentModules {
    pub layout: Option<ModuleRef>,
    pub page: Option<ModuleRef>,
    pub default_page: Option<ModuleRef>,
}

/// One node of the loader tree
///
/// `parallel_routes` keeps the declared slot order; the walker visits slots in
/// exactly this order.
///
/// # Examples
///
/// ```
/// use rhtmx_segments::tree::{LoaderTree, PAGE_SEGMENT_KEY};
///
/// let tree = LoaderTree::new("")
///     .with_child(LoaderTree::new("blog").with_child(LoaderTree::new(PAGE_SEGMENT_KEY)));
///
/// assert_eq!(tree.depth(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoaderTree {
    pub segment: String,
    pub parallel_routes: Vec<(String, LoaderTree)>,
    pub modules: SegmentModules,
}

impl LoaderTree {
    pub fn new(segment: impl Into<String>) -> Self {
        LoaderTree {
            segment: segment.into(),
            parallel_routes: Vec::new(),
            modules: SegmentModules::default(),
        }
    }

    /// Adds a node under the `children` slot
    pub fn with_child(self, child: LoaderTree) -> Self {
        self.with_slot(CHILDREN_SLOT, child)
    }

    /// Adds a node under a named parallel slot (`modal` for `@modal`)
    pub fn with_slot(mut self, slot: impl Into<String>, child: LoaderTree) -> Self {
        self.parallel_routes.push((slot.into(), child));
        self
    }

    pub fn with_modules(mut self, modules: SegmentModules) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_layout(mut self, layout: ModuleRef) -> Self {
        self.modules.layout = Some(layout);
        self
    }

    pub fn with_page(mut self, page: ModuleRef) -> Self {
        self.modules.page = Some(page);
        self
    }

    pub fn is_page(&self) -> bool {
        self.segment == PAGE_SEGMENT_KEY
    }

    /// Longest root-to-leaf node count
    pub fn depth(&self) -> usize {
        1 + self
            .parallel_routes
            .iter()
            .map(|(_, child)| child.depth())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_keep_declared_order() {
        let tree = LoaderTree::new("dashboard")
            .with_slot("team", LoaderTree::new("__PAGE__"))
            .with_child(LoaderTree::new("__PAGE__"))
            .with_slot("analytics", LoaderTree::new("__PAGE__"));

        let keys: Vec<&str> = tree.parallel_routes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["team", "children", "analytics"]);
    }

    #[test]
    fn test_depth_and_page_marker() {
        let leaf = LoaderTree::new(PAGE_SEGMENT_KEY);
        assert!(leaf.is_page());
        assert_eq!(leaf.depth(), 1);

        let tree = LoaderTree::new("")
            .with_child(LoaderTree::new("a").with_child(leaf.clone()))
            .with_slot("modal", leaf);
        assert_eq!(tree.depth(), 3);
        assert!(!tree.is_page());
    }
}
