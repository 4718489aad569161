//! Segment records produced by collection

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::module::GenerateStaticParams;
use crate::segment_config::SegmentConfig;

/// Tree node names are dynamic when they end in a bracketed placeholder,
/// which also covers interception-prefixed names like `(.)[id]`
static TREE_DYNAMIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*\]$").expect("valid tree segment regex"));

/// Route path parts are dynamic only when fully wrapped in brackets
static ROUTE_DYNAMIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[.*\]$").expect("valid route segment regex"));

/// One unit of a route's segment chain
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Raw segment name as declared in the tree or path
    pub name: String,
    /// Dynamic parameter name, when the extractor found one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Backing module file; absent for structural nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Only set when the module declared at least one recognized directive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<SegmentConfig>,
    pub is_dynamic_segment: bool,
    #[serde(skip)]
    pub generate_static_params: Option<GenerateStaticParams>,
}

impl Segment {
    pub fn new(name: impl Into<String>) -> Self {
        Segment {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn has_generate_static_params(&self) -> bool {
        self.generate_static_params.is_some()
    }
}

/// Dynamic check used for loader tree nodes (trailing placeholder)
pub fn is_dynamic_tree_segment(name: &str) -> bool {
    TREE_DYNAMIC_SEGMENT.is_match(name)
}

/// Dynamic check used for route path parts (whole part is a placeholder)
pub fn is_dynamic_route_segment(name: &str) -> bool {
    ROUTE_DYNAMIC_SEGMENT.is_match(name)
}
