//! Route path splitter: segment chains of app routes
//!
//! App routes have no loader tree; the chain comes straight from the route
//! path, and only the last segment is backed by the route's handler module.

use tracing::debug;

use crate::attach::attach_segment_config;
use crate::collect::{AppRouteEntry, SegmentCollector};
use crate::error::{CollectError, Result};
use crate::segment::{is_dynamic_route_segment, Segment};

impl SegmentCollector {
    /// Collects the segments of an app route from its path
    ///
    /// `/blog/[id]` yields `blog` and `[id]`; the handler's file path and
    /// config land on `[id]`.
    pub fn collect_route_segments(&self, entry: &AppRouteEntry) -> Result<Vec<Segment>> {
        let route = entry.definition.pathname.as_str();

        // The first part is the empty string before the leading `/`
        let mut segments: Vec<Segment> = route
            .split('/')
            .skip(1)
            .map(|name| self.route_segment(name))
            .collect();

        let Some(last) = segments.last_mut() else {
            return Err(CollectError::invariant("Expected at least one segment", route));
        };

        last.file_path = Some(entry.definition.filename.clone());
        attach_segment_config(last, entry.module.as_ref(), route, self.config_parser.as_ref())?;

        debug!(route, segments = segments.len(), "Collected route segments");
        Ok(segments)
    }

    fn route_segment(&self, name: &str) -> Segment {
        Segment {
            name: name.to_string(),
            param: (self.param_extractor)(name).map(|p| p.param),
            file_path: None,
            config: None,
            is_dynamic_segment: is_dynamic_route_segment(name),
            generate_static_params: None,
        }
    }
}
