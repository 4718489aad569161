//! Page tree walker: segment chains of app pages
//!
//! Walks the loader tree depth-first, pre-order. Every parallel slot receives
//! its own copy of the chain built so far, so sibling slots never observe each
//! other's segments. A chain is complete when the walk reaches a page leaf.
//!
//! Slots are walked one after another, never concurrently: module resolution
//! may suspend, and the output order must follow the declared slot order.

use tracing::{debug, trace};

use crate::attach::attach_segment_config;
use crate::collect::{AppPageEntry, SegmentCollector};
use crate::error::{CollectError, Result};
use crate::segment::{is_dynamic_tree_segment, Segment};
use crate::tree::LoaderTree;
use crate::BoxFuture;

impl SegmentCollector {
    /// Collects one segment chain per page leaf, root to leaf, in walk order
    pub async fn collect_page_segment_chains(
        &self,
        entry: &AppPageEntry,
    ) -> Result<Vec<Vec<Segment>>> {
        let route = entry.definition.pathname.as_str();
        let chains = self.walk(&entry.loader_tree, route, Vec::new()).await?;
        debug!(route, chains = chains.len(), "Collected page segment chains");
        Ok(chains)
    }

    /// Collects the segments of every page leaf chain, flattened in walk order
    pub async fn collect_page_segments(&self, entry: &AppPageEntry) -> Result<Vec<Segment>> {
        let chains = self.collect_page_segment_chains(entry).await?;
        Ok(chains.into_iter().flatten().collect())
    }

    fn walk<'a>(
        &'a self,
        tree: &'a LoaderTree,
        route: &'a str,
        mut chain: Vec<Segment>,
    ) -> BoxFuture<'a, Result<Vec<Vec<Segment>>>> {
        Box::pin(async move {
            chain.push(self.tree_segment(tree, route).await?);

            let mut chains = Vec::new();
            if tree.segment == self.page_segment_key {
                trace!(route, depth = chain.len(), "Reached page leaf");
                chains.push(chain.clone());
            }

            for (slot, child) in &tree.parallel_routes {
                trace!(route, slot = slot.as_str(), segment = child.segment.as_str(), "Entering slot");
                chains.extend(self.walk(child, route, chain.clone()).await?);
            }

            Ok(chains)
        })
    }

    /// Builds the segment record of a single tree node
    async fn tree_segment(&self, tree: &LoaderTree, route: &str) -> Result<Segment> {
        let resolved = self
            .resolver
            .resolve(tree)
            .await
            .map_err(|source| CollectError::Resolve {
                route: route.to_string(),
                segment: tree.segment.clone(),
                source,
            })?;

        let name = tree.segment.clone();
        debug!(
            segment = %name,
            file_path = resolved.file_path.as_deref().unwrap_or("-"),
            route,
            "Visited tree node"
        );
        let is_dynamic_segment = is_dynamic_tree_segment(&name);
        // Independent of is_dynamic_segment: `post[id]` is dynamic with no param
        let param = if is_dynamic_segment {
            (self.param_extractor)(&name).map(|p| p.param)
        } else {
            None
        };

        let mut segment = Segment {
            name,
            param,
            file_path: resolved.file_path,
            config: None,
            is_dynamic_segment,
            generate_static_params: None,
        };

        let module = resolved.module.as_ref();
        if (self.client_detector)(module) {
            debug!(segment = %segment.name, route, "Skipping config of client module");
        } else {
            attach_segment_config(&mut segment, module, route, self.config_parser.as_ref())?;
        }

        Ok(segment)
    }
}
