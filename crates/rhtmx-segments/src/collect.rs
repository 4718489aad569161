//! Loaded routes and the segment collector that dispatches over them

use std::fmt;
use std::sync::Arc;

use crate::config::CollectorConfig;
use crate::error::{CollectError, Result};
use crate::module::{is_client_reference, LayoutOrPageResolver, ModuleResolver, SegmentModule};
use crate::param::{segment_param, ParamExtractor};
use crate::segment::Segment;
use crate::segment_config::{AppSegmentConfigParser, ConfigParser};
use crate::tree::{LoaderTree, PAGE_SEGMENT_KEY};

/// Signature of a client-only module detector
pub type ClientDetector = fn(Option<&SegmentModule>) -> bool;

/// Where a route lives and which file implements it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    /// Route path such as `/blog/[slug]`
    pub pathname: String,
    /// Implementation file of the route
    pub filename: String,
}

impl RouteDefinition {
    pub fn new(pathname: impl Into<String>, filename: impl Into<String>) -> Self {
        RouteDefinition {
            pathname: pathname.into(),
            filename: filename.into(),
        }
    }
}

/// An endpoint route: one handler module, no tree
#[derive(Debug, Clone)]
pub struct AppRouteEntry {
    pub definition: RouteDefinition,
    pub module: Option<SegmentModule>,
}

/// A page route realized by a loader tree
#[derive(Debug, Clone)]
pub struct AppPageEntry {
    pub definition: RouteDefinition,
    pub loader_tree: LoaderTree,
}

/// Kinds of routes a build can load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    AppPage,
    AppRoute,
    Pages,
    PagesApi,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteKind::AppPage => "APP_PAGE",
            RouteKind::AppRoute => "APP_ROUTE",
            RouteKind::Pages => "PAGES",
            RouteKind::PagesApi => "PAGES_API",
        };
        f.write_str(name)
    }
}

/// A route handed over by the loader
///
/// Only app pages and app routes carry segments; the pages-router kinds are
/// listed so callers can pass anything they load and get an invariant error
/// instead of silently empty output.
#[derive(Debug, Clone)]
pub enum LoadedRoute {
    AppPage(AppPageEntry),
    AppRoute(AppRouteEntry),
    Pages(RouteDefinition),
    PagesApi(RouteDefinition),
}

impl LoadedRoute {
    pub fn kind(&self) -> RouteKind {
        match self {
            LoadedRoute::AppPage(_) => RouteKind::AppPage,
            LoadedRoute::AppRoute(_) => RouteKind::AppRoute,
            LoadedRoute::Pages(_) => RouteKind::Pages,
            LoadedRoute::PagesApi(_) => RouteKind::PagesApi,
        }
    }

    pub fn definition(&self) -> &RouteDefinition {
        match self {
            LoadedRoute::AppPage(entry) => &entry.definition,
            LoadedRoute::AppRoute(entry) => &entry.definition,
            LoadedRoute::Pages(definition) | LoadedRoute::PagesApi(definition) => definition,
        }
    }

    pub fn pathname(&self) -> &str {
        &self.definition().pathname
    }

    pub fn is_app_page(&self) -> bool {
        matches!(self, LoadedRoute::AppPage(_))
    }

    pub fn is_app_route(&self) -> bool {
        matches!(self, LoadedRoute::AppRoute(_))
    }
}

/// Collects the segments of loaded routes
///
/// Holds the collaborators collection depends on. `SegmentCollector::default()`
/// wires the built-in ones; each can be swapped with a `with_*` builder.
///
/// # Examples
///
/// ```
/// use rhtmx_segments::{AppRouteEntry, RouteDefinition, SegmentCollector};
///
/// let entry = AppRouteEntry {
///     definition: RouteDefinition::new("/api/health", "app/api/health/route.rs"),
///     module: None,
/// };
///
/// let segments = SegmentCollector::default().collect_route_segments(&entry).unwrap();
///
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[1].file_path.as_deref(), Some("app/api/health/route.rs"));
/// ```
#[derive(Clone)]
pub struct SegmentCollector {
    pub(crate) resolver: Arc<dyn ModuleResolver>,
    pub(crate) config_parser: Arc<dyn ConfigParser>,
    pub(crate) param_extractor: ParamExtractor,
    pub(crate) client_detector: ClientDetector,
    pub(crate) page_segment_key: String,
}

impl Default for SegmentCollector {
    fn default() -> Self {
        SegmentCollector {
            resolver: Arc::new(LayoutOrPageResolver::default()),
            config_parser: Arc::new(AppSegmentConfigParser),
            param_extractor: segment_param,
            client_detector: is_client_reference,
            page_segment_key: PAGE_SEGMENT_KEY.to_string(),
        }
    }
}

impl fmt::Debug for SegmentCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentCollector")
            .field("page_segment_key", &self.page_segment_key)
            .finish_non_exhaustive()
    }
}

impl SegmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector using the segment keys from rhtmx.toml
    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::default()
            .with_resolver(LayoutOrPageResolver::new(config.default_segment_key.clone()))
            .with_page_segment_key(config.page_segment_key.clone())
    }

    pub fn with_resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_config_parser(mut self, parser: impl ConfigParser + 'static) -> Self {
        self.config_parser = Arc::new(parser);
        self
    }

    pub fn with_param_extractor(mut self, extractor: ParamExtractor) -> Self {
        self.param_extractor = extractor;
        self
    }

    pub fn with_client_detector(mut self, detector: ClientDetector) -> Self {
        self.client_detector = detector;
        self
    }

    pub fn with_page_segment_key(mut self, key: impl Into<String>) -> Self {
        self.page_segment_key = key.into();
        self
    }

    pub fn page_segment_key(&self) -> &str {
        &self.page_segment_key
    }

    /// Collects the segments of any loaded route
    ///
    /// App routes are split from their path, app pages are walked from their
    /// loader tree. Pages-router kinds are an invariant violation.
    pub async fn collect(&self, route: &LoadedRoute) -> Result<Vec<Segment>> {
        match route {
            LoadedRoute::AppRoute(entry) => self.collect_route_segments(entry),
            LoadedRoute::AppPage(entry) => self.collect_page_segments(entry).await,
            LoadedRoute::Pages(_) | LoadedRoute::PagesApi(_) => Err(CollectError::invariant(
                format!(
                    "Expected a route to be either an app page or an app route, received {}",
                    route.kind()
                ),
                route.pathname(),
            )),
        }
    }
}

/// Collects the segments of a loaded route with the default collaborators
pub async fn collect_segments(route: &LoadedRoute) -> Result<Vec<Segment>> {
    SegmentCollector::default().collect(route).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_kind_display() {
        assert_eq!(RouteKind::AppPage.to_string(), "APP_PAGE");
        assert_eq!(RouteKind::PagesApi.to_string(), "PAGES_API");
    }

    #[test]
    fn test_loaded_route_accessors() {
        let route = LoadedRoute::AppPage(AppPageEntry {
            definition: RouteDefinition::new("/blog", "app/blog/page.rs"),
            loader_tree: LoaderTree::new(""),
        });
        assert!(route.is_app_page());
        assert!(!route.is_app_route());
        assert_eq!(route.kind(), RouteKind::AppPage);
        assert_eq!(route.pathname(), "/blog");
    }

    #[tokio::test]
    async fn test_pages_router_kinds_are_invariant_errors() {
        for route in [
            LoadedRoute::Pages(RouteDefinition::new("/about", "pages/about.rs")),
            LoadedRoute::PagesApi(RouteDefinition::new("/api/user", "pages/api/user.rs")),
        ] {
            let err = collect_segments(&route).await.unwrap_err();
            assert!(err.is_invariant());
            assert!(err.to_string().contains(&route.kind().to_string()));
            assert!(err.to_string().contains(route.pathname()));
        }
    }

    #[test]
    fn test_from_config_applies_page_key() {
        let config = CollectorConfig {
            page_segment_key: "$page".to_string(),
            ..Default::default()
        };
        assert_eq!(SegmentCollector::from_config(&config).page_segment_key(), "$page");
    }
}
