//! # RHTMX Segments
//!
//! Collects the route segments that make up an app page or an app route, in
//! declaration order, along with the build-time configuration each segment's
//! module declares.
//!
//! - **App pages** are walked from their loader tree (layouts, pages and
//!   parallel slots). Each page leaf yields one root-to-leaf chain.
//! - **App routes** are split from their path; the handler module backs the
//!   last segment.
//! - For every segment backed by a server module, the declared config
//!   (`revalidate`, `runtime`, `dynamic`, ...) and `generateStaticParams`
//!   are attached. Declaring `generateStaticParams` on an edge runtime segment
//!   fails collection.
//!
//! The output feeds static export planning and manifest writing. Nothing here
//! runs handlers or generates param values.
//!
//! ## Example
//!
//! ```
//! use rhtmx_segments::{
//!     collect_segments, AppPageEntry, LoadedRoute, LoaderTree, ModuleRef, RouteDefinition,
//!     SegmentModule, PAGE_SEGMENT_KEY,
//! };
//! use serde_json::json;
//!
//! # tokio_test_block(async {
//! let page = SegmentModule::new().with_export("revalidate", json!(60));
//! let tree = LoaderTree::new("").with_child(
//!     LoaderTree::new("[slug]").with_child(
//!         LoaderTree::new(PAGE_SEGMENT_KEY).with_page(ModuleRef::ready("app/[slug]/page.rs", page)),
//!     ),
//! );
//!
//! let route = LoadedRoute::AppPage(AppPageEntry {
//!     definition: RouteDefinition::new("/[slug]", "app/[slug]/page.rs"),
//!     loader_tree: tree,
//! });
//!
//! let segments = collect_segments(&route).await.unwrap();
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[1].param.as_deref(), Some("slug"));
//! assert!(segments[2].config.is_some());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod attach;
pub mod collect;
pub mod config;
pub mod error;
pub mod module;
pub mod param;
mod route;
pub mod segment;
pub mod segment_config;
pub mod tree;
mod walker;

pub use collect::{
    collect_segments, AppPageEntry, AppRouteEntry, ClientDetector, LoadedRoute, RouteDefinition,
    RouteKind, SegmentCollector,
};
pub use config::CollectorConfig;
pub use error::{CollectError, ConfigError};
pub use module::{
    GenerateStaticParams, LayoutOrPageResolver, ModuleRef, ModuleResolver, ParamValue, Params,
    ResolvedModule, SegmentModule,
};
pub use param::{segment_param, DynamicParamKind, SegmentParam};
pub use segment::Segment;
pub use segment_config::{
    AppSegmentConfigParser, ConfigParser, DynamicMode, FetchCache, PreferredRegion, Revalidate,
    Runtime, SegmentConfig,
};
pub use tree::{LoaderTree, SegmentModules, DEFAULT_SEGMENT_KEY, PAGE_SEGMENT_KEY};

/// Boxed future used at the async seams (module loaders, recursive walks)
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
