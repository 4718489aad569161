//! Segment modules and their resolution
//!
//! A segment module is the implementation backing one node of the route tree
//! (its layout or page). The collector never inspects an arbitrary object:
//! loaders hand it a [`SegmentModule`], a validated bundle of the capabilities
//! collection cares about.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::tree::{LoaderTree, DEFAULT_SEGMENT_KEY};
use crate::BoxFuture;

/// Value bound to a route parameter
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// `[id]` segments
    Single(String),
    /// `[...slug]` and `[[...slug]]` segments
    Multiple(Vec<String>),
}

/// Parameter name → value mapping
pub type Params = BTreeMap<String, ParamValue>;

type StaticParamsFn = dyn Fn(Params) -> BoxFuture<'static, Result<Vec<Params>>> + Send + Sync;

/// Callback producing the parameter sets a segment can be prerendered with
///
/// Opaque to the collector: it is bound to a segment and handed to static
/// export planning, which calls it with the params of the parent segments.
#[derive(Clone)]
pub struct GenerateStaticParams(Arc<StaticParamsFn>);

impl GenerateStaticParams {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Params>>> + Send + 'static,
    {
        GenerateStaticParams(Arc::new(
            move |parent: Params| -> BoxFuture<'static, Result<Vec<Params>>> {
                Box::pin(f(parent))
            },
        ))
    }

    /// Invoke the generator with the params resolved for parent segments
    pub async fn call(&self, parent: Params) -> Result<Vec<Params>> {
        (self.0)(parent).await
    }

    /// Whether two handles refer to the same generator
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for GenerateStaticParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GenerateStaticParams(..)")
    }
}

/// Loaded implementation module of a segment
#[derive(Debug, Clone, Default)]
pub struct SegmentModule {
    exports: Map<String, Value>,
    generate_static_params: Option<GenerateStaticParams>,
    client_reference: bool,
}

impl SegmentModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a literal export such as `revalidate` or `runtime`
    pub fn with_export(mut self, name: impl Into<String>, value: Value) -> Self {
        self.exports.insert(name.into(), value);
        self
    }

    /// Replaces all literal exports at once
    pub fn with_exports(mut self, exports: Map<String, Value>) -> Self {
        self.exports = exports;
        self
    }

    pub fn with_generate_static_params(mut self, generator: GenerateStaticParams) -> Self {
        self.generate_static_params = Some(generator);
        self
    }

    /// Marks the module as a client reference (compiled for the browser only)
    pub fn client_reference(mut self) -> Self {
        self.client_reference = true;
        self
    }

    pub fn exports(&self) -> &Map<String, Value> {
        &self.exports
    }

    pub fn generate_static_params(&self) -> Option<&GenerateStaticParams> {
        self.generate_static_params.as_ref()
    }

    /// Client reference modules cannot declare server-side segment config
    pub fn is_client_reference(&self) -> bool {
        self.client_reference
    }
}

/// Default client-only detector
pub fn is_client_reference(module: Option<&SegmentModule>) -> bool {
    module.map_or(false, SegmentModule::is_client_reference)
}

type ModuleLoaderFn = dyn Fn() -> BoxFuture<'static, Result<Option<SegmentModule>>> + Send + Sync;

/// Reference to a module file, loaded on demand
///
/// A loader resolving to `None` stands for a module that did not load into
/// anything meaningful; the segment keeps its file path but gets no config.
#[derive(Clone)]
pub struct ModuleRef {
    file_path: String,
    loader: Arc<ModuleLoaderFn>,
}

impl ModuleRef {
    /// A module reference backed by an async loader
    pub fn lazy<F, Fut>(file_path: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<SegmentModule>>> + Send + 'static,
    {
        ModuleRef {
            file_path: file_path.into(),
            loader: Arc::new(
                move || -> BoxFuture<'static, Result<Option<SegmentModule>>> { Box::pin(loader()) },
            ),
        }
    }

    /// A module reference whose module is already in memory
    pub fn ready(file_path: impl Into<String>, module: SegmentModule) -> Self {
        Self::lazy(file_path, move || {
            let module = module.clone();
            async move { Ok(Some(module)) }
        })
    }

    /// A module reference whose module yields nothing usable
    pub fn empty(file_path: impl Into<String>) -> Self {
        Self::lazy(file_path, || async { Ok(None) })
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub async fn load(&self) -> Result<Option<SegmentModule>> {
        (self.loader)().await
    }
}

impl fmt::Debug for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRef")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

/// Module and file path backing a tree node
#[derive(Debug, Clone, Default)]
pub struct ResolvedModule {
    pub module: Option<SegmentModule>,
    pub file_path: Option<String>,
}

/// Resolves the implementation module of a loader tree node
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    async fn resolve(&self, tree: &LoaderTree) -> Result<ResolvedModule>;
}

/// Default resolver: a node's layout wins over its page
///
/// The `default` module is only considered for the default segment
/// (`__DEFAULT__`), which fills parallel slots that have no matching page.
#[derive(Debug, Clone)]
pub struct LayoutOrPageResolver {
    default_segment_key: String,
}

impl LayoutOrPageResolver {
    pub fn new(default_segment_key: impl Into<String>) -> Self {
        LayoutOrPageResolver {
            default_segment_key: default_segment_key.into(),
        }
    }
}

impl Default for LayoutOrPageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_KEY)
    }
}

#[async_trait]
impl ModuleResolver for LayoutOrPageResolver {
    async fn resolve(&self, tree: &LoaderTree) -> Result<ResolvedModule> {
        let modules = &tree.modules;
        let chosen = modules.layout.as_ref().or(modules.page.as_ref()).or_else(|| {
            if tree.segment == self.default_segment_key {
                modules.default_page.as_ref()
            } else {
                None
            }
        });

        let Some(module_ref) = chosen else {
            return Ok(ResolvedModule::default());
        };

        Ok(ResolvedModule {
            module: module_ref.load().await?,
            file_path: Some(module_ref.file_path().to_string()),
        })
    }
}
