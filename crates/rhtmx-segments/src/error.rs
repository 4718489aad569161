//! Error types for segment collection
//!
//! Two classes of failure surface from a collection pass:
//!
//! - **Invariant violations**: an upstream collaborator broke a structural
//!   guarantee (a route path with no segments, a route kind the collector does
//!   not handle). These abort the build step and are never retried.
//! - **Configuration errors**: the route's own source declares an invalid or
//!   inconsistent segment configuration. These are user-correctable and always
//!   name the offending route.

use thiserror::Error;

/// Failure raised while collecting the segments of a route
#[derive(Debug, Error)]
pub enum CollectError {
    /// Upstream structural guarantee was violated
    #[error("Invariant: {message} (route: {route})")]
    Invariant { message: String, route: String },

    /// A segment declared an invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Resolving or loading a segment module failed
    #[error("Failed to resolve module of segment \"{segment}\" for route {route}: {source}")]
    Resolve {
        route: String,
        segment: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CollectError {
    pub(crate) fn invariant(message: impl Into<String>, route: impl Into<String>) -> Self {
        CollectError::Invariant {
            message: message.into(),
            route: route.into(),
        }
    }

    /// Whether this failure signals a defect upstream rather than a user mistake
    pub fn is_invariant(&self) -> bool {
        matches!(self, CollectError::Invariant { .. })
    }

    /// Whether this failure comes from the route's declared configuration
    pub fn is_config(&self) -> bool {
        matches!(self, CollectError::Config(_))
    }
}

/// Invalid segment configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// One or more recognized fields carried an invalid value
    #[error(
        "Invalid segment configuration options detected for \"{route}\": {}",
        .issues.join("; ")
    )]
    InvalidOptions { route: String, issues: Vec<String> },

    /// `generateStaticParams` was declared by a segment running on the edge runtime
    #[error(
        "Edge runtime is not supported with `generateStaticParams` (route: \"{route}\")"
    )]
    EdgeRuntimeWithStaticParams { route: String },
}

impl ConfigError {
    /// The route path the error was raised for
    pub fn route(&self) -> &str {
        match self {
            ConfigError::InvalidOptions { route, .. } => route,
            ConfigError::EdgeRuntimeWithStaticParams { route } => route,
        }
    }
}

pub type Result<T, E = CollectError> = std::result::Result<T, E>;
