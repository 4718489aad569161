//! Segment configuration: recognized build directives exported by a segment module
//!
//! A segment module exports literal values (`revalidate = 60`,
//! `runtime = "edge"`, ...). The [`ConfigParser`] turns those raw exports into a
//! normalized [`SegmentConfig`], rejecting invalid values with an error scoped
//! to the route being collected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::error::ConfigError;
use crate::module::SegmentModule;

/// Normalized segment configuration
///
/// Every field is optional; a module that declares none of them yields an
/// empty config, which callers never attach to a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<DynamicMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_params: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revalidate: Option<Revalidate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_cache: Option<FetchCache>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Runtime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_region: Option<PreferredRegion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<u64>,

    #[serde(
        default,
        rename = "experimental_ppr",
        skip_serializing_if = "Option::is_none"
    )]
    pub experimental_ppr: Option<bool>,
}

impl SegmentConfig {
    /// Returns true when no recognized directive was declared
    pub fn is_empty(&self) -> bool {
        self == &SegmentConfig::default()
    }

    /// Whether the segment selects an edge-style runtime
    pub fn is_edge_runtime(&self) -> bool {
        self.runtime.map_or(false, Runtime::is_edge)
    }
}

/// `dynamic` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DynamicMode {
    Auto,
    Error,
    ForceStatic,
    ForceDynamic,
}

/// `fetchCache` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchCache {
    Auto,
    DefaultCache,
    OnlyCache,
    ForceCache,
    ForceNoStore,
    DefaultNoStore,
    OnlyNoStore,
}

/// `runtime` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Runtime {
    #[serde(rename = "nodejs")]
    NodeJs,
    #[serde(rename = "edge")]
    Edge,
    #[serde(rename = "experimental-edge")]
    ExperimentalEdge,
}

impl Runtime {
    pub fn is_edge(self) -> bool {
        matches!(self, Runtime::Edge | Runtime::ExperimentalEdge)
    }
}

/// `revalidate` directive: `false` or a whole number of seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Revalidate {
    /// `revalidate = false`: cache indefinitely
    Never,
    /// Revalidate after the given period (zero means always dynamic)
    After(Duration),
}

impl Serialize for Revalidate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Revalidate::Never => serializer.serialize_bool(false),
            Revalidate::After(period) => serializer.serialize_u64(period.as_secs()),
        }
    }
}

impl<'de> Deserialize<'de> for Revalidate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        parse_revalidate(&value).map_err(serde::de::Error::custom)
    }
}

/// `preferredRegion` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferredRegion {
    One(String),
    Many(Vec<String>),
}

/// Normalizes the raw exports of a segment module into a [`SegmentConfig`]
pub trait ConfigParser: Send + Sync {
    /// Parse the module's recognized exports for the given route path
    fn parse(&self, module: &SegmentModule, route: &str) -> Result<SegmentConfig, ConfigError>;
}

/// Default parser for app segment exports
///
/// Recognized keys: `dynamic`, `dynamicParams`, `revalidate`, `fetchCache`,
/// `runtime`, `preferredRegion`, `maxDuration`, `experimental_ppr`. Any other
/// export is ignored. Every invalid field is reported in a single error.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppSegmentConfigParser;

impl ConfigParser for AppSegmentConfigParser {
    fn parse(&self, module: &SegmentModule, route: &str) -> Result<SegmentConfig, ConfigError> {
        parse_segment_config(module.exports(), route)
    }
}

/// Parses recognized directives out of a module's literal exports
pub fn parse_segment_config(
    exports: &Map<String, Value>,
    route: &str,
) -> Result<SegmentConfig, ConfigError> {
    let mut fields = Fields {
        exports,
        issues: Vec::new(),
    };

    let config = SegmentConfig {
        dynamic: fields.take("dynamic", |v| {
            from_value(
                v,
                "expected one of \"auto\", \"error\", \"force-static\", \"force-dynamic\"",
            )
        }),
        dynamic_params: fields.take("dynamicParams", expect_bool),
        revalidate: fields.take("revalidate", parse_revalidate),
        fetch_cache: fields.take("fetchCache", |v| {
            from_value(
                v,
                "expected one of \"auto\", \"default-cache\", \"only-cache\", \"force-cache\", \
                 \"force-no-store\", \"default-no-store\", \"only-no-store\"",
            )
        }),
        runtime: fields.take("runtime", |v| {
            from_value(v, "expected one of \"nodejs\", \"edge\", \"experimental-edge\"")
        }),
        preferred_region: fields.take("preferredRegion", |v| {
            from_value(v, "expected a region string or a list of region strings")
        }),
        max_duration: fields.take("maxDuration", |v| {
            v.as_u64()
                .ok_or_else(|| format!("expected a non-negative integer, received {}", v))
        }),
        experimental_ppr: fields.take("experimental_ppr", expect_bool),
    };

    if !fields.issues.is_empty() {
        return Err(ConfigError::InvalidOptions {
            route: route.to_string(),
            issues: fields.issues,
        });
    }

    Ok(config)
}

/// Field reader that records an issue per invalid value instead of failing fast
struct Fields<'a> {
    exports: &'a Map<String, Value>,
    issues: Vec<String>,
}

impl Fields<'_> {
    fn take<T>(&mut self, key: &str, parse: impl FnOnce(&Value) -> Result<T, String>) -> Option<T> {
        let value = self.exports.get(key)?;
        match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                self.issues.push(format!("{}: {}", key, reason));
                None
            }
        }
    }
}

fn expect_bool(value: &Value) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("expected a boolean, received {}", value))
}

fn from_value<T: serde::de::DeserializeOwned>(value: &Value, expected: &str) -> Result<T, String> {
    serde_json::from_value(value.clone()).map_err(|_| format!("{}, received {}", expected, value))
}

fn parse_revalidate(value: &Value) -> Result<Revalidate, String> {
    match value {
        Value::Bool(false) => Ok(Revalidate::Never),
        Value::Number(n) => n
            .as_u64()
            .map(|secs| Revalidate::After(Duration::from_secs(secs)))
            .ok_or_else(|| format!("expected a non-negative integer, received {}", value)),
        _ => Err(format!("expected false or a non-negative integer, received {}", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn exports(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("exports must be an object"),
        }
    }

    #[test]
    fn test_parse_all_directives() {
        let config = parse_segment_config(
            &exports(json!({
                "dynamic": "force-static",
                "dynamicParams": false,
                "revalidate": 60,
                "fetchCache": "only-cache",
                "runtime": "nodejs",
                "preferredRegion": ["iad1", "sfo1"],
                "maxDuration": 30,
                "experimental_ppr": true,
            })),
            "/blog",
        )
        .unwrap();

        assert_eq!(
            config,
            SegmentConfig {
                dynamic: Some(DynamicMode::ForceStatic),
                dynamic_params: Some(false),
                revalidate: Some(Revalidate::After(Duration::from_secs(60))),
                fetch_cache: Some(FetchCache::OnlyCache),
                runtime: Some(Runtime::NodeJs),
                preferred_region: Some(PreferredRegion::Many(vec![
                    "iad1".to_string(),
                    "sfo1".to_string()
                ])),
                max_duration: Some(30),
                experimental_ppr: Some(true),
            }
        );
    }

    #[test]
    fn test_unrecognized_exports_yield_empty_config() {
        let config =
            parse_segment_config(&exports(json!({ "metadata": { "title": "x" } })), "/").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_revalidate_false_means_never() {
        let config = parse_segment_config(&exports(json!({ "revalidate": false })), "/").unwrap();
        assert_eq!(config.revalidate, Some(Revalidate::Never));
    }

    #[test]
    fn test_revalidate_out_of_range_is_an_issue() {
        let err = parse_segment_config(&exports(json!({ "revalidate": 1e20 })), "/huge")
            .unwrap_err();
        match err {
            ConfigError::InvalidOptions { route, issues } => {
                assert_eq!(route, "/huge");
                assert_eq!(issues.len(), 1);
                assert!(issues[0].starts_with("revalidate:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_revalidate_rejects_fractional_seconds() {
        let err =
            parse_segment_config(&exports(json!({ "revalidate": 1.5 })), "/half").unwrap_err();
        assert_eq!(err.route(), "/half");
    }

    #[test]
    fn test_revalidate_serializes_as_integer() {
        let config = SegmentConfig {
            revalidate: Some(Revalidate::After(Duration::from_secs(60))),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&config).unwrap(), r#"{"revalidate":60}"#);
    }

    #[test]
    fn test_invalid_fields_are_reported_together() {
        let err = parse_segment_config(
            &exports(json!({ "dynamic": "sometimes", "revalidate": -1, "runtime": "deno" })),
            "/docs/[slug]",
        )
        .unwrap_err();

        match err {
            ConfigError::InvalidOptions { route, issues } => {
                assert_eq!(route, "/docs/[slug]");
                assert_eq!(issues.len(), 3);
                assert!(issues[0].starts_with("dynamic:"));
                assert!(issues[1].starts_with("revalidate:"));
                assert!(issues[2].starts_with("runtime:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_edge_runtimes() {
        assert!(Runtime::Edge.is_edge());
        assert!(Runtime::ExperimentalEdge.is_edge());
        assert!(!Runtime::NodeJs.is_edge());
        assert!(!SegmentConfig::default().is_edge_runtime());
    }

    #[test]
    fn test_serializes_only_declared_fields() {
        let config = SegmentConfig {
            revalidate: Some(Revalidate::Never),
            runtime: Some(Runtime::ExperimentalEdge),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({ "revalidate": false, "runtime": "experimental-edge" })
        );
    }
}
