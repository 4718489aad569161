//! Attaches segment config and static params generators to segments

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::module::SegmentModule;
use crate::segment::Segment;
use crate::segment_config::ConfigParser;

/// Reads config and `generateStaticParams` from a module into `segment`
///
/// A missing module is not an error: the segment simply gets nothing.
/// `segment.config` is only set when at least one recognized directive was
/// declared. A generator combined with an edge runtime fails the whole
/// collection for `route`.
///
/// # Examples
///
/// ```
/// use rhtmx_segments::attach::attach_segment_config;
/// use rhtmx_segments::segment_config::AppSegmentConfigParser;
/// use rhtmx_segments::{Segment, SegmentModule};
/// use serde_json::json;
///
/// let module = SegmentModule::new().with_export("revalidate", json!(30));
/// let mut segment = Segment::new("blog");
///
/// attach_segment_config(&mut segment, Some(&module), "/blog", &AppSegmentConfigParser).unwrap();
/// assert!(segment.config.is_some());
/// ```
pub fn attach_segment_config(
    segment: &mut Segment,
    module: Option<&SegmentModule>,
    route: &str,
    parser: &dyn ConfigParser,
) -> Result<(), ConfigError> {
    let Some(module) = module else {
        return Ok(());
    };

    let config = parser.parse(module, route)?;
    if !config.is_empty() {
        debug!(segment = %segment.name, route, ?config, "Attached segment config");
        segment.config = Some(config);
    }

    if let Some(generator) = module.generate_static_params() {
        segment.generate_static_params = Some(generator.clone());

        // Must run after the config above is assigned
        if segment.config.as_ref().map_or(false, |c| c.is_edge_runtime()) {
            warn!(segment = %segment.name, route, "generateStaticParams declared on an edge runtime segment");
            return Err(ConfigError::EdgeRuntimeWithStaticParams {
                route: route.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{GenerateStaticParams, Params};
    use crate::segment_config::{AppSegmentConfigParser, Runtime};
    use serde_json::json;

    fn generator() -> GenerateStaticParams {
        GenerateStaticParams::new(|_| async { Ok(Vec::<Params>::new()) })
    }

    #[test]
    fn test_missing_module_is_noop() {
        let mut segment = Segment::new("blog");
        attach_segment_config(&mut segment, None, "/blog", &AppSegmentConfigParser).unwrap();
        assert!(segment.config.is_none());
        assert!(segment.generate_static_params.is_none());
    }

    #[test]
    fn test_empty_config_stays_unset() {
        let module = SegmentModule::new().with_export("metadata", json!({ "title": "Blog" }));
        let mut segment = Segment::new("blog");
        attach_segment_config(&mut segment, Some(&module), "/blog", &AppSegmentConfigParser)
            .unwrap();
        assert!(segment.config.is_none());
    }

    #[test]
    fn test_generator_is_bound_without_config() {
        let module = SegmentModule::new().with_generate_static_params(generator());
        let mut segment = Segment::new("[slug]");
        attach_segment_config(&mut segment, Some(&module), "/blog/[slug]", &AppSegmentConfigParser)
            .unwrap();
        assert!(segment.config.is_none());
        assert!(segment.has_generate_static_params());
    }

    #[test]
    fn test_generator_with_nodejs_runtime_is_allowed() {
        let module = SegmentModule::new()
            .with_export("runtime", json!("nodejs"))
            .with_generate_static_params(generator());
        let mut segment = Segment::new("[slug]");
        attach_segment_config(&mut segment, Some(&module), "/blog/[slug]", &AppSegmentConfigParser)
            .unwrap();
        assert_eq!(segment.config.unwrap().runtime, Some(Runtime::NodeJs));
        assert!(segment.generate_static_params.is_some());
    }

    #[test]
    fn test_generator_with_edge_runtime_fails() {
        for runtime in ["edge", "experimental-edge"] {
            let module = SegmentModule::new()
                .with_export("runtime", json!(runtime))
                .with_generate_static_params(generator());
            let mut segment = Segment::new("[slug]");
            let err = attach_segment_config(
                &mut segment,
                Some(&module),
                "/blog/[slug]",
                &AppSegmentConfigParser,
            )
            .unwrap_err();
            assert_eq!(
                err,
                ConfigError::EdgeRuntimeWithStaticParams {
                    route: "/blog/[slug]".to_string()
                }
            );
        }
    }

    #[test]
    fn test_edge_runtime_without_generator_is_allowed() {
        let module = SegmentModule::new().with_export("runtime", json!("edge"));
        let mut segment = Segment::new("api");
        attach_segment_config(&mut segment, Some(&module), "/api", &AppSegmentConfigParser)
            .unwrap();
        assert_eq!(segment.config.unwrap().runtime, Some(Runtime::Edge));
    }

    #[test]
    fn test_parser_error_propagates_unchanged() {
        let module = SegmentModule::new().with_export("maxDuration", json!("forever"));
        let mut segment = Segment::new("slow");
        let err = attach_segment_config(&mut segment, Some(&module), "/slow", &AppSegmentConfigParser)
            .unwrap_err();
        assert_eq!(err.route(), "/slow");
        assert!(matches!(err, ConfigError::InvalidOptions { .. }));
        assert!(segment.config.is_none());
    }
}
