//! Configuration for Toolstream.
//!
//! Settings live in `.toolstream/config.yaml`. Every field is optional and
//! `TOOLSTREAM_*` environment variables override the file.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_sensible_values() {
        let config = ToolstreamConfig::default();
        assert_eq!(config.store.max_streams, None);
        assert_eq!(config.store.max_argument_bytes, None);
        assert_eq!(config.parser.max_depth, 128);
    }

    #[test]
    fn test_config_serializes_to_yaml() {
        let mut config = ToolstreamConfig::default();
        config.store.max_streams = Some(16);
        let yaml = serde_yaml::to_string(&config).unwrap();

        assert!(yaml.contains("store:"));
        assert!(yaml.contains("max_streams: 16"));
        assert!(!yaml.contains("max_argument_bytes"));
        assert!(yaml.contains("max_depth: 128"));
    }

    #[test]
    fn test_partial_configs_merge_with_defaults() {
        let partial_yaml = r#"
store:
  max_argument_bytes: 4096
"#;
        let config: ToolstreamConfig = serde_yaml::from_str(partial_yaml).unwrap();

        assert_eq!(config.store.max_argument_bytes, Some(4096));
        assert_eq!(config.store.max_streams, None);
        assert_eq!(config.parser.max_depth, DEFAULT_MAX_DEPTH);
    }
}
