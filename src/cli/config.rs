//! TOML configuration file support.
//!
//! Decoder constants are empirical, so they can be tuned per instrument
//! without recompiling:
//!
//! ```toml
//! # phixps.toml
//! [decoder]
//! marker = "pnt"
//! parallel = true
//!
//! [decoder.probe]
//! type_tag = "f4"
//! alignment_step = 4
//!
//! [decoder.edge]
//! intensity_threshold = 20.0
//!
//! [decoder.plausibility]
//! min_mean = 0.1
//! max_mean = 1e10
//!
//! [export]
//! metadata = true
//! spectra = true
//! delimiter = "\t"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use phixps::export::ExportConfig;
use phixps::phi::DecoderConfig;

use super::DecoderArgs;

/// Root configuration structure for phixps.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Decoder settings.
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Output settings.
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file named by `args` (if any) and apply command-line overrides.
    pub fn resolve(args: &DecoderArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(threshold) = args.threshold {
            config.decoder.edge.intensity_threshold = threshold;
        }
        if let Some(min_mean) = args.min_mean {
            config.decoder.plausibility.min_mean = min_mean;
        }
        if let Some(max_mean) = args.max_mean {
            config.decoder.plausibility.max_mean = max_mean;
        }
        if args.parallel {
            config.decoder.parallel = true;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [decoder]
            marker = "pnt"
            parallel = true

            [decoder.edge]
            intensity_threshold = 20.0

            [decoder.plausibility]
            min_mean = 0.1
            max_mean = 1e10

            [export]
            metadata = false
            delimiter = "\t"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert!(config.decoder.parallel);
        assert_eq!(config.decoder.edge.intensity_threshold, 20.0);
        assert_eq!(config.decoder.edge.over_read, 1000);
        assert_eq!(config.decoder.plausibility.min_mean, 0.1);
        assert_eq!(config.decoder.plausibility.max_mean, 1e10);
        assert_eq!(config.decoder.probe.type_tag, "f4");
        assert!(!config.export.metadata);
        assert!(config.export.spectra);
        assert_eq!(config.export.delimiter, '\t');
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [decoder.probe]
            alignment_step = 2
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.decoder.probe.alignment_step, 2);
        assert_eq!(config.decoder.probe.alignment_span, 168);
        assert_eq!(config.decoder.marker, "pnt");
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.decoder, DecoderConfig::default());
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn test_non_ascii_delimiter_fails_to_load() {
        let toml = r#"
            [export]
            delimiter = "\u00e9"
        "#;

        let err = Config::from_str(toml).unwrap_err();
        assert!(format!("{:#}", err).contains("not a single ASCII character"));
    }

    #[test]
    fn test_cli_overrides() {
        let args = DecoderArgs {
            threshold: Some(5.0),
            max_mean: Some(1e9),
            parallel: true,
            ..DecoderArgs::default()
        };

        let config = Config::resolve(&args).unwrap();
        assert_eq!(config.decoder.edge.intensity_threshold, 5.0);
        assert_eq!(config.decoder.plausibility.min_mean, 100.0);
        assert_eq!(config.decoder.plausibility.max_mean, 1e9);
        assert!(config.decoder.parallel);
    }
}
