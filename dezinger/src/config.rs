//! Filter parameters.
//!
//! One [`FilterConfig`] describes a whole invocation: window radius,
//! dezingering threshold and the worker count hint. A threshold of zero turns
//! the dezinger into a plain median filter.

use std::path::Path;

use common::FileFormat;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Smallest full kernel size accepted by [`FilterConfig::from_kernel_size`].
pub const MIN_KERNEL_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Window half-width along every axis. Window side is `2 * radius + 1`.
    pub radius: usize,
    /// Minimum deviation `|v - median|` (exclusive) before a sample is
    /// replaced. Zero replaces every sample with its median.
    pub mu_threshold: f32,
    /// Worker count. Zero or negative uses the global rayon pool.
    pub ncores: i32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            radius: 1,
            mu_threshold: 0.0,
            ncores: 0,
        }
    }
}

impl FilterConfig {
    /// Unconditional median filter.
    pub fn median(radius: usize) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    /// Selective outlier removal: only samples further than `mu_threshold`
    /// from their window median are replaced.
    pub fn dezinger(radius: usize, mu_threshold: f32) -> Self {
        Self {
            radius,
            mu_threshold,
            ..Self::default()
        }
    }

    /// Builds a median filter from a full kernel size, e.g. `3` or `5`.
    /// Sizes below 3 are raised to 3; even sizes round down.
    pub fn from_kernel_size(size: usize) -> Self {
        Self::median((size.max(MIN_KERNEL_SIZE) - 1) / 2)
    }

    pub fn with_ncores(mut self, ncores: i32) -> Self {
        self.ncores = ncores;
        self
    }

    pub fn with_threshold(mut self, mu_threshold: f32) -> Self {
        self.mu_threshold = mu_threshold;
        self
    }

    /// Window side length.
    pub fn diameter(&self) -> usize {
        self.radius.saturating_mul(2).saturating_add(1)
    }

    /// Dedicated lane count, or `None` for the environment default.
    pub fn worker_lanes(&self) -> Option<usize> {
        (self.ncores > 0).then_some(self.ncores as usize)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mu_threshold.is_nan() || self.mu_threshold < 0.0 {
            return Err(FilterError::InvalidThreshold(self.mu_threshold));
        }
        Ok(())
    }

    /// Parses and validates a serialized config. Missing fields take their
    /// defaults.
    pub fn parse(text: &str, format: FileFormat) -> Result<Self> {
        let config: Self = common::deserialize(text, format)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a `.yaml`, `.yml` or `.json` config file, picking the format
    /// from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.to_string_lossy();
        let format = FileFormat::from_file_name(&name)?;
        let text = std::fs::read_to_string(path).map_err(|source| FilterError::ConfigFile {
            path: name.to_string(),
            source,
        })?;
        Self::parse(&text, format)
    }

    pub fn to_text(&self, format: FileFormat) -> Result<String> {
        Ok(common::serialize(self, format)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_size_conversion() {
        assert_eq!(FilterConfig::from_kernel_size(0).radius, 1);
        assert_eq!(FilterConfig::from_kernel_size(1).radius, 1);
        assert_eq!(FilterConfig::from_kernel_size(3).radius, 1);
        assert_eq!(FilterConfig::from_kernel_size(4).radius, 1);
        assert_eq!(FilterConfig::from_kernel_size(5).radius, 2);
        assert_eq!(FilterConfig::from_kernel_size(7).radius, 3);
        assert_eq!(FilterConfig::from_kernel_size(5).mu_threshold, 0.0);
    }

    #[test]
    fn test_worker_lanes() {
        assert_eq!(FilterConfig::default().worker_lanes(), None);
        assert_eq!(FilterConfig::default().with_ncores(-4).worker_lanes(), None);
        assert_eq!(FilterConfig::default().with_ncores(3).worker_lanes(), Some(3));
    }

    #[test]
    fn test_validate_threshold() {
        assert!(FilterConfig::dezinger(1, 0.0).validate().is_ok());
        assert!(FilterConfig::dezinger(1, 2.5).validate().is_ok());
        assert!(matches!(
            FilterConfig::dezinger(1, -0.5).validate(),
            Err(FilterError::InvalidThreshold(_))
        ));
        assert!(matches!(
            FilterConfig::dezinger(1, f32::NAN).validate(),
            Err(FilterError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_diameter_saturates() {
        assert_eq!(FilterConfig::median(0).diameter(), 1);
        assert_eq!(FilterConfig::median(2).diameter(), 5);
        assert_eq!(FilterConfig::median(usize::MAX).diameter(), usize::MAX);
    }

    #[test]
    fn test_parse_yaml_with_defaults() {
        let config = FilterConfig::parse("radius: 2\nmu_threshold: 0.5\n", FileFormat::Yaml)
            .expect("valid yaml config");
        assert_eq!(config, FilterConfig::dezinger(2, 0.5));
    }

    #[test]
    fn test_parse_json() {
        let config = FilterConfig::parse(
            r#"{ "radius": 3, "mu_threshold": 1.0, "ncores": 2 }"#,
            FileFormat::Json,
        )
        .expect("valid json config");
        assert_eq!(config, FilterConfig::dezinger(3, 1.0).with_ncores(2));
    }

    #[test]
    fn test_parse_rejects_negative_threshold() {
        let result = FilterConfig::parse(r#"{ "mu_threshold": -1.0 }"#, FileFormat::Json);
        assert!(matches!(result, Err(FilterError::InvalidThreshold(_))));
    }

    #[test]
    fn test_load_picks_format_from_extension() {
        let dir = std::env::temp_dir().join(format!("dezinger-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let config = FilterConfig::dezinger(2, 0.75).with_ncores(4);
        for (name, format) in [
            ("filter.yml", FileFormat::Yaml),
            ("filter.json", FileFormat::Json),
        ] {
            let path = dir.join(name);
            std::fs::write(&path, config.to_text(format).unwrap()).unwrap();
            assert_eq!(FilterConfig::load(&path).unwrap(), config, "{name}");
        }

        assert!(matches!(
            FilterConfig::load(dir.join("filter.toml")),
            Err(FilterError::Config(common::FormatError::UnsupportedFileExtension(_)))
        ));
        assert!(matches!(
            FilterConfig::load(dir.join("missing.yaml")),
            Err(FilterError::ConfigFile { .. })
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_parse_reports_syntax_error() {
        let result = FilterConfig::parse("{ radius", FileFormat::Json);
        assert!(matches!(result, Err(FilterError::Config(_))));
    }
}
