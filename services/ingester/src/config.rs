//! Ingester configuration.

use anyhow::{bail, Result};
use std::env;

use etl_common::CrsCode;
use ingestion::{parse_bands, JobOptions, SourceConfig};
use raster::ResampleMethod;

/// Band files kept in memory by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Top-level ingester configuration.
#[derive(Debug, Clone)]
pub struct IngesterConfig {
    /// Options applied to every scene
    pub job: JobOptions,

    /// Where band files are read from
    pub source: SourceConfig,

    /// Scenes processed at once; defaults to the number of cores
    pub parallelism: Option<usize>,

    /// Band files kept in the in-memory cache; 0 disables the cache
    pub cache_capacity: usize,
}

/// Command line values that take precedence over the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub bands: Option<String>,
    pub max_zoom: Option<u32>,
    pub crs: Option<String>,
    pub resample: Option<String>,
    pub parallelism: Option<usize>,
    pub cache_capacity: Option<usize>,
}

impl IngesterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let parallelism = env::var("INGEST_PARALLELISM")
            .ok()
            .and_then(|v| v.parse().ok());
        let cache_capacity = env::var("BAND_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CACHE_CAPACITY);

        Self {
            job: JobOptions::from_env(),
            source: SourceConfig::from_env(),
            parallelism,
            cache_capacity,
        }
    }

    /// Apply command line values. Unlike the environment, malformed values
    /// here are errors.
    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(bands) = overrides.bands {
            self.job.bands = parse_bands(&bands)?;
        }
        if let Some(zoom) = overrides.max_zoom {
            self.job.max_zoom = zoom;
        }
        if let Some(crs) = overrides.crs {
            self.job.crs = crs.parse::<CrsCode>()?;
        }
        if let Some(method) = overrides.resample {
            self.job.resample = method.parse::<ResampleMethod>().map_err(anyhow::Error::msg)?;
        }
        if overrides.parallelism.is_some() {
            self.parallelism = overrides.parallelism;
        }
        if let Some(capacity) = overrides.cache_capacity {
            self.cache_capacity = capacity;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.job.validate()?;
        if self.parallelism == Some(0) {
            bail!("parallelism must be at least 1");
        }
        if self.source.http_timeout_secs == 0 {
            bail!("HTTP timeout must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> IngesterConfig {
        IngesterConfig {
            job: JobOptions::default(),
            source: SourceConfig::default(),
            parallelism: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    #[test]
    fn test_overrides_apply() {
        let config = base()
            .apply(Overrides {
                bands: Some("5,4,3".to_string()),
                max_zoom: Some(11),
                crs: Some("EPSG:4326".to_string()),
                resample: Some("bilinear".to_string()),
                parallelism: Some(2),
                cache_capacity: Some(0),
            })
            .unwrap();

        assert_eq!(config.job.bands, vec![5, 4, 3]);
        assert_eq!(config.job.max_zoom, 11);
        assert_eq!(config.job.crs, CrsCode::Epsg4326);
        assert_eq!(config.job.resample, ResampleMethod::Bilinear);
        assert_eq!(config.parallelism, Some(2));
        assert_eq!(config.cache_capacity, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let config = base().apply(Overrides::default()).unwrap();
        assert_eq!(config.job.bands, vec![4, 3, 2]);
        assert_eq!(config.job.crs, CrsCode::Epsg3857);
        assert_eq!(config.parallelism, None);
    }

    #[test]
    fn test_malformed_overrides_rejected() {
        assert!(base()
            .apply(Overrides {
                resample: Some("cubic".to_string()),
                ..Default::default()
            })
            .is_err());
        assert!(base()
            .apply(Overrides {
                bands: Some("4,x".to_string()),
                ..Default::default()
            })
            .is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = base();
        config.parallelism = Some(0);
        assert!(config.validate().is_err());

        let config = base()
            .apply(Overrides {
                bands: Some("4,12".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(config.validate().is_err());
    }
}
