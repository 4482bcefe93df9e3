use std::sync::{Arc, PoisonError, RwLock};

use planemeter::{Calibration, MeasurementConfig, Result};
use serde::Serialize;

/// A configuration together with the calibration resolved from it.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveConfig {
    /// The configuration as supplied.
    pub config: MeasurementConfig,
    /// The resolved parameters used for measuring.
    pub calibration: Calibration,
}

impl ActiveConfig {
    /// Resolve a configuration, failing on any invalid parameter.
    pub fn new(config: MeasurementConfig) -> Result<Self> {
        let calibration = config.calibration()?;
        Ok(Self {
            config,
            calibration,
        })
    }
}

/// Holds the active configuration shared by all requests.
///
/// Readers take a cheap `Arc` snapshot. A replacement is fully resolved
/// before it is swapped in, so requests only ever see a complete calibration.
#[derive(Debug)]
pub struct ConfigStore {
    active: RwLock<Arc<ActiveConfig>>,
}

impl ConfigStore {
    /// Create a store from a configuration.
    pub fn new(config: MeasurementConfig) -> Result<Self> {
        Ok(Self {
            active: RwLock::new(Arc::new(ActiveConfig::new(config)?)),
        })
    }

    /// The currently active configuration.
    pub fn snapshot(&self) -> Arc<ActiveConfig> {
        // the guarded value is only ever replaced whole, so a poisoned lock is still consistent
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate and install a new configuration, returning it.
    pub fn replace(&self, config: MeasurementConfig) -> Result<Arc<ActiveConfig>> {
        let next = Arc::new(ActiveConfig::new(config)?);
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        Ok(next)
    }
}
