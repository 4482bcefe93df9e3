use std::path::Path;

use serde::{Deserialize, Serialize};

use planemeter_core::{
    measure_detailed, scale_intrinsics, CameraIntrinsics, DeltaSign, Measurement, PixelPoint,
    PlanemeterError, Resolution, Result,
};

/// Measurement configuration as loaded from a JSON file.
///
/// Example:
/// ```json
/// {
///   "intrinsics": { "fx": 991.39, "fy": 991.62, "cx": 671.24, "cy": 371.28 },
///   "calibration_resolution": { "width": 1280, "height": 720 },
///   "target_resolution": { "width": 2220, "height": 1480 },
///   "object_distance": 34.0,
///   "delta_sign": "signed"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementConfig {
    /// Intrinsics at the calibration resolution.
    pub intrinsics: CameraIntrinsics,
    /// Resolution the intrinsics were calibrated at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration_resolution: Option<Resolution>,
    /// Resolution of the images being measured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_resolution: Option<Resolution>,
    /// Distance from the camera to the object plane, in output units.
    pub object_distance: f64,
    /// How deltas are reported to callers.
    #[serde(default)]
    pub delta_sign: DeltaSign,
}

impl MeasurementConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| PlanemeterError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PlanemeterError::InvalidConfiguration(format!("{}: {e}", path.display()))
        })?;
        log::info!("loading measurement configuration from {}", path.display());
        Self::from_json_str(&contents)
    }

    /// The still-image setup: calibrated at 1280x720, measured on 2220x1480 images.
    pub fn reference_still() -> Result<Self> {
        Ok(Self {
            intrinsics: CameraIntrinsics::new(
                991.3966961255147,
                991.6283280689119,
                671.2440144735679,
                371.28640788315386,
            )?,
            calibration_resolution: Some(Resolution::new(1280, 720)?),
            target_resolution: Some(Resolution::new(2220, 1480)?),
            object_distance: 34.0,
            delta_sign: DeltaSign::Signed,
        })
    }

    /// The web setup: intrinsics already valid for the served images, deltas reported as magnitudes.
    pub fn reference_web() -> Result<Self> {
        Ok(Self {
            intrinsics: CameraIntrinsics::new(1667.53, 1983.20, 1073.56, 703.16)?,
            calibration_resolution: None,
            target_resolution: None,
            object_distance: 34.0,
            delta_sign: DeltaSign::Absolute,
        })
    }

    /// Check the invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(self.object_distance.is_finite() && self.object_distance > 0.0) {
            return Err(PlanemeterError::InvalidConfiguration(format!(
                "object distance must be strictly positive, got {}",
                self.object_distance
            )));
        }
        match (self.calibration_resolution, self.target_resolution) {
            (Some(_), None) | (None, Some(_)) => Err(PlanemeterError::InvalidConfiguration(
                "calibration_resolution and target_resolution must be given together".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// The intrinsics valid for the target images.
    ///
    /// Scaling is applied only when both resolutions are configured.
    pub fn effective_intrinsics(&self) -> Result<CameraIntrinsics> {
        match (self.calibration_resolution, self.target_resolution) {
            (Some(calib), Some(target)) => scale_intrinsics(&self.intrinsics, &calib, &target),
            _ => Ok(self.intrinsics),
        }
    }

    /// Resolve into the immutable snapshot used for measurements.
    pub fn calibration(&self) -> Result<Calibration> {
        self.validate()?;
        Calibration::new(self.effective_intrinsics()?, self.object_distance, self.delta_sign)
    }
}

/// Resolved, read-only measurement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Calibration {
    intrinsics: CameraIntrinsics,
    object_distance: f64,
    delta_sign: DeltaSign,
}

impl Calibration {
    /// Create a calibration, validating the object distance.
    pub fn new(
        intrinsics: CameraIntrinsics,
        object_distance: f64,
        delta_sign: DeltaSign,
    ) -> Result<Self> {
        if !(object_distance.is_finite() && object_distance > 0.0) {
            return Err(PlanemeterError::InvalidConfiguration(format!(
                "object distance must be strictly positive, got {object_distance}"
            )));
        }
        Ok(Self {
            intrinsics,
            object_distance,
            delta_sign,
        })
    }

    /// The intrinsics valid for the measured images.
    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// Distance from the camera to the object plane.
    pub fn object_distance(&self) -> f64 {
        self.object_distance
    }

    /// How deltas are reported.
    pub fn delta_sign(&self) -> DeltaSign {
        self.delta_sign
    }

    /// Measure two pixels with this calibration, at full precision and signed.
    pub fn measure(&self, p1: &PixelPoint, p2: &PixelPoint) -> Result<Measurement> {
        measure_detailed(p1, p2, &self.intrinsics, self.object_distance)
    }
}
