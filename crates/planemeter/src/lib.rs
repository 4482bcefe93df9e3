#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

pub use planemeter_core::{
    measure, measure_detailed, project, scale_intrinsics, unproject, CameraIntrinsics,
    DeltaSign, Measurement, MeasurementResult, PixelPoint, PlanePoint, PlanemeterError,
    Resolution, Result,
};

/// Measurement configuration and its resolved calibration snapshot.
pub mod config;

/// Parsing of measurement requests and the response wire types.
pub mod request;

pub use crate::config::{Calibration, MeasurementConfig};
pub use crate::request::{ErrorResponse, MeasureRequest, MeasureResponse};
