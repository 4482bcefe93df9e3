#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the measurement core.
pub mod error;

/// Pinhole camera intrinsics and image resolutions.
pub mod camera;

/// Rescaling of intrinsics between image resolutions.
pub mod scaling;

/// Pinhole projection, unprojection onto a plane and planar distances.
pub mod projection;

pub use crate::camera::{CameraIntrinsics, Resolution};
pub use crate::error::{PlanemeterError, Result};
pub use crate::projection::{
    measure, measure_detailed, project, unproject, DeltaSign, Measurement, MeasurementResult,
    PixelPoint, PlanePoint,
};
pub use crate::scaling::scale_intrinsics;
