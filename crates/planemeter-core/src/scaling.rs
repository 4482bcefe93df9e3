use crate::camera::{CameraIntrinsics, Resolution};
use crate::error::Result;

/// Rescale camera intrinsics from the calibration resolution to a target resolution.
///
/// Focal lengths and principal point are expressed in pixels, so they scale
/// with the per-axis ratio `target / calibration`. The two axes are scaled
/// independently; the aspect ratio is not enforced. Skew stays zero and the
/// bottom row of the matrix stays `[0, 0, 1]`.
///
/// Scaling composes multiplicatively: scaling A→B and then B→C equals A→C.
/// Scaling to the calibration resolution itself returns the input unchanged.
///
/// # Arguments
///
/// * `intrinsics` - The intrinsics at the calibration resolution.
/// * `calibration` - The resolution the intrinsics were calibrated at.
/// * `target` - The resolution of the image being measured.
///
/// # Returns
///
/// A new [`CameraIntrinsics`] valid at the target resolution.
///
/// Example:
/// ```
/// use planemeter_core::{scale_intrinsics, CameraIntrinsics, Resolution};
///
/// let k = CameraIntrinsics::new(500.0, 500.0, 320.0, 240.0).unwrap();
/// let calib = Resolution::new(640, 480).unwrap();
/// let target = Resolution::new(1280, 960).unwrap();
/// let scaled = scale_intrinsics(&k, &calib, &target).unwrap();
/// assert_eq!(scaled.fx(), 1000.0);
/// assert_eq!(scaled.cy(), 480.0);
/// ```
pub fn scale_intrinsics(
    intrinsics: &CameraIntrinsics,
    calibration: &Resolution,
    target: &Resolution,
) -> Result<CameraIntrinsics> {
    if calibration == target {
        return Ok(*intrinsics);
    }

    let scale_x = target.width() as f64 / calibration.width() as f64;
    let scale_y = target.height() as f64 / calibration.height() as f64;

    log::debug!("scaling intrinsics {calibration} -> {target} (sx={scale_x}, sy={scale_y})");

    CameraIntrinsics::new(
        intrinsics.fx() * scale_x,
        intrinsics.fy() * scale_y,
        intrinsics.cx() * scale_x,
        intrinsics.cy() * scale_y,
    )
}
