use serde::{Deserialize, Serialize};

use crate::camera::{ensure_positive, CameraIntrinsics};
use crate::error::{PlanemeterError, Result};

/// Number of decimals kept when a measurement is presented.
pub const DISPLAY_DECIMALS: i32 = 4;

/// A 2d coordinate in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal pixel coordinate.
    pub u: f64,
    /// Vertical pixel coordinate.
    pub v: f64,
}

impl PixelPoint {
    /// Create a pixel point.
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// A 2d metric coordinate on the object plane, in the unit of the depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanePoint {
    /// Metric x coordinate.
    pub x: f64,
    /// Metric y coordinate.
    pub y: f64,
}

impl PlanePoint {
    /// Create a plane point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How the per-axis deltas of a measurement are reported.
///
/// The deltas are always computed as `p2 - p1` on the plane. `Absolute`
/// takes the magnitude afterwards. Since the principal point cancels in the
/// subtraction, this is the same as taking `|u2 - u1|` in pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaSign {
    /// Keep the sign of `p2 - p1`.
    #[default]
    Signed,
    /// Report `|p2 - p1|` per axis.
    Absolute,
}

/// Planar deltas and Euclidean distance between two measured points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Metric difference along x, `p2.x - p1.x`.
    pub delta_x: f64,
    /// Metric difference along y, `p2.y - p1.y`.
    pub delta_y: f64,
    /// Euclidean distance between the two plane points.
    pub distance: f64,
}

impl MeasurementResult {
    /// Round all fields to [`DISPLAY_DECIMALS`] decimals for presentation.
    pub fn rounded(&self) -> Self {
        Self {
            delta_x: round_decimals(self.delta_x, DISPLAY_DECIMALS),
            delta_y: round_decimals(self.delta_y, DISPLAY_DECIMALS),
            distance: round_decimals(self.distance, DISPLAY_DECIMALS),
        }
    }

    /// Apply a delta sign convention. The distance is unaffected.
    pub fn with_sign(&self, sign: DeltaSign) -> Self {
        match sign {
            DeltaSign::Signed => *self,
            DeltaSign::Absolute => Self {
                delta_x: self.delta_x.abs(),
                delta_y: self.delta_y.abs(),
                distance: self.distance,
            },
        }
    }
}

/// A measurement together with the plane points it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// The first point on the object plane.
    pub p1: PlanePoint,
    /// The second point on the object plane.
    pub p2: PlanePoint,
    /// Deltas and distance between `p1` and `p2`.
    pub result: MeasurementResult,
}

/// Project a point on the plane `Z = depth` to pixel coordinates.
///
/// Applies `u = fx * x / Z + cx` and `v = fy * y / Z + cy`.
pub fn project(point: &PlanePoint, intrinsics: &CameraIntrinsics, depth: f64) -> PixelPoint {
    PixelPoint {
        u: intrinsics.fx() * point.x / depth + intrinsics.cx(),
        v: intrinsics.fy() * point.y / depth + intrinsics.cy(),
    }
}

/// Unproject a pixel onto the plane `Z = depth`.
///
/// This is the algebraic inverse of [`project`] under the assumption that the
/// observed point lies on a single plane at the given depth:
/// `x = (u - cx) * Z / fx` and `y = (v - cy) * Z / fy`.
///
/// # Arguments
///
/// * `pixel` - The pixel coordinate in the image the intrinsics are valid for.
/// * `intrinsics` - The camera intrinsics, already scaled to the image resolution.
/// * `depth` - The distance from the optical center to the object plane.
///
/// Example:
/// ```
/// use planemeter_core::{unproject, CameraIntrinsics, PixelPoint};
///
/// let k = CameraIntrinsics::new(500.0, 500.0, 320.0, 240.0).unwrap();
/// let p = unproject(&PixelPoint::new(420.0, 240.0), &k, 10.0);
/// assert_eq!(p.x, 2.0);
/// assert_eq!(p.y, 0.0);
/// ```
pub fn unproject(pixel: &PixelPoint, intrinsics: &CameraIntrinsics, depth: f64) -> PlanePoint {
    PlanePoint {
        x: (pixel.u - intrinsics.cx()) * depth / intrinsics.fx(),
        y: (pixel.v - intrinsics.cy()) * depth / intrinsics.fy(),
    }
}

/// Measure the planar distance between two pixels on the plane `Z = depth`.
///
/// The returned values keep full precision; use [`MeasurementResult::rounded`]
/// for presentation.
///
/// # Errors
///
/// * [`PlanemeterError::InvalidInput`] if a pixel coordinate is not finite.
/// * [`PlanemeterError::InvalidConfiguration`] if the depth is not strictly positive.
/// * [`PlanemeterError::CalculationFailure`] if the result is not finite.
pub fn measure(
    p1: &PixelPoint,
    p2: &PixelPoint,
    intrinsics: &CameraIntrinsics,
    depth: f64,
) -> Result<MeasurementResult> {
    measure_detailed(p1, p2, intrinsics, depth).map(|m| m.result)
}

/// Same as [`measure`], also returning the two unprojected plane points.
pub fn measure_detailed(
    p1: &PixelPoint,
    p2: &PixelPoint,
    intrinsics: &CameraIntrinsics,
    depth: f64,
) -> Result<Measurement> {
    ensure_pixel("p1", p1)?;
    ensure_pixel("p2", p2)?;
    ensure_positive("object distance", depth)?;

    let plane1 = unproject(p1, intrinsics, depth);
    let plane2 = unproject(p2, intrinsics, depth);

    let delta_x = plane2.x - plane1.x;
    let delta_y = plane2.y - plane1.y;
    let distance = delta_x.hypot(delta_y);

    if !(delta_x.is_finite() && delta_y.is_finite() && distance.is_finite()) {
        return Err(PlanemeterError::CalculationFailure(format!(
            "non-finite measurement: dX={delta_x}, dY={delta_y}, distance={distance}"
        )));
    }

    log::debug!(
        "p1 ({}, {}) -> ({:.2}, {:.2}); p2 ({}, {}) -> ({:.2}, {:.2})",
        p1.u,
        p1.v,
        plane1.x,
        plane1.y,
        p2.u,
        p2.v,
        plane2.x,
        plane2.y
    );
    log::debug!("dX: {delta_x:.4}, dY: {delta_y:.4}, distance: {distance:.4}");

    Ok(Measurement {
        p1: plane1,
        p2: plane2,
        result: MeasurementResult {
            delta_x,
            delta_y,
            distance,
        },
    })
}

fn ensure_pixel(name: &str, p: &PixelPoint) -> Result<()> {
    if !p.u.is_finite() || !p.v.is_finite() {
        return Err(PlanemeterError::InvalidInput(format!(
            "{name} must have finite coordinates, got ({}, {})",
            p.u, p.v
        )));
    }
    Ok(())
}

fn round_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    // adding zero turns -0.0 into 0.0
    (value * factor).round() / factor + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Resolution;
    use crate::scaling::scale_intrinsics;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn web_intrinsics() -> Result<CameraIntrinsics> {
        CameraIntrinsics::new(1667.53, 1983.20, 1073.56, 703.16)
    }

    #[test]
    fn test_unproject_principal_point_is_origin() -> Result<()> {
        let k = web_intrinsics()?;
        let p = unproject(&PixelPoint::new(k.cx(), k.cy()), &k, 34.0);
        assert_eq!(p, PlanePoint::new(0.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_project_unproject_roundtrip() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let k = CameraIntrinsics::new(
                rng.random_range(100.0..4000.0),
                rng.random_range(100.0..4000.0),
                rng.random_range(0.0..2000.0),
                rng.random_range(0.0..2000.0),
            )?;
            let depth = rng.random_range(0.1..500.0);
            let point = PlanePoint::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));

            let back = unproject(&project(&point, &k, depth), &k, depth);
            assert_relative_eq!(back.x, point.x, epsilon = 1e-9);
            assert_relative_eq!(back.y, point.y, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_measure_same_point_is_zero() -> Result<()> {
        let k = web_intrinsics()?;
        let p = PixelPoint::new(974.0, 958.0);
        let res = measure(&p, &p, &k, 34.0)?;
        assert_eq!(res.distance, 0.0);
        assert_eq!(res.delta_x, 0.0);
        assert_eq!(res.delta_y, 0.0);
        Ok(())
    }

    #[test]
    fn test_measure_symmetry() -> Result<()> {
        let k = web_intrinsics()?;
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let a = PixelPoint::new(rng.random_range(0.0..2220.0), rng.random_range(0.0..1480.0));
            let b = PixelPoint::new(rng.random_range(0.0..2220.0), rng.random_range(0.0..1480.0));
            let ab = measure(&a, &b, &k, 34.0)?;
            let ba = measure(&b, &a, &k, 34.0)?;
            assert_relative_eq!(ab.distance, ba.distance, epsilon = 1e-12);
            assert_relative_eq!(ab.delta_x, -ba.delta_x, epsilon = 1e-12);
            assert_relative_eq!(ab.delta_y, -ba.delta_y, epsilon = 1e-12);
            assert!(ab.distance >= 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_measure_web_reference() -> Result<()> {
        let k = web_intrinsics()?;
        let res = measure(
            &PixelPoint::new(974.0, 958.0),
            &PixelPoint::new(1241.0, 959.0),
            &k,
            34.0,
        )?;
        assert_relative_eq!(res.delta_x, 267.0 * 34.0 / 1667.53, epsilon = 1e-12);
        assert_relative_eq!(res.delta_y, 34.0 / 1983.20, epsilon = 1e-12);

        let rounded = res.rounded();
        assert_eq!(rounded.delta_x, 5.444);
        assert_eq!(rounded.delta_y, 0.0171);
        assert_eq!(rounded.distance, 5.444);
        Ok(())
    }

    #[test]
    fn test_measure_still_reference_scaled() -> Result<()> {
        let k = CameraIntrinsics::new(
            991.3966961255147,
            991.6283280689119,
            671.2440144735679,
            371.28640788315386,
        )?;
        let k = scale_intrinsics(&k, &Resolution::new(1280, 720)?, &Resolution::new(2220, 1480)?)?;
        let res = measure(
            &PixelPoint::new(974.0, 958.0),
            &PixelPoint::new(1241.0, 959.0),
            &k,
            34.0,
        )?
        .rounded();
        assert_eq!(res.delta_x, 5.2796);
        assert_eq!(res.delta_y, 0.0167);
        assert_eq!(res.distance, 5.2796);
        Ok(())
    }

    #[test]
    fn test_measure_signed_and_absolute_deltas() -> Result<()> {
        let k = CameraIntrinsics::new(500.0, 500.0, 320.0, 240.0)?;
        // points on opposite sides of the principal point
        let res = measure(
            &PixelPoint::new(420.0, 140.0),
            &PixelPoint::new(220.0, 340.0),
            &k,
            10.0,
        )?;
        assert_relative_eq!(res.delta_x, -4.0, epsilon = 1e-12);
        assert_relative_eq!(res.delta_y, 4.0, epsilon = 1e-12);

        let abs = res.with_sign(DeltaSign::Absolute);
        assert_relative_eq!(abs.delta_x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(abs.delta_y, 4.0, epsilon = 1e-12);
        assert_eq!(abs.distance, res.distance);
        assert_eq!(res.with_sign(DeltaSign::Signed), res);
        Ok(())
    }

    #[test]
    fn test_measure_detailed_plane_points() -> Result<()> {
        let k = CameraIntrinsics::new(500.0, 500.0, 320.0, 240.0)?;
        let m = measure_detailed(
            &PixelPoint::new(320.0, 240.0),
            &PixelPoint::new(370.0, 290.0),
            &k,
            10.0,
        )?;
        assert_eq!(m.p1, PlanePoint::new(0.0, 0.0));
        assert_relative_eq!(m.p2.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.p2.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.result.distance, 2f64.sqrt(), epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_measure_rejects_bad_depth() -> Result<()> {
        let k = web_intrinsics()?;
        let p = PixelPoint::new(1.0, 2.0);
        for depth in [0.0, -34.0, f64::NAN] {
            assert!(matches!(
                measure(&p, &p, &k, depth),
                Err(PlanemeterError::InvalidConfiguration(_))
            ));
        }
        Ok(())
    }

    #[test]
    fn test_measure_rejects_non_finite_pixel() -> Result<()> {
        let k = web_intrinsics()?;
        let ok = PixelPoint::new(1.0, 2.0);
        let bad = PixelPoint::new(f64::NAN, 2.0);
        assert!(matches!(
            measure(&ok, &bad, &k, 34.0),
            Err(PlanemeterError::InvalidInput(_))
        ));
        Ok(())
    }

    #[test]
    fn test_measure_overflow_is_calculation_failure() -> Result<()> {
        let k = CameraIntrinsics::new(1e-300, 1e-300, 0.0, 0.0)?;
        let res = measure(
            &PixelPoint::new(-1e300, 0.0),
            &PixelPoint::new(1e300, 0.0),
            &k,
            1e300,
        );
        assert!(matches!(res, Err(PlanemeterError::CalculationFailure(_))));
        Ok(())
    }

    #[test]
    fn test_rounding() {
        let res = MeasurementResult {
            delta_x: 1.23456,
            delta_y: -0.00004,
            distance: 9.99996,
        }
        .rounded();
        assert_eq!(res.delta_x, 1.2346);
        assert_eq!(res.delta_y, 0.0);
        assert!(res.delta_y.is_sign_positive());
        assert_relative_eq!(res.distance, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rounded_tiny_negative_delta_is_positive_zero() -> Result<()> {
        let k = CameraIntrinsics::new(1667.53, 1983.20, 1073.56, 703.16)?;
        let res = measure(
            &PixelPoint::new(974.00001, 958.0),
            &PixelPoint::new(974.0, 958.0),
            &k,
            34.0,
        )?;
        assert!(res.delta_x < 0.0);
        let rounded = res.rounded();
        assert_eq!(rounded.delta_x, 0.0);
        assert!(rounded.delta_x.is_sign_positive());
        assert!(rounded.delta_y.is_sign_positive());
        Ok(())
    }
}
