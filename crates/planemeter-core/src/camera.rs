use serde::{Deserialize, Serialize};

use crate::error::{PlanemeterError, Result};

/// Represents the intrinsic parameters of a pinhole camera.
///
/// The values are expressed in pixels at the resolution the camera was
/// calibrated at. Instances are immutable; rescaling produces a new value,
/// see [`crate::scaling::scale_intrinsics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntrinsicsParams", into = "IntrinsicsParams")]
pub struct CameraIntrinsics {
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
}

/// Unvalidated wire form of [`CameraIntrinsics`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct IntrinsicsParams {
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
}

impl CameraIntrinsics {
    /// Create camera intrinsics from focal lengths and principal point.
    ///
    /// # Arguments
    ///
    /// * `fx` - The focal length in the x direction, strictly positive.
    /// * `fy` - The focal length in the y direction, strictly positive.
    /// * `cx` - The x coordinate of the principal point.
    /// * `cy` - The y coordinate of the principal point.
    ///
    /// # Errors
    ///
    /// [`PlanemeterError::InvalidConfiguration`] if a focal length is not a
    /// strictly positive finite number or the principal point is not finite.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Result<Self> {
        ensure_positive("focal length fx", fx)?;
        ensure_positive("focal length fy", fy)?;
        ensure_finite("principal point cx", cx)?;
        ensure_finite("principal point cy", cy)?;
        Ok(Self { fx, fy, cx, cy })
    }

    /// Create camera intrinsics from a 3x3 intrinsics matrix.
    ///
    /// The matrix must have the form `[[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`.
    pub fn from_matrix(k: &[[f64; 3]; 3]) -> Result<Self> {
        if k[0][1] != 0.0 || k[1][0] != 0.0 || k[2][0] != 0.0 || k[2][1] != 0.0 || k[2][2] != 1.0
        {
            return Err(PlanemeterError::InvalidConfiguration(
                "intrinsics matrix must have form [[fx, 0, cx], [0, fy, cy], [0, 0, 1]]"
                    .to_string(),
            ));
        }
        Self::new(k[0][0], k[1][1], k[0][2], k[1][2])
    }

    /// Convert to a 3x3 intrinsics matrix.
    pub fn to_matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.fx, 0.0, self.cx],
            [0.0, self.fy, self.cy],
            [0.0, 0.0, 1.0],
        ]
    }

    /// The focal length in the x direction.
    pub fn fx(&self) -> f64 {
        self.fx
    }

    /// The focal length in the y direction.
    pub fn fy(&self) -> f64 {
        self.fy
    }

    /// The x coordinate of the principal point.
    pub fn cx(&self) -> f64 {
        self.cx
    }

    /// The y coordinate of the principal point.
    pub fn cy(&self) -> f64 {
        self.cy
    }
}

impl TryFrom<IntrinsicsParams> for CameraIntrinsics {
    type Error = PlanemeterError;

    fn try_from(p: IntrinsicsParams) -> Result<Self> {
        Self::new(p.fx, p.fy, p.cx, p.cy)
    }
}

impl From<CameraIntrinsics> for IntrinsicsParams {
    fn from(k: CameraIntrinsics) -> Self {
        Self {
            fx: k.fx,
            fy: k.fy,
            cx: k.cx,
            cy: k.cy,
        }
    }
}

/// An image resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResolutionParams", into = "ResolutionParams")]
pub struct Resolution {
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ResolutionParams {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Create a resolution, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PlanemeterError::InvalidConfiguration(format!(
                "resolution must be strictly positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// The image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl TryFrom<ResolutionParams> for Resolution {
    type Error = PlanemeterError;

    fn try_from(p: ResolutionParams) -> Result<Self> {
        Self::new(p.width, p.height)
    }
}

impl From<Resolution> for ResolutionParams {
    fn from(r: Resolution) -> Self {
        Self {
            width: r.width,
            height: r.height,
        }
    }
}

pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(PlanemeterError::InvalidConfiguration(format!(
            "{name} must be strictly positive, got {value}"
        )));
    }
    Ok(())
}

fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PlanemeterError::InvalidConfiguration(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}
