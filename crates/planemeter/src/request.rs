use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use planemeter_core::{DeltaSign, MeasurementResult, PixelPoint, PlanemeterError, Result};

/// A request to measure the distance between two clicked pixels.
///
/// The wire form is `{"p1": {"x": u, "y": v}, "p2": {"x": u, "y": v}}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureRequest {
    /// The first pixel.
    pub p1: PixelPoint,
    /// The second pixel.
    pub p2: PixelPoint,
}

impl MeasureRequest {
    /// Parse a request from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| PlanemeterError::InvalidInput(format!("malformed JSON body: {e}")))?;
        Self::from_json(&value)
    }

    /// Parse a request from a JSON value.
    ///
    /// Every coordinate must be present and a finite number; the error names
    /// the first offending field, e.g. `p2.y`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let body = value.as_object().ok_or_else(|| {
            PlanemeterError::InvalidInput("request body must be a JSON object".to_string())
        })?;
        Ok(Self {
            p1: pixel_field(body, "p1")?,
            p2: pixel_field(body, "p2")?,
        })
    }
}

fn pixel_field(body: &Map<String, Value>, name: &str) -> Result<PixelPoint> {
    let point = body
        .get(name)
        .ok_or_else(|| PlanemeterError::InvalidInput(format!("missing field `{name}`")))?
        .as_object()
        .ok_or_else(|| PlanemeterError::InvalidInput(format!("`{name}` must be an object")))?;
    Ok(PixelPoint {
        u: coordinate(point, name, "x")?,
        v: coordinate(point, name, "y")?,
    })
}

fn coordinate(point: &Map<String, Value>, name: &str, axis: &str) -> Result<f64> {
    let value = point
        .get(axis)
        .ok_or_else(|| PlanemeterError::InvalidInput(format!("missing field `{name}.{axis}`")))?;
    match value.as_f64() {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(PlanemeterError::InvalidInput(format!(
            "`{name}.{axis}` must be a finite number, got {value}"
        ))),
    }
}

/// Successful measurement response, rounded for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureResponse {
    /// Difference along x.
    #[serde(rename = "dX")]
    pub d_x: f64,
    /// Difference along y.
    #[serde(rename = "dY")]
    pub d_y: f64,
    /// Euclidean distance.
    pub distance: f64,
}

impl MeasureResponse {
    /// Build the response from a full precision result.
    pub fn new(result: &MeasurementResult, sign: DeltaSign) -> Self {
        let shown = result.with_sign(sign).rounded();
        Self {
            d_x: shown.delta_x,
            d_y: shown.delta_y,
            distance: shown.distance,
        }
    }
}

/// Structured failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category, see [`PlanemeterError::kind`].
    pub error: String,
    /// Human readable detail.
    pub details: String,
}

impl From<&PlanemeterError> for ErrorResponse {
    fn from(err: &PlanemeterError) -> Self {
        Self {
            error: err.kind().to_string(),
            details: err.details().to_string(),
        }
    }
}
