use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use planemeter::{ErrorResponse, MeasureRequest, MeasureResponse, MeasurementConfig, PlanemeterError};

use crate::store::{ActiveConfig, ConfigStore};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// A [`PlanemeterError`] turned into a structured HTTP response.
#[derive(Debug)]
pub struct ApiError(pub PlanemeterError);

impl ApiError {
    /// The status code reported for this error.
    pub fn status(&self) -> StatusCode {
        match self.0 {
            PlanemeterError::InvalidInput(_) | PlanemeterError::InvalidConfiguration(_) => {
                StatusCode::BAD_REQUEST
            }
            PlanemeterError::CalculationFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<PlanemeterError> for ApiError {
    fn from(err: PlanemeterError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::from(&self.0))).into_response()
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn calculate(
    State(store): State<Arc<ConfigStore>>,
    body: Bytes,
) -> Result<Json<MeasureResponse>, ApiError> {
    let active = store.snapshot();
    let measured = MeasureRequest::from_slice(&body)
        .and_then(|req| active.calibration.measure(&req.p1, &req.p2));

    match measured {
        Ok(m) => {
            log::info!(
                "measured ({:.2}, {:.2}) -> ({:.2}, {:.2}): dX {:.4}, dY {:.4}, distance {:.4}",
                m.p1.x,
                m.p1.y,
                m.p2.x,
                m.p2.y,
                m.result.delta_x,
                m.result.delta_y,
                m.result.distance
            );
            Ok(Json(MeasureResponse::new(
                &m.result,
                active.calibration.delta_sign(),
            )))
        }
        Err(err) => {
            log::warn!("measurement failed: {err}");
            Err(err.into())
        }
    }
}

pub async fn get_config(State(store): State<Arc<ConfigStore>>) -> Json<ActiveConfig> {
    Json(store.snapshot().as_ref().clone())
}

pub async fn put_config(
    State(store): State<Arc<ConfigStore>>,
    body: Bytes,
) -> Result<Json<ActiveConfig>, ApiError> {
    let text = std::str::from_utf8(&body).map_err(|e| {
        PlanemeterError::InvalidConfiguration(format!("configuration is not UTF-8: {e}"))
    })?;
    let active = MeasurementConfig::from_json_str(text).and_then(|config| store.replace(config));

    match active {
        Ok(active) => {
            log::info!(
                "configuration replaced: fx {}, fy {}, cx {}, cy {}, Z {}",
                active.calibration.intrinsics().fx(),
                active.calibration.intrinsics().fy(),
                active.calibration.intrinsics().cx(),
                active.calibration.intrinsics().cy(),
                active.calibration.object_distance()
            );
            Ok(Json(active.as_ref().clone()))
        }
        Err(err) => {
            log::warn!("configuration rejected: {err}");
            Err(err.into())
        }
    }
}
