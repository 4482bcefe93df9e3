//! HTTP surface for planar measurements.
//!
//! * `GET /` - a page to click two points on an image.
//! * `POST /calculate` - `{"p1": {"x", "y"}, "p2": {"x", "y"}}` to `{"dX", "dY", "distance"}`.
//! * `GET /api/v0/config` - the active configuration and resolved calibration.
//! * `PUT /api/v0/config` - replace the configuration at runtime.
//!
//! Failures are answered with `{"error", "details"}`.

mod compute;
mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub use crate::compute::ApiError;
pub use crate::store::{ActiveConfig, ConfigStore};

/// Build the application router around a configuration store.
pub fn app(store: Arc<ConfigStore>) -> Router {
    Router::new()
        .route("/", get(compute::index))
        .route("/calculate", post(compute::calculate))
        .route(
            "/api/v0/config",
            get(compute::get_config).put(compute::put_config),
        )
        .with_state(store)
}
