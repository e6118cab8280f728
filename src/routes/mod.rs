// ABOUTME: Route module organization for the REST API
// ABOUTME: Groups domain routers and provides extractors that reject with the error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Autofood server
//!
//! Each domain exposes a `XRoutes::routes(resources)` constructor returning an
//! axum `Router` with its state already applied. The extractors below replace
//! axum's plain-text rejections with the JSON error envelope.

/// Consumption tracking routes
pub mod consumption;
/// Cooking session routes
pub mod cooking;
/// Hardware sensor and actuator routes
pub mod hardware;
/// Health and readiness probes
pub mod health;
/// Recipe catalog routes
pub mod recipes;

pub use consumption::ConsumptionRoutes;
pub use cooking::CookingRoutes;
pub use hardware::HardwareRoutes;
pub use health::HealthRoutes;
pub use recipes::RecipeRoutes;

use autofood_core::errors::{AppError, AppResult};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::middleware::RequestId;

/// Attach the current request id to an error on its way out
pub trait RequestContext<T> {
    /// Convert into `AppResult`, tagging any error with `request_id`
    ///
    /// # Errors
    ///
    /// Returns the original error converted into `AppError`
    fn in_request(self, request_id: &RequestId) -> AppResult<T>;
}

impl<T, E> RequestContext<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn in_request(self, request_id: &RequestId) -> AppResult<T> {
        self.map_err(|e| e.into().with_request_id(request_id.as_str()))
    }
}

fn rejected(message: String, request_id: Option<&RequestId>) -> AppError {
    let error = AppError::invalid_input(message);
    match request_id {
        Some(id) => error.with_request_id(id.as_str()),
        None => error,
    }
}

/// JSON body extractor that rejects with `INVALID_INPUT`
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = request.extensions().get::<RequestId>().cloned();
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection.body_text(), request_id.as_ref())),
        }
    }
}

/// Path parameter extractor that rejects with `INVALID_INPUT`
pub struct ValidPath<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(
                rejection.body_text(),
                parts.extensions.get::<RequestId>(),
            )),
        }
    }
}

/// Query string extractor that rejects with `INVALID_INPUT`
pub struct ValidQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(
                rejection.body_text(),
                parts.extensions.get::<RequestId>(),
            )),
        }
    }
}
