// ABOUTME: Recipe catalog route handlers
// ABOUTME: Lists, fetches, and creates recipes used to start cooking sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use autofood_core::errors::AppError;
use autofood_core::models::{Instruction, Recipe};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::{RequestContext, ValidJson, ValidPath};
use crate::middleware::RequestId;
use crate::resources::ServerResources;

/// Servings assumed when a new recipe omits them
const DEFAULT_SERVINGS: u32 = 1;

/// Body of `POST /api/recipes`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    /// Display name
    pub name: String,
    /// Servings the instructions yield
    #[serde(default)]
    pub servings: Option<u32>,
    /// Ordered steps
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

/// Recipe catalog routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list_recipes).post(Self::handle_create_recipe),
            )
            .route("/api/recipes/:id", get(Self::handle_get_recipe))
            .with_state(resources)
    }

    async fn handle_list_recipes(State(resources): State<Arc<ServerResources>>) -> Response {
        let recipes = resources.recipes.list();
        let recipes: Vec<&Recipe> = recipes.iter().map(Arc::as_ref).collect();
        Json(recipes).into_response()
    }

    async fn handle_get_recipe(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(id): ValidPath<Uuid>,
    ) -> Result<Response, AppError> {
        let recipe = resources.recipes.get(id).in_request(&request_id)?;
        Ok(Json(recipe.as_ref()).into_response())
    }

    async fn handle_create_recipe(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidJson(request): ValidJson<CreateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let recipe = resources
            .recipes
            .create(
                &request.name,
                request.servings.unwrap_or(DEFAULT_SERVINGS),
                request.instructions,
            )
            .in_request(&request_id)?;
        Ok((StatusCode::CREATED, Json(recipe.as_ref())).into_response())
    }
}
