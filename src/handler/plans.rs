use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::plandtos::{DeletePlanQueryDto, UpdatePlanDto},
    error::HttpError,
    middleware::{auth, optional_auth, role_check, JWTAuthMiddleware},
    models::usermodel::UserRole,
    AppState,
};

pub fn plans_handler() -> Router {
    let public_routes = Router::new()
        .route("/:plan_id", get(get_plan))
        .layer(middleware::from_fn(optional_auth));

    let admin_routes = Router::new()
        .route("/:plan_id", put(update_plan).delete(delete_plan))
        .route("/:plan_id/deactivate", post(deactivate_plan))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
        .layer(middleware::from_fn(auth));

    Router::new().merge(public_routes).merge(admin_routes)
}

pub async fn get_plan(
    Path(plan_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    user: Option<Extension<JWTAuthMiddleware>>,
) -> Result<impl IntoResponse, HttpError> {
    let actor = user.as_ref().map(|Extension(auth)| &auth.user);
    let plan = app_state.plan_service().get_plan(actor, plan_id).await?;

    Ok(Json(json!({
        "status": "success",
        "data": plan
    })))
}

pub async fn update_plan(
    Path(plan_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdatePlanDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let plan = app_state
        .plan_service()
        .update_plan(&user.user, plan_id, body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Plan updated successfully",
        "data": plan
    })))
}

pub async fn deactivate_plan(
    Path(plan_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let plan = app_state
        .plan_service()
        .deactivate_plan(&user.user, plan_id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Plan deactivated",
        "data": plan
    })))
}

/// Deactivates by default; `?permanent=true` removes the row.
pub async fn delete_plan(
    Path(plan_id): Path<Uuid>,
    Query(query_params): Query<DeletePlanQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let plan_service = app_state.plan_service();

    if query_params.permanent.unwrap_or(false) {
        plan_service.delete_plan(&user.user, plan_id).await?;

        return Ok(Json(json!({
            "status": "success",
            "message": "Plan permanently deleted"
        })));
    }

    let plan = plan_service.deactivate_plan(&user.user, plan_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Plan deactivated",
        "data": plan
    })))
}
