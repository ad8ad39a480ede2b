use std::sync::Arc;

use axum::{
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        plandtos::CreatePlanDto,
        servicedtos::{CreateServiceDto, UpdateServiceDto},
    },
    error::HttpError,
    middleware::{auth, optional_auth, role_check, JWTAuthMiddleware},
    models::usermodel::UserRole,
    AppState,
};

pub fn services_handler() -> Router {
    let public_routes = Router::new()
        .route("/", get(list_services))
        .route("/:service_id", get(get_service))
        .route("/:service_id/plans", get(list_active_plans))
        .layer(middleware::from_fn(optional_auth));

    let admin_routes = Router::new()
        .route("/", post(create_service))
        .route("/:service_id", put(update_service).delete(delete_service))
        .route("/:service_id/plans", post(create_plan))
        .route("/:service_id/plans/all", get(list_all_plans))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
        .layer(middleware::from_fn(auth));

    Router::new().merge(public_routes).merge(admin_routes)
}

pub async fn list_services(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let services = app_state.catalog_service().list_services().await?;

    Ok(Json(json!({
        "status": "success",
        "results": services.len(),
        "data": services
    })))
}

pub async fn get_service(
    Path(service_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let service = app_state.catalog_service().get_service(service_id).await?;

    Ok(Json(json!({
        "status": "success",
        "data": service
    })))
}

pub async fn create_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateServiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let service = app_state
        .catalog_service()
        .create_service(&user.user, body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Service created successfully",
        "data": service
    })))
}

pub async fn update_service(
    Path(service_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateServiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let service = app_state
        .catalog_service()
        .update_service(&user.user, service_id, body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Service updated successfully",
        "data": service
    })))
}

pub async fn delete_service(
    Path(service_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .catalog_service()
        .delete_service(&user.user, service_id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Service deleted successfully"
    })))
}

pub async fn list_active_plans(
    Path(service_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    user: Option<Extension<JWTAuthMiddleware>>,
) -> Result<impl IntoResponse, HttpError> {
    let actor = user.as_ref().map(|Extension(auth)| &auth.user);
    let plans = app_state
        .plan_service()
        .list_plans_for_service(actor, service_id, true)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "results": plans.len(),
        "data": plans
    })))
}

pub async fn list_all_plans(
    Path(service_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let plans = app_state
        .plan_service()
        .list_plans_for_service(Some(&user.user), service_id, false)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "results": plans.len(),
        "data": plans
    })))
}

pub async fn create_plan(
    Path(service_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreatePlanDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let plan = app_state
        .plan_service()
        .create_plan(&user.user, service_id, body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Plan created successfully",
        "data": plan
    })))
}
