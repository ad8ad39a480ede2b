use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::enrollmentdtos::*,
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    models::usermodel::UserRole,
    AppState,
};

pub fn enrollments_handler() -> Router {
    Router::new()
        .route("/", get(get_my_enrollments).post(create_enrollment))
        .route("/details", get(get_my_enrollments_with_details))
        .route("/check", get(check_enrollment))
        .route(
            "/admin",
            get(get_all_enrollments).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route("/:enrollment_id", get(get_enrollment))
        .route("/:enrollment_id/status", patch(update_enrollment_status))
        .route("/:enrollment_id/cancel", post(cancel_enrollment))
}

pub async fn create_enrollment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateEnrollmentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let enrollment = app_state
        .enrollment_service()
        .create_enrollment(&user.user, body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Enrollment created successfully",
        "data": enrollment
    })))
}

pub async fn get_my_enrollments(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let enrollments = app_state
        .enrollment_service()
        .get_user_enrollments(&user.user)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "results": enrollments.len(),
        "data": enrollments
    })))
}

pub async fn get_my_enrollments_with_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let enrollments = app_state
        .enrollment_service()
        .get_user_enrollments_with_details(&user.user)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "results": enrollments.len(),
        "data": enrollments
    })))
}

pub async fn check_enrollment(
    Query(query_params): Query<CheckEnrollmentQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let check = app_state
        .enrollment_service()
        .check_user_enrollment(&user.user, query_params.service_id, query_params.user_id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "data": check
    })))
}

pub async fn get_all_enrollments(
    Query(query_params): Query<EnrollmentFilterQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let filter = query_params.into_filter().map_err(HttpError::bad_request)?;

    let enrollments = app_state
        .enrollment_service()
        .get_all_enrollments(&user.user, filter)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "results": enrollments.len(),
        "data": enrollments
    })))
}

pub async fn get_enrollment(
    Path(enrollment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let enrollment = app_state
        .enrollment_service()
        .get_enrollment(&user.user, enrollment_id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "data": enrollment
    })))
}

pub async fn update_enrollment_status(
    Path(enrollment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateEnrollmentStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let enrollment = app_state
        .enrollment_service()
        .update_enrollment_status(&user.user, enrollment_id, body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "data": enrollment
    })))
}

pub async fn cancel_enrollment(
    Path(enrollment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    body: Option<Json<CancelEnrollmentDto>>,
) -> Result<impl IntoResponse, HttpError> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let enrollment = app_state
        .enrollment_service()
        .cancel_enrollment(&user.user, enrollment_id, body.cancel_reason)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Enrollment cancelled",
        "data": enrollment
    })))
}
