use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::userdtos::*,
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    models::usermodel::UserRole,
    AppState,
};

pub fn users_handler() -> Router {
    let admin_routes = Router::new()
        .route("/users", get(get_users_admin))
        .route("/users/by-email", get(get_user_by_email))
        .route("/users/:user_id/role", put(update_user_role))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }));

    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/me/is-admin", get(is_admin))
        .nest("/admin", admin_routes)
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user.user),
        },
    }))
}

pub async fn update_me(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateUserProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let updated = app_state
        .user_service()
        .update_profile(&user.user, body)
        .await?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated),
        },
    }))
}

pub async fn is_admin(
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(IsAdminResponseDto {
        status: "success".to_string(),
        is_admin: user.user.is_admin(),
    }))
}

pub async fn get_users_admin(
    Query(query_params): Query<UserListQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state
        .user_service()
        .list_users(&user.user, query_params.role, query_params.search.as_deref())
        .await?;

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        results: users.len(),
        users: FilterUserDto::filter_users(&users),
    }))
}

pub async fn get_user_by_email(
    Query(query_params): Query<UserByEmailQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let found = app_state
        .user_service()
        .get_user_by_email(&user.user, &query_params.email)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "user": found.as_ref().map(FilterUserDto::filter_user)
        }
    })))
}

pub async fn update_user_role(
    Path(user_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateUserRoleDto>,
) -> Result<impl IntoResponse, HttpError> {
    let updated = app_state
        .user_service()
        .update_user_role(&user.user, user_id, body.role)
        .await?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated),
        },
    }))
}
