use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    dtos::userdtos::{FilterUserDto, Response, SessionRequestDto, SessionResponseDto, UserData},
    error::HttpError,
    utils::token,
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/session", post(create_session))
        .route("/logout", post(logout))
}

fn cookie_header(cookie: Cookie<'_>) -> Result<HeaderMap, HttpError> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, value);
    Ok(headers)
}

/// Exchanges an identity-provider token for a backend session.
pub async fn create_session(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SessionRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let principal = app_state.identity.verify(&body.identity_token)?;
    let user = app_state.user_service().sign_in(principal).await?;

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(time::Duration::minutes(app_state.env.jwt_maxage))
        .http_only(true)
        .build();

    let response = Json(SessionResponseDto {
        status: "success".to_string(),
        token,
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    });

    let mut response = response.into_response();
    response.headers_mut().extend(cookie_header(cookie)?);

    Ok(response)
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .http_only(true)
        .build();

    let mut response = Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    })
    .into_response();
    response.headers_mut().extend(cookie_header(cookie)?);

    Ok(response)
}
