//! Registration and login endpoints for the three account kinds.

use actix_web::{web, HttpResponse, Scope};
use validator::Validate;

use rn_shared::types::ApiResponse;

use crate::dto::auth::{
    AdminAuthResponse, AgentAuthResponse, LoginRequest, RegisterAdminRequest,
    RegisterAgentRequest, RegisterUserRequest, UserAuthResponse,
};
use crate::errors::{validation_failed, ApiResult};
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/auth")
        .route("/user/register", web::post().to(register_user))
        .route("/user/login", web::post().to(login_user))
        .route("/agent/register", web::post().to(register_agent))
        .route("/agent/login", web::post().to(login_agent))
        .route("/admin/register", web::post().to(register_admin))
        .route("/admin/login", web::post().to(login_admin))
}

async fn register_user(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let auth = state
        .auth
        .register_user(body.name, body.email, body.password, body.phone)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(
        "Registration successful",
        UserAuthResponse {
            token: auth.token,
            user: auth.account,
        },
    )))
}

async fn login_user(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let auth = state.auth.login_user(body.email, body.password).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Login successful",
        UserAuthResponse {
            token: auth.token,
            user: auth.account,
        },
    )))
}

async fn register_agent(
    state: web::Data<AppState>,
    body: web::Json<RegisterAgentRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let auth = state
        .auth
        .register_agent(
            body.name,
            body.email,
            body.password,
            body.phone,
            body.certificate,
        )
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(
        "Registration successful, awaiting approval",
        AgentAuthResponse {
            token: auth.token,
            agent: auth.account,
        },
    )))
}

async fn login_agent(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let auth = state.auth.login_agent(body.email, body.password).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Login successful",
        AgentAuthResponse {
            token: auth.token,
            agent: auth.account,
        },
    )))
}

async fn register_admin(
    state: web::Data<AppState>,
    body: web::Json<RegisterAdminRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let auth = state
        .auth
        .register_admin(body.name, body.email, body.password)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(
        "Registration successful",
        AdminAuthResponse {
            token: auth.token,
            admin: auth.account,
        },
    )))
}

async fn login_admin(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let auth = state.auth.login_admin(body.email, body.password).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Login successful",
        AdminAuthResponse {
            token: auth.token,
            admin: auth.account,
        },
    )))
}
