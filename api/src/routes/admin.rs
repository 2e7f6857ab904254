//! Account administration endpoints; every operation here is admin-only,
//! enforced inside the services.

use actix_web::{web, HttpResponse, Scope};
use uuid::Uuid;

use rn_shared::types::MessageResponse;

use crate::dto::admin::{AgentListQuery, DecideAgentRequest};
use crate::errors::ApiResult;
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/admin")
        .route("/users", web::get().to(list_users))
        .route("/users/{id}", web::delete().to(delete_user))
        .route("/agents", web::get().to(list_agents))
        .route("/agents/{id}/decide", web::post().to(decide_agent))
        .route("/agents/{id}", web::delete().to(delete_agent))
}

async fn list_users(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let users = state.admin.list_users(&principal).await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn delete_user(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.admin.delete_user(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

async fn list_agents(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    query: web::Query<AgentListQuery>,
) -> ApiResult<HttpResponse> {
    let agents = state.admin.list_agents(&principal, query.into_inner().status).await?;
    Ok(HttpResponse::Ok().json(agents))
}

async fn decide_agent(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<DecideAgentRequest>,
) -> ApiResult<HttpResponse> {
    let agent = state
        .admin
        .decide_agent(&principal, path.into_inner(), body.into_inner().approve)
        .await?;
    Ok(HttpResponse::Ok().json(agent))
}

async fn delete_agent(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.admin.delete_agent(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Agent deleted successfully")))
}
