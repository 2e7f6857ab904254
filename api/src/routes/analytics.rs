use actix_web::{web, HttpResponse, Scope};
use serde_json::json;

use rn_core::services::AuthService;

use crate::dto::analytics::{CollectSnapshotRequest, HistoryQuery, LatestQuery};
use crate::errors::ApiResult;
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/analytics")
        .route("/collect", web::post().to(collect))
        .route("/dashboard", web::get().to(dashboard))
        .route("/revenue", web::get().to(revenue))
        .route("/users", web::get().to(users))
        .route("/history", web::get().to(history))
        .route("/latest", web::get().to(latest))
}

async fn collect(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    body: web::Json<CollectSnapshotRequest>,
) -> ApiResult<HttpResponse> {
    AuthService::require_admin(&principal)?;
    let body = body.into_inner();
    let snapshot = state.analytics.collect(body.date, body.period).await?;
    Ok(HttpResponse::Created().json(snapshot))
}

async fn dashboard(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let (metrics, breakdown) = state.analytics.dashboard(&principal).await?;
    Ok(HttpResponse::Ok().json(json!({
        "metrics": metrics,
        "breakdown": breakdown,
    })))
}

async fn revenue(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let report = state.analytics.revenue(&principal).await?;
    Ok(HttpResponse::Ok().json(report))
}

async fn users(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let report = state.analytics.users(&principal).await?;
    Ok(HttpResponse::Ok().json(report))
}

async fn history(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    query: web::Query<HistoryQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let snapshots = state
        .analytics
        .history(&principal, query.period, query.from, query.to)
        .await?;
    Ok(HttpResponse::Ok().json(snapshots))
}

async fn latest(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    query: web::Query<LatestQuery>,
) -> ApiResult<HttpResponse> {
    let snapshot = state
        .analytics
        .latest(&principal, query.into_inner().period)
        .await?;
    Ok(HttpResponse::Ok().json(snapshot))
}
