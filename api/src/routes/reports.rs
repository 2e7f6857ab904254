use actix_web::{web, HttpResponse, Scope};
use uuid::Uuid;
use validator::Validate;

use crate::dto::report::{
    AssignReportRequest, CreateReportRequest, EscalateReportRequest, ResolveReportRequest,
    RespondToReportRequest,
};
use crate::errors::{validation_failed, ApiResult};
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/reports")
        .route("", web::post().to(create))
        .route("", web::get().to(list_all))
        .route("/mine", web::get().to(list_mine))
        .route("/apartment/{apartment_id}", web::get().to(list_for_apartment))
        .route("/{id}/respond", web::post().to(respond))
        .route("/{id}/resolve", web::post().to(resolve))
        .route("/{id}/assign", web::post().to(assign))
        .route("/{id}/escalate", web::post().to(escalate))
}

async fn create(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    body: web::Json<CreateReportRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let report = state
        .reports
        .create(&principal, body.apartment_id, body.message, body.report_type)
        .await?;
    Ok(HttpResponse::Created().json(report))
}

async fn list_all(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let reports = state.reports.list_all(&principal).await?;
    Ok(HttpResponse::Ok().json(reports))
}

async fn list_mine(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let reports = state.reports.list_mine(&principal).await?;
    Ok(HttpResponse::Ok().json(reports))
}

async fn list_for_apartment(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let reports = state
        .reports
        .list_for_apartment(&principal, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(reports))
}

async fn respond(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<RespondToReportRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let report = state
        .reports
        .respond(&principal, path.into_inner(), body.response)
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

async fn resolve(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<ResolveReportRequest>,
) -> ApiResult<HttpResponse> {
    let report = state
        .reports
        .resolve(&principal, path.into_inner(), body.into_inner().notes)
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

async fn assign(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<AssignReportRequest>,
) -> ApiResult<HttpResponse> {
    let report = state
        .reports
        .assign(&principal, path.into_inner(), body.into_inner().agent_id)
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

async fn escalate(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<EscalateReportRequest>,
) -> ApiResult<HttpResponse> {
    let report = state
        .reports
        .escalate(&principal, path.into_inner(), body.into_inner().notes)
        .await?;
    Ok(HttpResponse::Ok().json(report))
}
