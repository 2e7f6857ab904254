use actix_web::{web, HttpResponse, Scope};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use rn_core::services::AuthService;
use rn_shared::types::MessageResponse;

use crate::dto::notification::{BroadcastRequest, NotificationQuery};
use crate::errors::{validation_failed, ApiResult};
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/notifications")
        .route("", web::get().to(feed))
        .route("/unread-count", web::get().to(unread_count))
        .route("/read-all", web::post().to(mark_all_read))
        .route("/broadcast", web::post().to(broadcast))
        .route("/purge-expired", web::post().to(purge_expired))
        .route("/{id}/read", web::post().to(mark_read))
        .route("/{id}/archive", web::post().to(archive))
        .route("/{id}", web::delete().to(delete))
}

async fn feed(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    query: web::Query<NotificationQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let page = state
        .notifications
        .feed(&principal, query.filter(), query.pagination())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

async fn unread_count(
    state: web::Data<AppState>,
    Auth(principal): Auth,
) -> ApiResult<HttpResponse> {
    let unread = state.notifications.unread_count(&principal).await?;
    Ok(HttpResponse::Ok().json(json!({ "unread": unread })))
}

async fn mark_all_read(
    state: web::Data<AppState>,
    Auth(principal): Auth,
) -> ApiResult<HttpResponse> {
    let updated = state.notifications.mark_all_read(&principal).await?;
    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

async fn broadcast(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    body: web::Json<BroadcastRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let recipients = state
        .notifications
        .broadcast(
            &principal,
            body.title,
            body.message,
            body.priority,
            body.expires_at,
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Broadcast sent",
        "recipients": recipients,
    })))
}

async fn purge_expired(
    state: web::Data<AppState>,
    Auth(principal): Auth,
) -> ApiResult<HttpResponse> {
    AuthService::require_admin(&principal)?;
    let purged = state.notifications.purge_expired().await?;
    Ok(HttpResponse::Ok().json(json!({ "purged": purged })))
}

async fn mark_read(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let notification = state
        .notifications
        .mark_read(&principal, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(notification))
}

async fn archive(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let notification = state
        .notifications
        .archive(&principal, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(notification))
}

async fn delete(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .notifications
        .delete(&principal, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Notification deleted")))
}
