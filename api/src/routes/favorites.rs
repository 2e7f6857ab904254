use actix_web::{web, HttpResponse, Scope};
use serde_json::json;
use uuid::Uuid;

use rn_shared::types::MessageResponse;

use crate::dto::favorite::{AddFavoriteRequest, UpdateFavoriteRequest};
use crate::errors::ApiResult;
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/favorites")
        .route("", web::post().to(add))
        .route("", web::get().to(list_mine))
        .route("/check/{apartment_id}", web::get().to(check))
        .route("/{id}", web::put().to(update))
        .route("/{apartment_id}", web::delete().to(remove))
}

async fn add(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    body: web::Json<AddFavoriteRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let favorite = state
        .favorites
        .add(&principal, body.apartment_id, body.notes, body.tags)
        .await?;
    Ok(HttpResponse::Created().json(favorite))
}

async fn list_mine(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let favorites = state.favorites.list_mine(&principal).await?;
    Ok(HttpResponse::Ok().json(favorites))
}

async fn check(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let favorited = state
        .favorites
        .is_favorited(&principal, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "favorited": favorited })))
}

async fn update(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<UpdateFavoriteRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let favorite = state
        .favorites
        .update(&principal, path.into_inner(), body.notes, body.tags)
        .await?;
    Ok(HttpResponse::Ok().json(favorite))
}

async fn remove(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .favorites
        .remove(&principal, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Removed from favorites")))
}
