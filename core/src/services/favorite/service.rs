//! Saved apartments.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{Favorite, Principal};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{ApartmentRepository, FavoriteRepository};

/// Favorites service
pub struct FavoriteService {
    favorite_repo: Arc<dyn FavoriteRepository>,
    apartment_repo: Arc<dyn ApartmentRepository>,
}

impl FavoriteService {
    pub fn new(
        favorite_repo: Arc<dyn FavoriteRepository>,
        apartment_repo: Arc<dyn ApartmentRepository>,
    ) -> Self {
        Self {
            favorite_repo,
            apartment_repo,
        }
    }

    fn user_id(principal: &Principal) -> DomainResult<Uuid> {
        match principal {
            Principal::User(user) => Ok(user.id),
            _ => Err(DomainError::forbidden("Only users can save favorites")),
        }
    }

    /// Saves an apartment; one row per (user, apartment)
    pub async fn add(
        &self,
        principal: &Principal,
        apartment_id: Uuid,
        notes: String,
        tags: Vec<String>,
    ) -> DomainResult<Favorite> {
        let user_id = Self::user_id(principal)?;
        self.apartment_repo
            .find_by_id(apartment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Apartment"))?;
        if self
            .favorite_repo
            .find_by_user_and_apartment(user_id, apartment_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict("Apartment already in favorites"));
        }
        self.favorite_repo
            .create(Favorite::new(user_id, apartment_id, notes, tags))
            .await
    }

    /// Edits the notes and tags on a saved apartment
    pub async fn update(
        &self,
        principal: &Principal,
        favorite_id: Uuid,
        notes: Option<String>,
        tags: Option<Vec<String>>,
    ) -> DomainResult<Favorite> {
        let user_id = Self::user_id(principal)?;
        let mut favorite = self
            .favorite_repo
            .find_by_id(favorite_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Favorite"))?;
        if !favorite.is_owned_by(user_id) {
            return Err(DomainError::forbidden(
                "You can only manage your own favorites",
            ));
        }
        favorite.update(notes, tags);
        self.favorite_repo.update(favorite).await
    }

    /// Removes the caller's favorite for an apartment
    pub async fn remove(&self, principal: &Principal, apartment_id: Uuid) -> DomainResult<()> {
        let user_id = Self::user_id(principal)?;
        let removed = self
            .favorite_repo
            .delete_by_user_and_apartment(user_id, apartment_id)
            .await?;
        if removed {
            Ok(())
        } else {
            Err(DomainError::not_found("Favorite"))
        }
    }

    pub async fn list_mine(&self, principal: &Principal) -> DomainResult<Vec<Favorite>> {
        let user_id = Self::user_id(principal)?;
        self.favorite_repo.find_by_user(user_id).await
    }

    pub async fn is_favorited(
        &self,
        principal: &Principal,
        apartment_id: Uuid,
    ) -> DomainResult<bool> {
        let user_id = Self::user_id(principal)?;
        Ok(self
            .favorite_repo
            .find_by_user_and_apartment(user_id, apartment_id)
            .await?
            .is_some())
    }
}
