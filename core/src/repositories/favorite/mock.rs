//! Mock implementation of FavoriteRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Favorite;
use crate::errors::DomainError;

use super::trait_::FavoriteRepository;

/// In-memory favorite repository
#[derive(Clone, Default)]
pub struct MockFavoriteRepository {
    favorites: Arc<RwLock<HashMap<Uuid, Favorite>>>,
}

impl MockFavoriteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteRepository for MockFavoriteRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Favorite>, DomainError> {
        let favorites = self.favorites.read().await;
        Ok(favorites.get(&id).cloned())
    }

    async fn create(&self, favorite: Favorite) -> Result<Favorite, DomainError> {
        let mut favorites = self.favorites.write().await;
        if favorites
            .values()
            .any(|f| f.user_id == favorite.user_id && f.apartment_id == favorite.apartment_id)
        {
            return Err(DomainError::conflict("Apartment already in favorites"));
        }
        favorites.insert(favorite.id, favorite.clone());
        Ok(favorite)
    }

    async fn update(&self, favorite: Favorite) -> Result<Favorite, DomainError> {
        let mut favorites = self.favorites.write().await;
        if !favorites.contains_key(&favorite.id) {
            return Err(DomainError::not_found("Favorite"));
        }
        favorites.insert(favorite.id, favorite.clone());
        Ok(favorite)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut favorites = self.favorites.write().await;
        Ok(favorites.remove(&id).is_some())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Favorite>, DomainError> {
        let favorites = self.favorites.read().await;
        let mut mine: Vec<Favorite> = favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn find_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<Favorite>, DomainError> {
        let favorites = self.favorites.read().await;
        Ok(favorites
            .values()
            .find(|f| f.user_id == user_id && f.apartment_id == apartment_id)
            .cloned())
    }

    async fn delete_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<bool, DomainError> {
        let mut favorites = self.favorites.write().await;
        let id = favorites
            .values()
            .find(|f| f.user_id == user_id && f.apartment_id == apartment_id)
            .map(|f| f.id);
        match id {
            Some(id) => Ok(favorites.remove(&id).is_some()),
            None => Ok(false),
        }
    }
}
