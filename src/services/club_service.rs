use crate::error::Result;
use crate::models::club::Club;
use crate::store::ClubStore;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct ClubService {
    store: Arc<dyn ClubStore>,
}

impl ClubService {
    pub fn new(store: Arc<dyn ClubStore>) -> Self {
        Self { store }
    }

    pub async fn create_club(&self, name: &str, description: Option<&str>) -> Result<Club> {
        let club = self.store.create_club(name, description).await?;
        tracing::info!(club_id = %club.id, name = %club.name, "Club created");
        Ok(club)
    }

    pub async fn get_club(&self, id: Uuid) -> Result<Club> {
        self.store.get_club(id).await
    }

    pub async fn list_clubs(&self) -> Result<Vec<Club>> {
        self.store.list_clubs().await
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Club> {
        let club = self.store.set_club_active(id, active).await?;
        tracing::info!(club_id = %club.id, active, "Club active flag updated");
        Ok(club)
    }
}
