use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::store::ClubStore;
use std::sync::Arc;
use uuid::Uuid;

/// Registry of membership applications: one per (user, club), kept forever.
#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn ClubStore>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn ClubStore>) -> Self {
        Self { store }
    }

    pub async fn submit(
        &self,
        user_id: Uuid,
        club_id: Uuid,
        motivation: &str,
    ) -> Result<Application> {
        let club = self.store.get_club(club_id).await?;
        if !club.is_active {
            return Err(Error::Conflict(
                "This club is not accepting applications".to_string(),
            ));
        }

        let application = self
            .store
            .insert_application(user_id, club_id, motivation.trim())
            .await?;
        tracing::info!(
            application_id = %application.id,
            user_id = %user_id,
            club_id = %club_id,
            "Application submitted"
        );
        Ok(application)
    }

    pub async fn get(&self, id: Uuid) -> Result<Application> {
        self.store.get_application(id).await
    }

    pub async fn list_for_club(&self, club_id: Uuid) -> Result<Vec<Application>> {
        self.store.list_club_applications(club_id).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        self.store.list_user_applications(user_id).await
    }

    /// Admin decision on an application. Transitions are monotonic; the
    /// store refuses anything the state machine does not allow.
    pub async fn decide(&self, id: Uuid, next: ApplicationStatus) -> Result<Application> {
        let application = self.store.update_application_status(id, next).await?;
        tracing::info!(
            application_id = %application.id,
            status = %application.status,
            "Application status updated"
        );
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryClubStore;

    async fn service_with_club() -> (ApplicationService, Uuid, Arc<MemoryClubStore>) {
        let store = Arc::new(MemoryClubStore::new());
        let club = store.create_club("Chess Club", None).await.unwrap();
        (ApplicationService::new(store.clone()), club.id, store)
    }

    #[tokio::test]
    async fn submit_is_idempotent_per_user_and_club() {
        let (service, club_id, _store) = service_with_club().await;
        let user = Uuid::new_v4();

        let first = service
            .submit(user, club_id, "I love robotics")
            .await
            .unwrap();
        assert_eq!(first.status, ApplicationStatus::Pending);

        let err = service
            .submit(user, club_id, "Let me in already")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateApplication(_)));
        assert_eq!(service.list_for_user(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn inactive_club_refuses_applications() {
        let (service, club_id, store) = service_with_club().await;
        store.set_club_active(club_id, false).await.unwrap();

        let err = service
            .submit(Uuid::new_v4(), club_id, "Anyone there?")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn decisions_follow_the_state_machine() {
        let (service, club_id, _store) = service_with_club().await;
        let application = service
            .submit(Uuid::new_v4(), club_id, "I love robotics")
            .await
            .unwrap();

        let err = service
            .decide(application.id, ApplicationStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let rejected = service
            .decide(application.id, ApplicationStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(rejected.status, ApplicationStatus::Rejected);

        let err = service
            .decide(application.id, ApplicationStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
