use crate::error::{Error, Result};
use crate::models::interview_slot::InterviewSlot;
use crate::store::{BookingPolicy, ClubStore, NewSlot};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Facade over the persisted interview slots of a club.
#[derive(Clone)]
pub struct SlotService {
    store: Arc<dyn ClubStore>,
    policy: BookingPolicy,
}

impl SlotService {
    pub fn new(store: Arc<dyn ClubStore>, policy: BookingPolicy) -> Self {
        Self { store, policy }
    }

    pub async fn create_slot(&self, slot: NewSlot) -> Result<InterviewSlot> {
        if slot.end_time <= slot.start_time {
            return Err(Error::BadRequest(
                "Slot end time must be after its start time".to_string(),
            ));
        }
        if slot.max_interviews < 1 {
            return Err(Error::BadRequest(
                "A slot must allow at least one interview".to_string(),
            ));
        }
        let club = self.store.get_club(slot.club_id).await?;
        if !club.is_active {
            return Err(Error::Conflict(
                "This club is not active".to_string(),
            ));
        }

        let created = self.store.create_slot(slot).await?;
        tracing::info!(
            slot_id = %created.id,
            club_id = %created.club_id,
            capacity = created.max_interviews,
            "Interview slot created"
        );
        Ok(created)
    }

    pub async fn get_slot(&self, id: Uuid) -> Result<InterviewSlot> {
        self.store.get_slot(id).await
    }

    /// The slot only if it can still take a booking right now.
    pub async fn find_bookable(&self, id: Uuid) -> Result<InterviewSlot> {
        let slot = self.store.get_slot(id).await?;
        slot.ensure_bookable(Utc::now(), self.policy)?;
        Ok(slot)
    }

    pub async fn list_open_slots(&self, club_id: Uuid) -> Result<Vec<InterviewSlot>> {
        let now = Utc::now();
        let slots = self.store.list_club_slots(club_id).await?;
        Ok(slots
            .into_iter()
            .filter(|s| s.is_bookable(now, self.policy))
            .collect())
    }

    pub async fn disable_slot(&self, id: Uuid) -> Result<InterviewSlot> {
        let slot = self.store.disable_slot(id).await?;
        tracing::info!(slot_id = %slot.id, "Interview slot disabled");
        Ok(slot)
    }
}
