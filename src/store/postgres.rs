use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::club::Club;
use crate::models::interview::{Interview, InterviewStatus};
use crate::models::interview_slot::InterviewSlot;
use crate::models::notification::Notification;
use crate::store::{BookedInterview, BookingPolicy, BookingRequest, ClubStore, NewSlot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgClubStore {
    pool: PgPool,
}

impl PgClubStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[async_trait]
impl ClubStore for PgClubStore {
    async fn create_club(&self, name: &str, description: Option<&str>) -> Result<Club> {
        let club = sqlx::query_as::<_, Club>(
            r#"INSERT INTO clubs (name, description) VALUES ($1, $2) RETURNING *"#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(club)
    }

    async fn get_club(&self, id: Uuid) -> Result<Club> {
        sqlx::query_as::<_, Club>(r#"SELECT * FROM clubs WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Club not found".to_string()))
    }

    async fn list_clubs(&self) -> Result<Vec<Club>> {
        let clubs = sqlx::query_as::<_, Club>(r#"SELECT * FROM clubs ORDER BY name ASC"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(clubs)
    }

    async fn set_club_active(&self, id: Uuid, active: bool) -> Result<Club> {
        sqlx::query_as::<_, Club>(
            r#"UPDATE clubs SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING *"#,
        )
        .bind(active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Club not found".to_string()))
    }

    async fn insert_application(
        &self,
        user_id: Uuid,
        club_id: Uuid,
        motivation: &str,
    ) -> Result<Application> {
        let existing: Option<(Uuid,)> = sqlx::query_as(
            r#"SELECT id FROM applications WHERE user_id = $1 AND club_id = $2"#,
        )
        .bind(user_id)
        .bind(club_id)
        .fetch_optional(&self.pool)
        .await?;
        if existing.is_some() {
            return Err(Error::DuplicateApplication(
                "You have already applied to this club".to_string(),
            ));
        }

        let inserted = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (user_id, club_id, motivation, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(club_id)
        .bind(motivation)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(application) => Ok(application),
            // The unique index catches racing submits the pre-check missed.
            Err(err) if is_unique_violation(&err) => Err(Error::DuplicateApplication(
                "You have already applied to this club".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn get_application(&self, id: Uuid) -> Result<Application> {
        sqlx::query_as::<_, Application>(r#"SELECT * FROM applications WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))
    }

    async fn list_club_applications(&self, club_id: Uuid) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"SELECT * FROM applications WHERE club_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn list_user_applications(&self, user_id: Uuid) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let application = sqlx::query_as::<_, Application>(
            r#"SELECT * FROM applications WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        if !application.status.can_transition_to(next) {
            return Err(Error::Conflict(format!(
                "Cannot move application from '{}' to '{}'",
                application.status, next
            )));
        }

        let updated = sqlx::query_as::<_, Application>(
            r#"UPDATE applications SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *"#,
        )
        .bind(next)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn create_slot(&self, slot: NewSlot) -> Result<InterviewSlot> {
        let created = sqlx::query_as::<_, InterviewSlot>(
            r#"
            INSERT INTO interview_slots
                (club_id, start_time, end_time, max_interviews, location, is_online)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(slot.club_id)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.max_interviews)
        .bind(slot.location)
        .bind(slot.is_online)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_slot(&self, id: Uuid) -> Result<InterviewSlot> {
        sqlx::query_as::<_, InterviewSlot>(r#"SELECT * FROM interview_slots WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Interview slot not found".to_string()))
    }

    async fn list_club_slots(&self, club_id: Uuid) -> Result<Vec<InterviewSlot>> {
        let slots = sqlx::query_as::<_, InterviewSlot>(
            r#"SELECT * FROM interview_slots WHERE club_id = $1 ORDER BY start_time ASC"#,
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    async fn disable_slot(&self, id: Uuid) -> Result<InterviewSlot> {
        sqlx::query_as::<_, InterviewSlot>(
            r#"UPDATE interview_slots SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Interview slot not found".to_string()))
    }

    async fn book_interview(
        &self,
        req: &BookingRequest,
        policy: BookingPolicy,
        now: DateTime<Utc>,
    ) -> Result<BookedInterview> {
        let mut tx = self.pool.begin().await?;

        // Locking the application row serializes concurrent bookers for the
        // same application, even across different slots.
        let application = sqlx::query_as::<_, Application>(
            r#"SELECT * FROM applications WHERE id = $1 FOR UPDATE"#,
        )
        .bind(req.application_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        if !application.status.can_schedule_interview() {
            return Err(Error::Conflict(
                "This application has already been decided".to_string(),
            ));
        }

        let active_interviews: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM interviews WHERE application_id = $1 AND status <> 'canceled'"#,
        )
        .bind(req.application_id)
        .fetch_one(&mut *tx)
        .await?;
        if active_interviews > 0 {
            return Err(Error::DuplicateBooking(
                "This application already has a scheduled interview".to_string(),
            ));
        }

        // Row lock serializes concurrent bookers on the same slot.
        let slot = sqlx::query_as::<_, InterviewSlot>(
            r#"SELECT * FROM interview_slots WHERE id = $1 FOR UPDATE"#,
        )
        .bind(req.slot_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Interview slot not found".to_string()))?;

        slot.ensure_bookable(now, policy)?;

        let inserted = sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews
                (application_id, slot_id, scheduled_at, status, additional_info, phone)
            VALUES ($1, $2, $3, 'scheduled', $4, $5)
            RETURNING *
            "#,
        )
        .bind(req.application_id)
        .bind(req.slot_id)
        .bind(slot.start_time)
        .bind(req.additional_info.as_deref())
        .bind(req.phone.as_deref())
        .fetch_one(&mut *tx)
        .await;

        let interview = match inserted {
            Ok(interview) => interview,
            // The partial unique index on non-canceled interviews catches
            // anything that slipped past the count.
            Err(err) if is_unique_violation(&err) => {
                return Err(Error::DuplicateBooking(
                    "This application already has a scheduled interview".to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        // Guarded in SQL as well; with the row lock held this can only
        // fail if the capacity was reduced under us.
        let incremented = sqlx::query(
            r#"
            UPDATE interview_slots
            SET booked_interviews = booked_interviews + 1, updated_at = NOW()
            WHERE id = $1 AND booked_interviews < max_interviews
            "#,
        )
        .bind(req.slot_id)
        .execute(&mut *tx)
        .await?;
        if incremented.rows_affected() == 0 {
            return Err(Error::SlotUnavailable(
                "This interview slot is fully booked".to_string(),
            ));
        }

        // Rebooking after a cancellation keeps `interview_scheduled`.
        let application = if application.status == ApplicationStatus::Pending {
            sqlx::query_as::<_, Application>(
                r#"UPDATE applications SET status = 'interview_scheduled', updated_at = NOW()
                   WHERE id = $1 RETURNING *"#,
            )
            .bind(req.application_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            application
        };

        let slot = sqlx::query_as::<_, InterviewSlot>(
            r#"SELECT * FROM interview_slots WHERE id = $1"#,
        )
        .bind(req.slot_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BookedInterview {
            interview,
            application,
            slot,
        })
    }

    async fn cancel_interview(&self, id: Uuid) -> Result<Interview> {
        let mut tx = self.pool.begin().await?;

        let interview = sqlx::query_as::<_, Interview>(
            r#"SELECT * FROM interviews WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;

        if interview.status != InterviewStatus::Scheduled {
            return Err(Error::Conflict(format!(
                "Cannot cancel an interview in status '{}'",
                interview.status
            )));
        }

        let canceled = sqlx::query_as::<_, Interview>(
            r#"UPDATE interviews SET status = 'canceled', updated_at = NOW() WHERE id = $1 RETURNING *"#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE interview_slots
            SET booked_interviews = booked_interviews - 1, updated_at = NOW()
            WHERE id = $1 AND booked_interviews > 0
            "#,
        )
        .bind(interview.slot_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(canceled)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Interview> {
        sqlx::query_as::<_, Interview>(r#"SELECT * FROM interviews WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))
    }

    async fn list_slot_interviews(&self, slot_id: Uuid) -> Result<Vec<Interview>> {
        let interviews = sqlx::query_as::<_, Interview>(
            r#"SELECT * FROM interviews WHERE slot_id = $1 ORDER BY created_at ASC"#,
        )
        .bind(slot_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(interviews)
    }

    async fn record_feedback(
        &self,
        id: Uuid,
        feedback: Option<&str>,
        rating: Option<i32>,
    ) -> Result<Interview> {
        let mut tx = self.pool.begin().await?;

        let interview = sqlx::query_as::<_, Interview>(
            r#"SELECT * FROM interviews WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;

        if interview.status != InterviewStatus::Scheduled {
            return Err(Error::Conflict(format!(
                "Cannot record feedback for an interview in status '{}'",
                interview.status
            )));
        }

        let updated = sqlx::query_as::<_, Interview>(
            r#"
            UPDATE interviews
            SET status = 'completed', feedback = $1, rating = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(feedback)
        .bind(rating)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn insert_notification(&self, user_id: Uuid, message: &str) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"INSERT INTO notifications (user_id, message) VALUES ($1, $2) RETURNING *"#,
        )
        .bind(user_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;
        Ok(notification)
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification> {
        sqlx::query_as::<_, Notification>(
            r#"UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2 RETURNING *"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Notification not found".to_string()))
    }
}
