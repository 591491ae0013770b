//! Unread-activity ledger.
//!
//! A single `last_checked_tickets_at` timestamp per profile, overwritten each
//! time the ticket list is opened. The unread count is the number of visible
//! tickets updated strictly after it. A profile that never opened the list
//! has no backlog.

use crate::error::ServiceResult;
use chrono::{DateTime, Utc};
use db::{
    feed::ChangeFeed,
    repositories::{profile_repository::ProfileRepository, ticket_repository::TicketRepository, Actor},
};
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct LedgerService {
    profiles: ProfileRepository,
    tickets: TicketRepository,
}

impl LedgerService {
    pub fn new(db: DatabaseConnection, feed: ChangeFeed) -> Self {
        Self {
            profiles: ProfileRepository::new(db.clone()),
            tickets: TicketRepository::new(db, feed),
        }
    }

    pub async fn get_unread_count(&self, actor: &Actor) -> ServiceResult<u64> {
        let Some(since) = self.profiles.last_checked_at(actor.id).await? else {
            return Ok(0);
        };
        Ok(self.tickets.count_updated_since(actor, since).await?)
    }

    /// Stamps the marker with the current time and returns it.
    pub async fn mark_checked(&self, actor: &Actor) -> ServiceResult<DateTime<Utc>> {
        self.mark_checked_at(actor, Utc::now()).await
    }

    pub async fn mark_checked_at(
        &self,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> ServiceResult<DateTime<Utc>> {
        self.profiles.set_last_checked(actor.id, at).await?;
        tracing::debug!(user_id = actor.id, %at, "ticket list marked as checked");
        Ok(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use db::models::{
        profile::{Model as ProfileModel, Role},
        tickets::TicketStatus,
    };
    use db::test_utils::setup_test_db;
    use std::time::Duration;

    struct Fixture {
        ledger: LedgerService,
        tickets: TicketRepository,
        client: Actor,
        other: Actor,
        employee: Actor,
    }

    async fn fixture() -> Fixture {
        let db = setup_test_db().await;
        let client = ProfileModel::create(&db, "Carla", "carla@client.com", "pw", Role::Client, None)
            .await
            .unwrap();
        let other = ProfileModel::create(&db, "Otto", "otto@client.com", "pw", Role::Client, None)
            .await
            .unwrap();
        let employee =
            ProfileModel::create(&db, "Eduardo", "edu@agency.com", "pw", Role::Employee, None)
                .await
                .unwrap();
        let feed = ChangeFeed::new();
        Fixture {
            ledger: LedgerService::new(db.clone(), feed.clone()),
            tickets: TicketRepository::new(db, feed),
            client: Actor::from(&client),
            other: Actor::from(&other),
            employee: Actor::from(&employee),
        }
    }

    #[tokio::test]
    async fn never_checked_means_no_backlog() {
        let f = fixture().await;
        for i in 0..3 {
            f.tickets
                .create_ticket(&format!("T{i}"), "m", f.client.id, f.client.id)
                .await
                .unwrap();
        }
        assert_eq!(f.ledger.get_unread_count(&f.client).await.unwrap(), 0);
        assert_eq!(f.ledger.get_unread_count(&f.employee).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn count_is_zero_right_after_marking() {
        let f = fixture().await;
        f.tickets
            .create_ticket("Old", "m", f.client.id, f.client.id)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        f.ledger.mark_checked(&f.employee).await.unwrap();
        assert_eq!(f.ledger.get_unread_count(&f.employee).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn later_updates_count_by_role() {
        let f = fixture().await;
        let mine = f
            .tickets
            .create_ticket("Mine", "m", f.client.id, f.client.id)
            .await
            .unwrap();
        let theirs = f
            .tickets
            .create_ticket("Theirs", "t", f.other.id, f.other.id)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        f.ledger.mark_checked(&f.client).await.unwrap();
        f.ledger.mark_checked(&f.employee).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        f.tickets
            .set_status(&f.employee, theirs.id, TicketStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(f.ledger.get_unread_count(&f.employee).await.unwrap(), 1);
        assert_eq!(f.ledger.get_unread_count(&f.client).await.unwrap(), 0);

        f.tickets
            .append_message(&f.employee, mine.id, "on it")
            .await
            .unwrap();
        assert_eq!(f.ledger.get_unread_count(&f.employee).await.unwrap(), 2);
        assert_eq!(f.ledger.get_unread_count(&f.client).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let f = fixture().await;
        let ghost = Actor::new(999, Role::Client);
        assert!(matches!(
            f.ledger.mark_checked(&ghost).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
