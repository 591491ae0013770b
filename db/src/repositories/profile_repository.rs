use crate::models::profile::{ActiveModel, Column, Entity, Model, Role};
use crate::repositories::Actor;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

/// Profile reads plus the `last_checked_tickets_at` marker.
#[derive(Clone)]
pub struct ProfileRepository {
    db: DatabaseConnection,
}

impl ProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Model, DbErr> {
        Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Profile {id} not found")))
    }

    pub async fn last_checked_at(&self, id: i64) -> Result<Option<DateTime<Utc>>, DbErr> {
        Ok(self.find_by_id(id).await?.last_checked_tickets_at)
    }

    /// Overwrites the marker with `at`.
    pub async fn set_last_checked(&self, id: i64, at: DateTime<Utc>) -> Result<Model, DbErr> {
        let profile = self.find_by_id(id).await?;
        let mut active: ActiveModel = profile.into();
        active.last_checked_tickets_at = Set(Some(at));
        active.update(&self.db).await
    }

    /// Client accounts ordered by name. Empty for non-employees.
    pub async fn list_clients(&self, actor: &Actor) -> Result<Vec<Model>, DbErr> {
        if !actor.is_employee() {
            return Ok(Vec::new());
        }

        Entity::find()
            .filter(Column::Role.eq(Role::Client))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn marker_is_absent_then_overwritten() {
        let db = setup_test_db().await;
        let user = Model::create(&db, "Ana", "ana@example.com", "pw", Role::Client, None)
            .await
            .unwrap();
        let repo = ProfileRepository::new(db);

        assert_eq!(repo.last_checked_at(user.id).await.unwrap(), None);

        let first = Utc::now();
        repo.set_last_checked(user.id, first).await.unwrap();
        let second = first + chrono::Duration::seconds(30);
        repo.set_last_checked(user.id, second).await.unwrap();

        assert_eq!(repo.last_checked_at(user.id).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let repo = ProfileRepository::new(setup_test_db().await);
        let err = repo.last_checked_at(999).await.unwrap_err();
        assert!(matches!(err, DbErr::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn only_employees_list_clients() {
        let db = setup_test_db().await;
        let emp = Model::create(&db, "Eva", "eva@agency.com", "pw", Role::Employee, None)
            .await
            .unwrap();
        let zed = Model::create(&db, "Zed", "zed@client.com", "pw", Role::Client, None)
            .await
            .unwrap();
        Model::create(&db, "Bia", "bia@client.com", "pw", Role::Client, Some("Acme"))
            .await
            .unwrap();
        let repo = ProfileRepository::new(db);

        let names: Vec<String> = repo
            .list_clients(&Actor::from(&emp))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Bia", "Zed"]);

        assert!(repo.list_clients(&Actor::from(&zed)).await.unwrap().is_empty());
    }
}
