use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryFilter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A portal account in the `profiles` table.
///
/// Identity (credentials) and profile data share one row. The
/// `last_checked_tickets_at` column is owned by the unread-activity ledger.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub company: Option<String>,
    /// Absent until the first ticket-list view.
    pub last_checked_tickets_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "client")]
    Client,

    #[sea_orm(string_value = "employee")]
    Employee,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tickets::Entity")]
    Tickets,

    #[sea_orm(has_many = "super::ticket_messages::Entity")]
    Messages,
}

impl Related<super::tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

impl Related<super::ticket_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a profile with a freshly hashed password.
    pub async fn create(
        db: &DbConn,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        company: Option<&str>,
    ) -> Result<Model, DbErr> {
        let password_hash = Self::hash_password(password)?;

        let active_model = ActiveModel {
            name: Set(name.to_owned()),
            email: Set(email.trim().to_lowercase()),
            password_hash: Set(password_hash),
            role: Set(role),
            company: Set(company.map(str::to_owned)),
            last_checked_tickets_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_email(db: &DbConn, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await
    }

    pub async fn get_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub fn hash_password(password: &str) -> Result<String, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DbErr::Custom(format!("Failed to hash password: {e}")))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_hashes_password_and_normalizes_email() {
        let db = setup_test_db().await;
        let profile = Model::create(&db, "Ana", " Ana@Example.com ", "secret123", Role::Client, None)
            .await
            .unwrap();

        assert_eq!(profile.email, "ana@example.com");
        assert_ne!(profile.password_hash, "secret123");
        assert!(profile.verify_password("secret123"));
        assert!(!profile.verify_password("wrong"));
        assert!(profile.last_checked_tickets_at.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let db = setup_test_db().await;
        Model::create(&db, "A", "dup@example.com", "pw", Role::Client, None)
            .await
            .unwrap();
        let second = Model::create(&db, "B", "dup@example.com", "pw", Role::Employee, None).await;
        assert!(second.is_err());
    }

    #[test]
    fn role_round_trips_as_lowercase() {
        assert_eq!(Role::Employee.to_string(), "employee");
        assert_eq!("Client".parse::<Role>().unwrap(), Role::Client);
    }
}
