use crate::error::{not_blank, ServiceError, ServiceResult};
use db::models::profile::{Model as Profile, Role};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAccount {
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,

    pub company: Option<String>,
}

/// Credential checks and account creation over the `profiles` table.
#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the profile whose credentials match. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<Profile> {
        let profile = Profile::find_by_email(&self.db, email).await?;
        match profile {
            Some(p) if p.verify_password(password) => {
                tracing::info!(user_id = p.id, "sign-in succeeded");
                Ok(p)
            }
            _ => {
                tracing::warn!(email, "sign-in rejected");
                Err(ServiceError::Auth(INVALID_CREDENTIALS.into()))
            }
        }
    }

    /// Registers a new client account.
    pub async fn create_account(&self, input: NewAccount) -> ServiceResult<Profile> {
        input.validate()?;

        if Profile::find_by_email(&self.db, &input.email).await?.is_some() {
            return Err(ServiceError::Auth("Email already registered".into()));
        }

        let company = input
            .company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let profile = Profile::create(
            &self.db,
            input.name.trim(),
            &input.email,
            &input.password,
            Role::Client,
            company,
        )
        .await?;

        tracing::info!(user_id = profile.id, "account created");
        Ok(profile)
    }

    pub async fn profile(&self, user_id: i64) -> ServiceResult<Profile> {
        Profile::get_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Profile {user_id} not found")))
    }

    pub fn end_session(&self, user_id: i64) {
        tracing::info!(user_id, "session ended");
    }
}
