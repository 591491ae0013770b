use db::models::profile::{Model as Profile, Role};
use db::repositories::Actor;
use serde::Serialize;
use services::{
    ServiceError,
    auth_service::{AuthService, NewAccount},
};
use tokio::sync::watch;

/// The signed-in identity as the portal sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company: Option<String>,
}

impl SessionUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }

    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}

impl From<Profile> for SessionUser {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            role: p.role,
            company: p.company,
        }
    }
}

/// Holds the current user and notifies watchers on every change.
///
/// Created once per session and handed to whatever needs identity. Dropping
/// or [`shutdown`](SessionContext::shutdown)-ing it closes every watcher.
pub struct SessionContext {
    auth: AuthService,
    tx: watch::Sender<Option<SessionUser>>,
}

impl SessionContext {
    pub fn new(auth: AuthService) -> Self {
        let (tx, _) = watch::channel(None);
        Self { auth, tx }
    }

    pub fn current(&self) -> Option<SessionUser> {
        self.tx.borrow().clone()
    }

    /// A receiver that reports the cached state on its first `changed()` and
    /// every transition after it.
    pub fn on_session_change(&self) -> watch::Receiver<Option<SessionUser>> {
        let mut rx = self.tx.subscribe();
        rx.mark_changed();
        rx
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, ServiceError> {
        let user = SessionUser::from(self.auth.authenticate(email, password).await?);
        self.set(Some(user.clone()));
        Ok(user)
    }

    pub async fn sign_up(&self, account: NewAccount) -> Result<SessionUser, ServiceError> {
        let user = SessionUser::from(self.auth.create_account(account).await?);
        self.set(Some(user.clone()));
        Ok(user)
    }

    /// Restores a session for a previously authenticated user id.
    pub async fn resume(&self, user_id: i64) -> Result<SessionUser, ServiceError> {
        let user = SessionUser::from(self.auth.profile(user_id).await?);
        self.set(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.current() {
            self.auth.end_session(user.id);
        }
        self.set(None);
    }

    pub fn shutdown(self) {
        self.sign_out();
    }

    fn set(&self, user: Option<SessionUser>) {
        self.tx.send_if_modified(|current| {
            if *current == user {
                return false;
            }
            *current = user;
            true
        });
    }
}
