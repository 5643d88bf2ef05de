use super::storage::{DurableStorage, ROLE_KEY, TOKEN_KEY, USER_NAME_KEY};
use crate::api::{endpoints, ApiClient};
use crate::error::{ClinicError, Result};
use crate::models::{
    Credentials, DoctorRegistration, LoginRequest, LoginResponse, PatientRegistration, Profile,
    RegistrationReceipt, Role, Session,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Display name given to administrators, who have no profile endpoint.
pub const ADMIN_DISPLAY_NAME: &str = "Admin";

/// Receiver side of the session channel. `changed()` resolves only when the
/// token, role or display name actually changed.
pub type SessionWatcher = watch::Receiver<Session>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// What to do with credentials persisted by an earlier run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestorePolicy {
    /// Trust any persisted token. No local freshness check is made.
    #[default]
    Trust,
    /// Discard persisted credentials at startup.
    RequireLogin,
}

impl FromStr for RestorePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trust" => Ok(RestorePolicy::Trust),
            "require-login" | "require_login" => Ok(RestorePolicy::RequireLogin),
            other => Err(format!(
                "Unknown session restore policy '{}' (expected trust or require-login)",
                other
            )),
        }
    }
}

impl fmt::Display for RestorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestorePolicy::Trust => f.write_str("trust"),
            RestorePolicy::RequireLogin => f.write_str("require-login"),
        }
    }
}

/// Single source of truth for who is logged in.
///
/// Every mutation is written to durable storage and then published to
/// subscribers. Mutations are serialized so the token and role always change
/// together.
pub struct SessionStore {
    api: ApiClient,
    storage: Arc<dyn DurableStorage>,
    state: watch::Sender<Session>,
    status: Mutex<AuthState>,
    commit_lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(api: ApiClient, storage: Arc<dyn DurableStorage>, policy: RestorePolicy) -> Self {
        let session = restore(storage.as_ref(), policy);
        let status = if session.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };
        debug!(?status, %policy, "session restored");

        let (state, _) = watch::channel(session);
        Self {
            api,
            storage,
            state,
            status: Mutex::new(status),
            commit_lock: Mutex::new(()),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_string)
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    pub fn display_name(&self) -> Option<String> {
        self.state.borrow().display_name.clone()
    }

    pub fn status(&self) -> AuthState {
        *lock(&self.status)
    }

    pub fn subscribe(&self) -> SessionWatcher {
        self.state.subscribe()
    }

    /// Authenticate and return the role so the caller can pick where to go next.
    ///
    /// The profile lookup that provides the display name is best effort: when
    /// it fails the user is still logged in, just without a name.
    pub async fn login(&self, email: &str, password: &str) -> Result<Role> {
        self.set_status(AuthState::Authenticating);
        debug!(email, "logging in");

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = match self.api.post(endpoints::LOGIN, None, &request).await
        {
            Ok(response) => response,
            Err(e) => {
                self.settle_status();
                return Err(login_error(e));
            }
        };

        let role = response.role;
        let credentials = Credentials {
            token: response.token,
            role,
        };
        let display_name = (role == Role::Admin).then(|| ADMIN_DISPLAY_NAME.to_string());
        let session = Session {
            credentials: Some(credentials.clone()),
            display_name,
        };
        if let Err(e) = self.commit(session) {
            self.settle_status();
            return Err(e);
        }
        self.set_status(AuthState::Authenticated);
        debug!(%role, user_id = ?response.user_id, "login succeeded");

        if let Some(path) = role.profile_path() {
            match self.fetch_display_name(path, &credentials.token).await {
                Ok(name) => {
                    if let Err(e) = self.attach_display_name(&credentials, name) {
                        warn!(error = %e, "could not persist display name");
                    }
                }
                Err(e) => {
                    warn!(%role, error = %e, "profile lookup failed, continuing without a display name")
                }
            }
        }

        Ok(role)
    }

    /// Forget the session in memory and in durable storage. Never fails.
    pub fn logout(&self) {
        let _guard = lock(&self.commit_lock);
        for key in [TOKEN_KEY, ROLE_KEY, USER_NAME_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "could not remove persisted session slot");
            }
        }
        self.publish(Session::anonymous());
        self.set_status(AuthState::Anonymous);
        debug!("logged out");
    }

    /// Registration does not log the new user in.
    pub async fn register_patient(&self, form: &PatientRegistration) -> Result<RegistrationReceipt> {
        debug!(email = %form.email, "registering patient");
        self.api.post(endpoints::REGISTER_PATIENT, None, form).await
    }

    /// Registration does not log the new user in.
    pub async fn register_doctor(&self, form: &DoctorRegistration) -> Result<RegistrationReceipt> {
        debug!(email = %form.email, "registering doctor");
        self.api.post(endpoints::REGISTER_DOCTOR, None, form).await
    }

    async fn fetch_display_name(&self, path: &str, token: &str) -> Result<String> {
        let profile: Profile = self.api.get(path, Some(token)).await?;
        Ok(profile.full_name)
    }

    /// Only applies while the session still holds `credentials`, so a logout
    /// racing the profile lookup is not undone.
    fn attach_display_name(&self, credentials: &Credentials, name: String) -> Result<()> {
        let _guard = lock(&self.commit_lock);
        if self.state.borrow().credentials.as_ref() != Some(credentials) {
            return Ok(());
        }
        self.storage.set(USER_NAME_KEY, &name)?;
        self.publish(Session {
            credentials: Some(credentials.clone()),
            display_name: Some(name),
        });
        Ok(())
    }

    fn commit(&self, session: Session) -> Result<()> {
        let _guard = lock(&self.commit_lock);
        persist(self.storage.as_ref(), &session)?;
        self.publish(session);
        Ok(())
    }

    /// Replace the published session, notifying only on an actual change.
    fn publish(&self, next: Session) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn set_status(&self, status: AuthState) {
        *lock(&self.status) = status;
    }

    /// Return to the state implied by the published session.
    fn settle_status(&self) {
        let status = if self.state.borrow().is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };
        self.set_status(status);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A rejected login is an authentication failure whatever status the backend
/// chose; transport and decoding failures keep their own kind.
fn login_error(err: ClinicError) -> ClinicError {
    match err {
        ClinicError::Validation { status, message } | ClinicError::Api { status, message } => {
            ClinicError::Authentication {
                status: Some(status),
                message,
            }
        }
        ClinicError::Conflict { message } => ClinicError::Authentication {
            status: Some(409),
            message,
        },
        other => other,
    }
}

fn persist(storage: &dyn DurableStorage, session: &Session) -> Result<()> {
    match &session.credentials {
        Some(credentials) => {
            let previous_token = storage.get(TOKEN_KEY);
            storage.set(TOKEN_KEY, &credentials.token)?;
            if let Err(e) = storage.set(ROLE_KEY, credentials.role.as_str()) {
                // Token and role must stay paired on disk too
                let rollback = match previous_token {
                    Some(token) => storage.set(TOKEN_KEY, &token),
                    None => storage.remove(TOKEN_KEY),
                };
                if let Err(rollback_err) = rollback {
                    warn!(error = %rollback_err, "could not roll back persisted token");
                }
                return Err(e);
            }
        }
        None => {
            storage.remove(TOKEN_KEY)?;
            storage.remove(ROLE_KEY)?;
        }
    }
    match &session.display_name {
        Some(name) => storage.set(USER_NAME_KEY, name),
        None => storage.remove(USER_NAME_KEY),
    }
}

fn restore(storage: &dyn DurableStorage, policy: RestorePolicy) -> Session {
    let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
    let raw_role = storage.get(ROLE_KEY);
    let role = raw_role.as_deref().and_then(|r| r.parse::<Role>().ok());
    let user_name = storage.get(USER_NAME_KEY);

    let anything_stored = token.is_some() || raw_role.is_some() || user_name.is_some();

    match (policy, token, role) {
        (RestorePolicy::Trust, Some(token), Some(role)) => Session {
            credentials: Some(Credentials { token, role }),
            display_name: user_name,
        },
        (policy, _, _) => {
            if anything_stored {
                if policy == RestorePolicy::Trust {
                    warn!("discarding incomplete persisted session");
                } else {
                    debug!("discarding persisted session, login required");
                }
                for key in [TOKEN_KEY, ROLE_KEY, USER_NAME_KEY] {
                    if let Err(e) = storage.remove(key) {
                        warn!(key, error = %e, "could not remove persisted session slot");
                    }
                }
            }
            Session::anonymous()
        }
    }
}
