use super::latency::{InFlight, Latency};
use crate::domain::identity::Identity;
use crate::domain::ports::{
    IdentityDirectory, IdentityDirectoryBox, KeyValueStore, KeyValueStoreBox,
};
use crate::error::{JamaError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Key under which the signed-in identity is persisted.
pub const SESSION_KEY: &str = "jama_user";

/// Shortest password accepted by the mock credential check.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Startup, before the persisted session has been read.
    Restoring,
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Snapshot of the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub identity: Option<Identity>,
    pub state: AuthState,
    pub error: Option<String>,
}

impl Session {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Restoring | AuthState::Authenticating)
    }

    pub fn is_logged_in(&self) -> bool {
        self.state == AuthState::Authenticated
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            identity: None,
            state: AuthState::Restoring,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Welcome, login and signup screens.
    Public,
    /// Everything behind authentication.
    Protected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Loading,
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

#[derive(Debug, Clone, Copy)]
enum Credentials {
    Login,
    Signup,
}

/// Owns the authenticated identity of the running instance.
///
/// Cloning yields another handle on the same session, so a presentation
/// task can watch `is_loading` while a login is suspended on its latency.
#[derive(Clone)]
pub struct SessionManager {
    directory: Arc<dyn IdentityDirectory>,
    storage: Arc<dyn KeyValueStore>,
    latency: Latency,
    in_flight: InFlight,
    state: Arc<RwLock<Session>>,
}

impl SessionManager {
    /// Creates a session manager in the `Restoring` state.
    ///
    /// Call [`SessionManager::restore`] once before making routing decisions.
    pub fn new(directory: IdentityDirectoryBox, storage: KeyValueStoreBox, latency: Latency) -> Self {
        Self {
            directory: Arc::from(directory),
            storage: Arc::from(storage),
            latency,
            in_flight: InFlight::default(),
            state: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// Loads the persisted identity, if any.
    ///
    /// A missing or unreadable payload leaves the session unauthenticated;
    /// parse and storage failures are logged and never surfaced.
    pub async fn restore(&self) -> Option<Identity> {
        let restored = match self.storage.get(SESSION_KEY).await {
            Ok(Some(payload)) => match serde_json::from_str::<Identity>(&payload) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    let err = JamaError::RestoreParseFailure(e);
                    warn!(error = %err, "Discarding stored session");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                None
            }
        };

        let mut session = self.state.write().await;
        match &restored {
            Some(identity) => {
                info!(member = %identity.national_service_id, "Session restored");
                session.identity = Some(identity.clone());
                session.state = AuthState::Authenticated;
            }
            None => {
                debug!("No stored session");
                session.identity = None;
                session.state = AuthState::Unauthenticated;
            }
        }
        restored
    }

    /// Signs in a catalog member.
    ///
    /// Unknown ids and passwords shorter than [`MIN_PASSWORD_LEN`] both fail
    /// with [`JamaError::InvalidCredentials`].
    pub async fn login(&self, national_service_id: &str, password: &str) -> Result<Identity> {
        self.authenticate(Credentials::Login, national_service_id, password)
            .await
    }

    /// Registers a password for a catalog member and signs them in.
    ///
    /// This runs the same catalog check as [`SessionManager::login`] and
    /// stores nothing new: the member must already exist. Failures are
    /// [`JamaError::UnknownServiceId`] and [`JamaError::WeakPassword`].
    pub async fn signup(&self, national_service_id: &str, password: &str) -> Result<Identity> {
        self.authenticate(Credentials::Signup, national_service_id, password)
            .await
    }

    /// First signup step: checks the id exists before asking for a password.
    pub async fn verify_service_id(&self, national_service_id: &str) -> Result<Identity> {
        let national_service_id = normalize_service_id(national_service_id);
        if national_service_id.is_empty() {
            return Err(JamaError::ServiceIdRequired);
        }
        self.directory
            .lookup(national_service_id)
            .await?
            .ok_or(JamaError::UnknownServiceId)
    }

    /// Clears the session and forgets the persisted identity.
    pub async fn logout(&self) {
        {
            let mut session = self.state.write().await;
            if let Some(identity) = session.identity.take() {
                info!(member = %identity.national_service_id, "Logged out");
            }
            session.state = AuthState::Unauthenticated;
            session.error = None;
        }
        if let Err(e) = self.storage.remove(SESSION_KEY).await {
            warn!(error = %e, "Failed to clear stored session");
        }
    }

    /// The current session. Reports `Authenticating` while a login or
    /// signup is suspended on its latency.
    pub async fn snapshot(&self) -> Session {
        let mut session = self.state.read().await.clone();
        if self.in_flight.is_active() && session.state != AuthState::Restoring {
            session.state = AuthState::Authenticating;
        }
        session
    }

    pub async fn is_loading(&self) -> bool {
        self.snapshot().await.is_loading()
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.state.read().await.identity.clone()
    }

    /// Decides whether a screen of the given kind may be shown.
    pub async fn guard(&self, route: RouteKind) -> Access {
        let session = self.snapshot().await;
        if session.is_loading() {
            return Access::Loading;
        }
        match (route, session.is_logged_in()) {
            (RouteKind::Protected, true) | (RouteKind::Public, false) => Access::Allow,
            (RouteKind::Protected, false) => Access::RedirectToLogin,
            (RouteKind::Public, true) => Access::RedirectToDashboard,
        }
    }

    async fn authenticate(
        &self,
        mode: Credentials,
        national_service_id: &str,
        password: &str,
    ) -> Result<Identity> {
        let _busy = self.in_flight.enter();
        self.state.write().await.error = None;

        self.latency.wait().await;

        match self.check(mode, national_service_id, password).await {
            Ok(identity) => {
                self.persist(&identity).await;
                let mut session = self.state.write().await;
                session.identity = Some(identity.clone());
                session.state = AuthState::Authenticated;
                info!(member = %identity.national_service_id, ?mode, "Signed in");
                Ok(identity)
            }
            Err(err) => {
                let mut session = self.state.write().await;
                session.error = Some(err.to_string());
                if session.state != AuthState::Authenticated {
                    session.state = AuthState::Unauthenticated;
                }
                info!(error = %err, ?mode, "Sign in rejected");
                Err(err)
            }
        }
    }

    async fn check(
        &self,
        mode: Credentials,
        national_service_id: &str,
        password: &str,
    ) -> Result<Identity> {
        let identity = self
            .directory
            .lookup(normalize_service_id(national_service_id))
            .await?;
        let weak = password_len(password) < MIN_PASSWORD_LEN;
        match (mode, identity) {
            (Credentials::Login, None) => Err(JamaError::InvalidCredentials),
            (Credentials::Login, Some(_)) if weak => Err(JamaError::InvalidCredentials),
            (Credentials::Signup, None) => Err(JamaError::UnknownServiceId),
            (Credentials::Signup, Some(_)) if weak => Err(JamaError::WeakPassword),
            (_, Some(identity)) => Ok(identity),
        }
    }

    async fn persist(&self, identity: &Identity) {
        let payload = match serde_json::to_string(identity) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize session");
                return;
            }
        };
        if let Err(e) = self.storage.set(SESSION_KEY, payload).await {
            warn!(error = %e, "Failed to persist session");
        }
    }
}

fn normalize_service_id(national_service_id: &str) -> &str {
    national_service_id.trim()
}

/// Password length in UTF-16 code units, the unit the web client measured.
fn password_len(password: &str) -> usize {
    password.encode_utf16().count()
}

/// Second signup step, run locally before [`SessionManager::signup`].
pub fn check_new_password(password: &str, confirm: &str) -> Result<()> {
    if password != confirm {
        return Err(JamaError::PasswordMismatch);
    }
    if password_len(password) < MIN_PASSWORD_LEN {
        return Err(JamaError::WeakPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::IdentityId;
    use crate::infrastructure::catalog::Catalog;
    use crate::infrastructure::in_memory::InMemoryKeyValueStore;

    fn manager(storage: InMemoryKeyValueStore, latency: Latency) -> SessionManager {
        let catalog = Catalog::demo().unwrap();
        SessionManager::new(Box::new(catalog.directory()), Box::new(storage), latency)
    }

    #[tokio::test]
    async fn test_login_success_persists_identity() {
        let storage = InMemoryKeyValueStore::new();
        let session = manager(storage.clone(), Latency::none());
        session.restore().await;

        let identity = session.login("NS12345", "password123").await.unwrap();
        assert_eq!(identity.id, IdentityId::new("1"));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.state, AuthState::Authenticated);
        assert_eq!(snapshot.error, None);
        assert!(storage.get(SESSION_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_rejections_store_message() {
        let session = manager(InMemoryKeyValueStore::new(), Latency::none());
        session.restore().await;

        let short = session.login("NS12345", "12345").await;
        assert!(matches!(short, Err(JamaError::InvalidCredentials)));

        let unknown = session.login("NS00000", "password123").await;
        assert!(matches!(unknown, Err(JamaError::InvalidCredentials)));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.state, AuthState::Unauthenticated);
        assert_eq!(
            snapshot.error.as_deref(),
            Some("Invalid National Service ID or password")
        );
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let session = manager(InMemoryKeyValueStore::new(), Latency::none());
        session.restore().await;
        session.login("NS67890", "secret99").await.unwrap();

        assert!(session.login("NS12345", "abc").await.is_err());

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.state, AuthState::Authenticated);
        assert_eq!(snapshot.identity.unwrap().national_service_id, "NS67890");
    }

    #[tokio::test]
    async fn test_signup_errors() {
        let session = manager(InMemoryKeyValueStore::new(), Latency::none());
        session.restore().await;

        assert!(matches!(
            session.signup("NS99999", "password123").await,
            Err(JamaError::UnknownServiceId)
        ));
        assert!(matches!(
            session.signup("NS12345", "short").await,
            Err(JamaError::WeakPassword)
        ));
        assert_eq!(
            session.snapshot().await.error.as_deref(),
            Some("Password should be at least 6 characters")
        );
        assert!(session.signup("NS12345", "longenough").await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_service_id() {
        let session = manager(InMemoryKeyValueStore::new(), Latency::none());
        assert!(matches!(
            session.verify_service_id("  ").await,
            Err(JamaError::ServiceIdRequired)
        ));
        assert!(matches!(
            session.verify_service_id("NS1").await,
            Err(JamaError::UnknownServiceId)
        ));
        assert!(session.verify_service_id("NS67890").await.is_ok());
    }

    #[test]
    fn test_check_new_password() {
        assert!(matches!(
            check_new_password("password1", "password2"),
            Err(JamaError::PasswordMismatch)
        ));
        assert!(matches!(
            check_new_password("abc", "abc"),
            Err(JamaError::WeakPassword)
        ));
        assert!(check_new_password("abcdef", "abcdef").is_ok());
    }

    #[tokio::test]
    async fn test_restore_round_trip() {
        let storage = InMemoryKeyValueStore::new();
        let first = manager(storage.clone(), Latency::none());
        first.restore().await;
        let identity = first.login("NS12345", "password123").await.unwrap();

        let second = manager(storage, Latency::none());
        assert_eq!(second.restore().await, Some(identity.clone()));
        assert_eq!(second.identity().await, Some(identity));
        assert_eq!(second.guard(RouteKind::Protected).await, Access::Allow);
    }

    #[tokio::test]
    async fn test_restore_with_corrupt_payload() {
        let storage = InMemoryKeyValueStore::new();
        storage.set(SESSION_KEY, "{not json".to_string()).await.unwrap();

        let session = manager(storage, Latency::none());
        assert_eq!(session.restore().await, None);
        assert_eq!(session.snapshot().await.state, AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_storage() {
        let storage = InMemoryKeyValueStore::new();
        let session = manager(storage.clone(), Latency::none());
        session.restore().await;
        session.login("NS12345", "password123").await.unwrap();

        session.logout().await;

        assert_eq!(session.identity().await, None);
        assert!(storage.get(SESSION_KEY).await.unwrap().is_none());
        assert_eq!(
            session.guard(RouteKind::Protected).await,
            Access::RedirectToLogin
        );
    }

    #[tokio::test]
    async fn test_guard_loading_until_restored() {
        let session = manager(InMemoryKeyValueStore::new(), Latency::none());
        assert_eq!(session.guard(RouteKind::Protected).await, Access::Loading);
        assert_eq!(session.guard(RouteKind::Public).await, Access::Loading);

        session.restore().await;
        assert_eq!(session.guard(RouteKind::Public).await, Access::Allow);

        session.login("NS12345", "password123").await.unwrap();
        assert_eq!(
            session.guard(RouteKind::Public).await,
            Access::RedirectToDashboard
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_loading_observable_during_login() {
        let session = manager(InMemoryKeyValueStore::new(), Latency::from_millis(1000));
        session.restore().await;

        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.login("NS12345", "password123").await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        assert!(session.is_loading().await);
        assert_eq!(session.guard(RouteKind::Public).await, Access::Loading);

        handle.await.unwrap().unwrap();
        assert!(!session.is_loading().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_login_does_not_stick_in_loading() {
        let session = manager(InMemoryKeyValueStore::new(), Latency::from_millis(1000));
        session.restore().await;

        let attempt = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            session.login("NS12345", "password123"),
        )
        .await;
        assert!(attempt.is_err());

        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        assert!(!session.is_loading().await);
        assert_eq!(session.snapshot().await.state, AuthState::Unauthenticated);
        assert_eq!(session.guard(RouteKind::Public).await, Access::Allow);
    }

    #[tokio::test]
    async fn test_service_id_is_trimmed_for_every_step() {
        let session = manager(InMemoryKeyValueStore::new(), Latency::none());
        session.restore().await;

        let verified = session.verify_service_id(" NS12345 ").await.unwrap();
        let signed_up = session.signup(" NS12345 ", "password123").await.unwrap();
        assert_eq!(verified, signed_up);

        session.logout().await;
        assert!(session.login("\tNS67890", "password123").await.is_ok());
    }

    #[tokio::test]
    async fn test_password_length_counts_utf16_units() {
        let session = manager(InMemoryKeyValueStore::new(), Latency::none());
        session.restore().await;

        // Three astral characters are six UTF-16 units.
        assert!(session.login("NS12345", "😀😀😀").await.is_ok());
        assert!(check_new_password("😀😀😀", "😀😀😀").is_ok());
        assert!(matches!(
            check_new_password("😀😀", "😀😀"),
            Err(JamaError::WeakPassword)
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const MEMBERS: [&str; 2] = ["NS12345", "NS67890"];

        fn attempt_login(national_service_id: &str, password: &str) -> Result<Identity> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let session = manager(InMemoryKeyValueStore::new(), Latency::none());
                session.restore().await;
                session.login(national_service_id, password).await
            })
        }

        proptest! {
            #[test]
            fn test_login_accepts_any_long_password(
                member in 0..MEMBERS.len(),
                password in "\\PC{6,24}",
            ) {
                let identity = attempt_login(MEMBERS[member], &password);
                prop_assert!(identity.is_ok());
                prop_assert_eq!(identity.unwrap().national_service_id, MEMBERS[member]);
            }

            #[test]
            fn test_login_rejects_any_short_password(
                member in 0..MEMBERS.len(),
                password in "[a-zA-Z0-9 ]{0,5}",
            ) {
                prop_assert!(matches!(
                    attempt_login(MEMBERS[member], &password),
                    Err(JamaError::InvalidCredentials)
                ));
            }

            #[test]
            fn test_login_rejects_unknown_members(
                national_service_id in "NS[0-9]{6}",
                password in "[a-z]{6,12}",
            ) {
                prop_assert!(matches!(
                    attempt_login(&national_service_id, &password),
                    Err(JamaError::InvalidCredentials)
                ));
            }
        }
    }
}
