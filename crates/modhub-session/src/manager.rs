//! Session & identity manager.
//!
//! Owns the resolved identity, both cached credentials and the
//! active-identity selector. Every change is written through to the
//! [`KeyValueStore`] key by key and announced to subscribed observers.
//!
//! Switching to a team is split in two halves so callers can keep reading
//! [`SessionManager::active_credential`] while the team token is in flight:
//! [`SessionManager::select_identity`] updates the selector and hands back a
//! [`TeamTokenRequest`]; [`SessionManager::apply_team_token`] accepts the
//! answer only if no later switch happened in between.
//! [`SessionManager::switch_identity`] drives both halves in one call.

use modhub_core::{ApiError, Credential, CredentialScope, Identity, TeamMembership};

use crate::error::SessionError;
use crate::observer::{Resolution, SessionObserver, SessionPhase, SessionSnapshot};
use crate::selector::ActiveIdentity;
use crate::service::IdentityService;
use crate::store::{CacheKey, KeyValueStore};

/// Outstanding team token fetch issued by [`SessionManager::select_identity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamTokenRequest {
    epoch: u64,
    team_id: String,
    personal: Option<Credential>,
}

impl TeamTokenRequest {
    #[must_use]
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// Personal credential at the time of the switch, sent along with the
    /// token request.
    #[must_use]
    pub const fn personal(&self) -> Option<&Credential> {
        self.personal.as_ref()
    }
}

pub struct SessionManager<S, K> {
    service: S,
    store: K,
    resolution: Resolution,
    resolving: bool,
    personal: Option<Credential>,
    team: Option<Credential>,
    selector: ActiveIdentity,
    login_redirect_url: Option<String>,
    switch_epoch: u64,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<S: IdentityService, K: KeyValueStore> SessionManager<S, K> {
    /// Build a manager and hydrate credentials, the selector and the login
    /// URL from the cache. The cached identity is adopted by
    /// [`initialize`](Self::initialize), not here.
    pub fn new(service: S, store: K) -> Self {
        let personal = read_key(&store, CacheKey::PersonalToken)
            .filter(|token| !token.is_empty())
            .map(Credential::personal);
        let selector = ActiveIdentity::from_cache(
            read_key(&store, CacheKey::AsTeam).as_deref(),
            read_key(&store, CacheKey::ActiveTeamId).as_deref(),
        );
        let team = match store.get_json::<Credential>(CacheKey::TeamToken) {
            Ok(credential) => credential
                .filter(|c| matches!(c.scope(), CredentialScope::Team(_)))
                .filter(|c| c.team_id() == selector.team_id()),
            Err(error) => {
                tracing::warn!(%error, "discarding unreadable cached team token");
                None
            }
        };
        let login_redirect_url = read_key(&store, CacheKey::LoginRedirectUrl);

        tracing::debug!(
            personal = personal.is_some(),
            team = team.is_some(),
            acting_as = ?selector,
            "session hydrated from cache"
        );

        Self {
            service,
            store,
            resolution: Resolution::Unresolved,
            resolving: false,
            personal,
            team,
            selector,
            login_redirect_url,
            switch_epoch: 0,
            observers: Vec::new(),
        }
    }

    /// Register an observer. It is called after every settled transition.
    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        if self.resolving {
            return SessionPhase::Resolving;
        }
        match self.resolution {
            Resolution::Unresolved => SessionPhase::Anonymous,
            Resolution::Authenticated(_) => SessionPhase::Authenticated,
            Resolution::LoggedOut => SessionPhase::LoginRequired,
        }
    }

    #[must_use]
    pub const fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.resolution.identity()
    }

    #[must_use]
    pub const fn selector(&self) -> &ActiveIdentity {
        &self.selector
    }

    #[must_use]
    pub fn login_redirect_url(&self) -> Option<&str> {
        self.login_redirect_url.as_deref()
    }

    #[must_use]
    pub const fn store(&self) -> &K {
        &self.store
    }

    /// Credential outgoing requests should carry right now.
    ///
    /// The team credential when acting as a team and its token has arrived,
    /// otherwise the personal one. Never touches the network.
    #[must_use]
    pub fn active_credential(&self) -> Option<&Credential> {
        if let Some(team_id) = self.selector.team_id() {
            let team = self
                .team
                .as_ref()
                .filter(|credential| credential.team_id() == Some(team_id));
            if team.is_some() {
                return team;
            }
        }
        self.personal.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            identity: self.identity().cloned(),
            acting_as: self.selector.clone(),
            has_credential: self.active_credential().is_some(),
        }
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    /// Resolve the session owner.
    ///
    /// A cached identity is adopted without a network call unless
    /// `force_reload` is set. Never fails: a session with no owner ends in
    /// [`SessionPhase::LoginRequired`], an unreachable site leaves the
    /// resolution as it was.
    pub async fn initialize(&mut self, force_reload: bool) -> SessionPhase {
        let cached = if force_reload {
            None
        } else {
            self.cached_identity()
        };
        if let Some(identity) = cached {
            tracing::debug!(user_id = %identity.user_id, "adopting cached identity");
            self.adopt(identity);
            self.warm_up().await;
            return self.phase();
        }

        self.resolving = true;
        self.notify();
        let result = self.service.who_am_i().await;
        self.resolving = false;

        match result {
            Ok(identity) => {
                tracing::info!(user_id = %identity.user_id, "session resolved");
                self.persist_json(CacheKey::Identity, &identity);
                self.persist(CacheKey::LoggedIn, "true");
                self.adopt(identity);
                self.warm_up().await;
            }
            Err(error) if error.is_network() => {
                tracing::warn!(%error, "could not reach the site, session left unresolved");
                self.notify();
            }
            Err(error) => {
                tracing::info!(%error, "no active session, login required");
                self.require_login().await;
            }
        }
        self.phase()
    }

    fn cached_identity(&self) -> Option<Identity> {
        match self.store.get_json::<Identity>(CacheKey::Identity) {
            Ok(identity) => identity,
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable cached identity");
                None
            }
        }
    }

    fn adopt(&mut self, identity: Identity) {
        self.resolution = Resolution::Authenticated(identity);
        self.reconcile_selector();
        self.notify();
    }

    /// Drop the team selection if the identity no longer lists that team.
    fn reconcile_selector(&mut self) {
        let Some(team_id) = self.selector.team_id() else {
            return;
        };
        let still_member = self
            .identity()
            .is_some_and(|identity| identity.is_member_of(team_id));
        if !still_member {
            tracing::info!(team_id, "selected team missing from identity, acting as self");
            self.reset_selector();
        }
    }

    async fn require_login(&mut self) {
        self.resolution = Resolution::LoggedOut;
        self.persist(CacheKey::LoggedIn, "false");
        self.forget(CacheKey::Identity);
        self.forget(CacheKey::PersonalToken);
        self.personal = None;
        self.reset_selector();
        self.notify();

        match self.service.login_redirect_url().await {
            Ok(url) => {
                self.persist(CacheKey::LoginRedirectUrl, &url);
                self.login_redirect_url = Some(url);
            }
            Err(error) => tracing::warn!(%error, "failed to fetch login redirect URL"),
        }
    }

    /// Fetch a personal credential if the session is authenticated and none
    /// is cached. Failure leaves the credential absent.
    async fn warm_up(&mut self) {
        if self.personal.is_some() || self.identity().is_none() {
            return;
        }
        match self.service.issue_personal_token().await {
            Ok(Some(token)) => {
                self.persist(CacheKey::PersonalToken, &token);
                self.personal = Some(Credential::personal(token));
                tracing::debug!("personal credential cached");
                self.notify();
            }
            Ok(None) => tracing::debug!("site issued no personal token"),
            Err(error) => tracing::warn!(%error, "personal token warm-up failed"),
        }
    }

    // -----------------------------------------------------------------------
    // Identity switching
    // -----------------------------------------------------------------------

    /// Select the identity to act as. `None`, `""` and `"none"` mean self.
    ///
    /// Returns a [`TeamTokenRequest`] when a team token must be fetched;
    /// until it is applied, [`active_credential`](Self::active_credential)
    /// falls back to the personal credential.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] when selecting a team before the
    /// session is resolved, [`SessionError::UnknownTeam`] when the identity
    /// is not a member of it.
    pub fn select_identity(
        &mut self,
        team_id: Option<&str>,
    ) -> Result<Option<TeamTokenRequest>, SessionError> {
        let ActiveIdentity::Team { team_id } = ActiveIdentity::from_request(team_id) else {
            self.switch_epoch += 1;
            self.reset_selector();
            self.notify();
            return Ok(None);
        };

        let identity = self.identity().ok_or(SessionError::NotAuthenticated)?;
        if !identity.is_member_of(&team_id) {
            return Err(SessionError::UnknownTeam(team_id));
        }

        self.switch_epoch += 1;
        self.selector = ActiveIdentity::Team {
            team_id: team_id.clone(),
        };
        self.persist_selector();

        let cached = self
            .team
            .as_ref()
            .is_some_and(|credential| credential.team_id() == Some(team_id.as_str()));
        if cached {
            tracing::debug!(%team_id, "reusing cached team credential");
            self.notify();
            return Ok(None);
        }

        self.discard_team_credential();
        self.notify();
        Ok(Some(TeamTokenRequest {
            epoch: self.switch_epoch,
            team_id,
            personal: self.personal.clone(),
        }))
    }

    /// Apply the answer to a [`TeamTokenRequest`].
    ///
    /// Ignored when another switch happened since the request was issued.
    /// Returns `true` when a team credential was cached.
    pub fn apply_team_token(
        &mut self,
        request: &TeamTokenRequest,
        result: Result<String, ApiError>,
    ) -> bool {
        if request.epoch != self.switch_epoch
            || self.selector.team_id() != Some(request.team_id.as_str())
        {
            tracing::debug!(team_id = %request.team_id, "dropping stale team token");
            return false;
        }
        match result {
            Ok(token) => {
                let credential = Credential::team(request.team_id.clone(), token);
                self.persist_json(CacheKey::TeamToken, &credential);
                self.team = Some(credential);
                tracing::debug!(team_id = %request.team_id, "team credential cached");
                self.notify();
                true
            }
            Err(error) => {
                tracing::warn!(%error, team_id = %request.team_id, "team token request failed");
                false
            }
        }
    }

    /// Select an identity and fetch its team token if needed.
    ///
    /// A failed token fetch is not an error: the team stays selected and
    /// [`active_credential`](Self::active_credential) keeps returning the
    /// personal credential.
    ///
    /// # Errors
    ///
    /// Same as [`select_identity`](Self::select_identity).
    pub async fn switch_identity(&mut self, team_id: Option<&str>) -> Result<(), SessionError> {
        if let Some(request) = self.select_identity(team_id)? {
            let result = self
                .service
                .issue_team_token(request.team_id(), request.personal())
                .await;
            self.apply_team_token(&request, result);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Teams & logout
    // -----------------------------------------------------------------------

    /// List the owner's teams with the personal credential. The identity
    /// itself is not patched; use a forced refresh for that.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Api`] if the site rejects the call.
    pub async fn fetch_teams(&self) -> Result<Vec<TeamMembership>, SessionError> {
        Ok(self.service.list_teams(self.personal.as_ref()).await?)
    }

    /// Forget everything cached and return to an unresolved session.
    pub fn logout(&mut self) {
        for key in CacheKey::ALL {
            self.forget(key);
        }
        self.persist(CacheKey::LoggedIn, "false");

        self.resolution = Resolution::Unresolved;
        self.personal = None;
        self.team = None;
        self.selector = ActiveIdentity::Personal;
        self.login_redirect_url = None;
        self.switch_epoch += 1;
        tracing::info!("logged out, session cache cleared");
        self.notify();
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn reset_selector(&mut self) {
        self.selector = ActiveIdentity::Personal;
        self.discard_team_credential();
        self.persist_selector();
    }

    fn discard_team_credential(&mut self) {
        if self.team.take().is_some() {
            tracing::debug!("team credential discarded");
        }
        self.forget(CacheKey::TeamToken);
    }

    fn persist_selector(&mut self) {
        match self.selector.team_id().map(ToString::to_string) {
            Some(team_id) => {
                self.persist(CacheKey::AsTeam, "true");
                self.persist(CacheKey::ActiveTeamId, &team_id);
            }
            None => {
                self.persist(CacheKey::AsTeam, "false");
                self.forget(CacheKey::ActiveTeamId);
            }
        }
    }

    fn persist(&mut self, key: CacheKey, value: &str) {
        if let Err(error) = self.store.set(key, value) {
            tracing::warn!(%error, key = key.as_str(), "failed to persist session state");
        }
    }

    fn persist_json<T: serde::Serialize>(&mut self, key: CacheKey, value: &T) {
        if let Err(error) = self.store.set_json(key, value) {
            tracing::warn!(%error, key = key.as_str(), "failed to persist session state");
        }
    }

    fn forget(&mut self, key: CacheKey) {
        if let Err(error) = self.store.remove(key) {
            tracing::warn!(%error, key = key.as_str(), "failed to clear session state");
        }
    }

    fn notify(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer.session_changed(&snapshot);
        }
    }
}

fn read_key<K: KeyValueStore>(store: &K, key: CacheKey) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, key = key.as_str(), "failed to read session cache");
            None
        }
    }
}
