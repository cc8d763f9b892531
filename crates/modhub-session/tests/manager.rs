//! Session manager behaviour against a scripted identity service and an
//! in-memory cache.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use modhub_core::{ApiError, Credential, Identity, RoleMask, TeamMembership, TeamRoleMask};
use modhub_session::{
    ActiveIdentity, CacheKey, FileStore, IdentityService, KeyValueStore, KeyringStore,
    MemoryStore, SecretBackend, SessionError, SessionManager, SessionPhase, SessionSnapshot,
    StoreError,
};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Scripted service
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Script {
    who_am_i: Mutex<VecDeque<Result<Identity, ApiError>>>,
    personal: Mutex<VecDeque<Result<Option<String>, ApiError>>>,
    team: Mutex<VecDeque<Result<String, ApiError>>>,
    login_url: Mutex<VecDeque<Result<String, ApiError>>>,
    teams: Mutex<VecDeque<Result<Vec<TeamMembership>, ApiError>>>,
    calls: Mutex<Vec<String>>,
}

#[derive(Clone, Default)]
struct ScriptedService(Arc<Script>);

impl ScriptedService {
    fn on_who_am_i(&self, result: Result<Identity, ApiError>) -> &Self {
        self.0.who_am_i.lock().unwrap().push_back(result);
        self
    }

    fn on_personal(&self, result: Result<Option<String>, ApiError>) -> &Self {
        self.0.personal.lock().unwrap().push_back(result);
        self
    }

    fn on_team(&self, result: Result<String, ApiError>) -> &Self {
        self.0.team.lock().unwrap().push_back(result);
        self
    }

    fn on_login_url(&self, result: Result<String, ApiError>) -> &Self {
        self.0.login_url.lock().unwrap().push_back(result);
        self
    }

    fn on_teams(&self, result: Result<Vec<TeamMembership>, ApiError>) -> &Self {
        self.0.teams.lock().unwrap().push_back(result);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.0.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.0.calls.lock().unwrap().push(call);
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>, what: &str) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("unscripted call to {what}"))
}

impl IdentityService for ScriptedService {
    async fn who_am_i(&self) -> Result<Identity, ApiError> {
        self.record("who_am_i".into());
        next(&self.0.who_am_i, "who_am_i")
    }

    async fn issue_personal_token(&self) -> Result<Option<String>, ApiError> {
        self.record("personal".into());
        next(&self.0.personal, "issue_personal_token")
    }

    async fn issue_team_token(
        &self,
        team_id: &str,
        personal: Option<&Credential>,
    ) -> Result<String, ApiError> {
        self.record(format!(
            "team:{team_id}:{}",
            personal.map_or("-", Credential::token)
        ));
        next(&self.0.team, "issue_team_token")
    }

    async fn login_redirect_url(&self) -> Result<String, ApiError> {
        self.record("login_url".into());
        next(&self.0.login_url, "login_redirect_url")
    }

    async fn list_teams(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<TeamMembership>, ApiError> {
        self.record(format!("teams:{}", credential.map_or("-", Credential::token)));
        next(&self.0.teams, "list_teams")
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn team(id: &str, roles: TeamRoleMask) -> TeamMembership {
    TeamMembership {
        team_id: id.into(),
        team_name: format!("Team {id}"),
        roles,
    }
}

fn identity_with(teams: Vec<TeamMembership>) -> Identity {
    Identity {
        user_id: "4242".into(),
        display_name: "bridge-builder".into(),
        roles: RoleMask::VERIFIER,
        banned: false,
        teams,
    }
}

fn identity() -> Identity {
    identity_with(vec![
        team("team-7", TeamRoleMask::ADMIN),
        team("team-9", TeamRoleMask::OWNER),
    ])
}

fn network_down() -> ApiError {
    ApiError::Network("connection refused".into())
}

fn cached_store(identity: &Identity) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set_json(CacheKey::Identity, identity).unwrap();
    store.set(CacheKey::LoggedIn, "true").unwrap();
    store
}

fn record_snapshots<K: KeyValueStore>(
    manager: &mut SessionManager<ScriptedService, K>,
) -> Arc<Mutex<Vec<SessionSnapshot>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    manager.subscribe(move |snapshot: &SessionSnapshot| {
        sink.lock().unwrap().push(snapshot.clone());
    });
    seen
}

async fn authenticated(
    service: &ScriptedService,
) -> SessionManager<ScriptedService, MemoryStore> {
    service.on_personal(Ok(Some("personal-tok".into())));
    let mut manager = SessionManager::new(service.clone(), cached_store(&identity()));
    assert_eq!(manager.initialize(false).await, SessionPhase::Authenticated);
    manager
}

// ---------------------------------------------------------------------------
// initialize
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cached_identity_is_adopted_without_who_am_i() {
    let service = ScriptedService::default();
    service.on_personal(Ok(Some("personal-tok".into())));
    let mut manager = SessionManager::new(service.clone(), cached_store(&identity()));

    let phase = manager.initialize(false).await;

    assert_eq!(phase, SessionPhase::Authenticated);
    assert_eq!(manager.identity(), Some(&identity()));
    assert_eq!(service.calls(), vec!["personal"]);
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::personal("personal-tok"))
    );
    assert_eq!(
        manager.store().get(CacheKey::PersonalToken).unwrap().as_deref(),
        Some("personal-tok")
    );
}

#[tokio::test]
async fn cached_personal_token_skips_warm_up() {
    let service = ScriptedService::default();
    let mut store = cached_store(&identity());
    store.set(CacheKey::PersonalToken, "cached-tok").unwrap();
    let mut manager = SessionManager::new(service.clone(), store);

    manager.initialize(false).await;

    assert!(service.calls().is_empty());
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::personal("cached-tok"))
    );
}

#[tokio::test]
async fn forced_refresh_calls_who_am_i_and_replaces_identity() {
    let service = ScriptedService::default();
    let refreshed = identity_with(vec![team("team-9", TeamRoleMask::OWNER)]);
    service.on_who_am_i(Ok(refreshed.clone()));
    let mut store = cached_store(&identity());
    store.set(CacheKey::PersonalToken, "cached-tok").unwrap();
    let mut manager = SessionManager::new(service.clone(), store);

    let phase = manager.initialize(true).await;

    assert_eq!(phase, SessionPhase::Authenticated);
    assert_eq!(service.calls(), vec!["who_am_i"]);
    assert_eq!(manager.identity(), Some(&refreshed));
    let cached: Identity = manager
        .store()
        .get_json(CacheKey::Identity)
        .unwrap()
        .expect("identity cached");
    assert_eq!(cached, refreshed);
}

#[tokio::test]
async fn empty_cache_resolves_and_persists() {
    let service = ScriptedService::default();
    service
        .on_who_am_i(Ok(identity()))
        .on_personal(Ok(Some("fresh-tok".into())));
    let mut manager = SessionManager::new(service.clone(), MemoryStore::new());
    let seen = record_snapshots(&mut manager);

    assert_eq!(manager.phase(), SessionPhase::Anonymous);
    let phase = manager.initialize(false).await;

    assert_eq!(phase, SessionPhase::Authenticated);
    assert_eq!(service.calls(), vec!["who_am_i", "personal"]);
    let store = manager.store();
    assert_eq!(store.get(CacheKey::LoggedIn).unwrap().as_deref(), Some("true"));
    assert!(store.get(CacheKey::Identity).unwrap().is_some());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3, "resolving, adopt and warm-up each notify");
    assert_eq!(seen[0].phase, SessionPhase::Resolving);
    assert_eq!(seen[1].phase, SessionPhase::Authenticated);
    assert!(!seen[1].has_credential);
    assert!(seen[2].has_credential);
}

#[tokio::test]
async fn rejected_session_requires_login_and_clears_credentials() {
    let service = ScriptedService::default();
    service
        .on_who_am_i(Err(ApiError::Unauthenticated))
        .on_login_url(Ok("https://discord.example/oauth2".into()));
    let mut store = cached_store(&identity());
    store.set(CacheKey::PersonalToken, "old-tok").unwrap();
    store.set(CacheKey::AsTeam, "true").unwrap();
    store.set(CacheKey::ActiveTeamId, "team-7").unwrap();
    store
        .set_json(CacheKey::TeamToken, &Credential::team("team-7", "team-tok"))
        .unwrap();
    let mut manager = SessionManager::new(service.clone(), store);
    let seen = record_snapshots(&mut manager);

    let phase = manager.initialize(true).await;

    assert_eq!(phase, SessionPhase::LoginRequired);
    assert_eq!(manager.active_credential(), None);
    assert_eq!(manager.selector(), &ActiveIdentity::Personal);
    assert_eq!(
        manager.login_redirect_url(),
        Some("https://discord.example/oauth2")
    );

    let store = manager.store();
    assert_eq!(store.get(CacheKey::LoggedIn).unwrap().as_deref(), Some("false"));
    assert_eq!(store.get(CacheKey::Identity).unwrap(), None);
    assert_eq!(store.get(CacheKey::PersonalToken).unwrap(), None);
    assert_eq!(store.get(CacheKey::TeamToken).unwrap(), None);
    assert_eq!(store.get(CacheKey::ActiveTeamId).unwrap(), None);
    assert_eq!(
        store.get(CacheKey::LoginRedirectUrl).unwrap().as_deref(),
        Some("https://discord.example/oauth2")
    );
    let phases: Vec<SessionPhase> = seen.lock().unwrap().iter().map(|s| s.phase).collect();
    assert_eq!(phases, vec![SessionPhase::Resolving, SessionPhase::LoginRequired]);
}

#[tokio::test]
async fn login_url_failure_still_requires_login() {
    let service = ScriptedService::default();
    service
        .on_who_am_i(Err(ApiError::Status {
            status: 500,
            message: "boom".into(),
        }))
        .on_login_url(Err(network_down()));
    let mut manager = SessionManager::new(service, MemoryStore::new());

    assert_eq!(manager.initialize(false).await, SessionPhase::LoginRequired);
    assert_eq!(manager.login_redirect_url(), None);
}

#[tokio::test]
async fn network_failure_leaves_session_unresolved() {
    let service = ScriptedService::default();
    service.on_who_am_i(Err(network_down()));
    let mut store = MemoryStore::new();
    store.set(CacheKey::PersonalToken, "kept-tok").unwrap();
    let mut manager = SessionManager::new(service.clone(), store);
    let seen = record_snapshots(&mut manager);

    let phase = manager.initialize(false).await;

    assert_eq!(phase, SessionPhase::Anonymous);
    assert_eq!(service.calls(), vec!["who_am_i"]);
    assert_eq!(
        manager.store().get(CacheKey::PersonalToken).unwrap().as_deref(),
        Some("kept-tok")
    );
    assert_eq!(manager.store().get(CacheKey::LoggedIn).unwrap(), None);
    let phases: Vec<SessionPhase> = seen.lock().unwrap().iter().map(|s| s.phase).collect();
    assert_eq!(phases, vec![SessionPhase::Resolving, SessionPhase::Anonymous]);

    // Re-enterable once the site is back.
    service.on_who_am_i(Ok(identity()));
    assert_eq!(manager.initialize(false).await, SessionPhase::Authenticated);
}

#[tokio::test]
async fn cached_adoption_skips_resolving_notification() {
    let service = ScriptedService::default();
    let mut store = cached_store(&identity());
    store.set(CacheKey::PersonalToken, "cached-tok").unwrap();
    let mut manager = SessionManager::new(service, store);
    let seen = record_snapshots(&mut manager);

    manager.initialize(false).await;

    let phases: Vec<SessionPhase> = seen.lock().unwrap().iter().map(|s| s.phase).collect();
    assert_eq!(phases, vec![SessionPhase::Authenticated]);
}

#[tokio::test]
async fn network_failure_on_forced_refresh_keeps_identity() {
    let service = ScriptedService::default();
    let mut manager = authenticated(&service).await;
    service.on_who_am_i(Err(network_down()));

    assert_eq!(manager.initialize(true).await, SessionPhase::Authenticated);
    assert_eq!(manager.identity(), Some(&identity()));
}

#[tokio::test]
async fn warm_up_failure_is_not_fatal() {
    let service = ScriptedService::default();
    service.on_personal(Err(ApiError::Forbidden));
    let mut manager = SessionManager::new(service.clone(), cached_store(&identity()));

    assert_eq!(manager.initialize(false).await, SessionPhase::Authenticated);
    assert_eq!(manager.active_credential(), None);
    assert_eq!(manager.store().get(CacheKey::PersonalToken).unwrap(), None);
}

#[tokio::test]
async fn null_personal_token_leaves_credential_absent() {
    let service = ScriptedService::default();
    service.on_personal(Ok(None));
    let mut manager = SessionManager::new(service, cached_store(&identity()));

    manager.initialize(false).await;
    assert_eq!(manager.active_credential(), None);
}

// ---------------------------------------------------------------------------
// identity switching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn credential_stays_personal_until_team_token_arrives() {
    let service = ScriptedService::default();
    let mut manager = authenticated(&service).await;

    let request = manager
        .select_identity(Some("team-7"))
        .expect("member")
        .expect("token needed");
    assert_eq!(request.team_id(), "team-7");
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::personal("personal-tok"))
    );

    assert!(manager.apply_team_token(&request, Ok("team-tok".into())));
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::team("team-7", "team-tok"))
    );
    assert_eq!(
        manager.store().get(CacheKey::AsTeam).unwrap().as_deref(),
        Some("true")
    );
    assert_eq!(
        manager.store().get(CacheKey::ActiveTeamId).unwrap().as_deref(),
        Some("team-7")
    );
}

#[tokio::test]
async fn switching_teams_never_returns_previous_team_credential() {
    let service = ScriptedService::default();
    service.on_team(Ok("tok-7".into()));
    let mut manager = authenticated(&service).await;
    manager.switch_identity(Some("team-7")).await.expect("switch");
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::team("team-7", "tok-7"))
    );

    let _pending = manager
        .select_identity(Some("team-9"))
        .expect("member")
        .expect("token needed");

    assert_eq!(
        manager.active_credential(),
        Some(&Credential::personal("personal-tok"))
    );
    assert_eq!(manager.store().get(CacheKey::TeamToken).unwrap(), None);
}

#[tokio::test]
async fn stale_team_token_is_ignored() {
    let service = ScriptedService::default();
    let mut manager = authenticated(&service).await;

    let first = manager.select_identity(Some("team-7")).unwrap().unwrap();
    let second = manager.select_identity(Some("team-9")).unwrap().unwrap();

    assert!(!manager.apply_team_token(&first, Ok("tok-7".into())));
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::personal("personal-tok"))
    );

    assert!(manager.apply_team_token(&second, Ok("tok-9".into())));
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::team("team-9", "tok-9"))
    );
}

#[tokio::test]
async fn token_for_reselected_team_from_older_switch_is_ignored() {
    let service = ScriptedService::default();
    let mut manager = authenticated(&service).await;

    let first = manager.select_identity(Some("team-7")).unwrap().unwrap();
    manager.select_identity(None).unwrap();
    let _second = manager.select_identity(Some("team-7")).unwrap().unwrap();

    assert!(!manager.apply_team_token(&first, Ok("old".into())));
}

#[tokio::test]
async fn failed_team_token_keeps_team_selected_without_credential() {
    let service = ScriptedService::default();
    service.on_team(Err(ApiError::BadRequest("not a member".into())));
    let mut manager = authenticated(&service).await;

    manager.switch_identity(Some("team-7")).await.expect("switch");

    assert_eq!(manager.selector().team_id(), Some("team-7"));
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::personal("personal-tok"))
    );
    assert!(service.calls().contains(&"team:team-7:personal-tok".to_string()));
}

#[tokio::test]
async fn cached_team_credential_is_reused() {
    let service = ScriptedService::default();
    service.on_team(Ok("tok-7".into()));
    let mut manager = authenticated(&service).await;
    manager.switch_identity(Some("team-7")).await.unwrap();

    let request = manager.select_identity(Some("team-7")).unwrap();
    assert_eq!(request, None);
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::team("team-7", "tok-7"))
    );
}

#[tokio::test]
async fn switching_to_none_discards_team_credential() {
    let service = ScriptedService::default();
    service.on_team(Ok("tok-7".into()));
    let mut manager = authenticated(&service).await;
    manager.switch_identity(Some("team-7")).await.unwrap();

    manager.switch_identity(Some("none")).await.unwrap();

    assert_eq!(manager.selector(), &ActiveIdentity::Personal);
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::personal("personal-tok"))
    );
    let store = manager.store();
    assert_eq!(store.get(CacheKey::TeamToken).unwrap(), None);
    assert_eq!(store.get(CacheKey::AsTeam).unwrap().as_deref(), Some("false"));
    assert_eq!(store.get(CacheKey::ActiveTeamId).unwrap(), None);
}

#[tokio::test]
async fn selecting_team_requires_authentication_and_membership() {
    let service = ScriptedService::default();
    let mut anonymous = SessionManager::new(service.clone(), MemoryStore::new());
    assert!(matches!(
        anonymous.select_identity(Some("team-7")),
        Err(SessionError::NotAuthenticated)
    ));

    let mut manager = authenticated(&service).await;
    let err = manager.select_identity(Some("team-404")).unwrap_err();
    assert!(matches!(err, SessionError::UnknownTeam(ref id) if id == "team-404"));
    assert_eq!(manager.selector(), &ActiveIdentity::Personal);
}

#[tokio::test]
async fn refresh_without_selected_team_falls_back_to_personal() {
    let service = ScriptedService::default();
    service.on_team(Ok("tok-7".into()));
    let mut manager = authenticated(&service).await;
    manager.switch_identity(Some("team-7")).await.unwrap();

    service.on_who_am_i(Ok(identity_with(vec![team("team-9", TeamRoleMask::MOD)])));
    manager.initialize(true).await;

    assert_eq!(manager.selector(), &ActiveIdentity::Personal);
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::personal("personal-tok"))
    );
    assert_eq!(manager.store().get(CacheKey::TeamToken).unwrap(), None);
}

#[tokio::test]
async fn selector_and_team_credential_survive_restart() {
    let service = ScriptedService::default();
    service.on_team(Ok("tok-7".into()));
    let mut manager = authenticated(&service).await;
    manager.switch_identity(Some("team-7")).await.unwrap();
    let store = manager.store().clone();

    let mut restarted = SessionManager::new(service.clone(), store);
    assert_eq!(restarted.selector().team_id(), Some("team-7"));
    restarted.initialize(false).await;
    assert_eq!(
        restarted.active_credential(),
        Some(&Credential::team("team-7", "tok-7"))
    );
}

// ---------------------------------------------------------------------------
// logout, teams, observers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_clears_every_cache_key() {
    let service = ScriptedService::default();
    service.on_team(Ok("tok-7".into()));
    let mut manager = authenticated(&service).await;
    manager.switch_identity(Some("team-7")).await.unwrap();
    let seen = record_snapshots(&mut manager);

    manager.logout();

    assert_eq!(manager.phase(), SessionPhase::Anonymous);
    assert_eq!(manager.identity(), None);
    assert_eq!(manager.active_credential(), None);
    assert_eq!(manager.selector(), &ActiveIdentity::Personal);
    assert_eq!(manager.store().keys(), vec![CacheKey::LoggedIn]);
    assert_eq!(
        manager.store().get(CacheKey::LoggedIn).unwrap().as_deref(),
        Some("false")
    );
    let seen = seen.lock().unwrap();
    assert_eq!(seen.last().map(|s| s.phase), Some(SessionPhase::Anonymous));
}

#[tokio::test]
async fn fetch_teams_uses_personal_credential() {
    let service = ScriptedService::default();
    let mut manager = authenticated(&service).await;
    service.on_teams(Ok(vec![team("team-7", TeamRoleMask::ADMIN)]));
    service.on_team(Ok("tok-7".into()));
    manager.switch_identity(Some("team-7")).await.unwrap();

    let teams = manager.fetch_teams().await.expect("teams");

    assert_eq!(teams, vec![team("team-7", TeamRoleMask::ADMIN)]);
    assert_eq!(service.calls().last().unwrap(), "teams:personal-tok");
}

#[tokio::test]
async fn fetch_teams_surfaces_api_errors() {
    let service = ScriptedService::default();
    service.on_teams(Err(ApiError::Unauthenticated));
    let manager = SessionManager::new(service, MemoryStore::new());

    let err = manager.fetch_teams().await.unwrap_err();
    assert!(matches!(err, SessionError::Api(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn observers_see_each_switch() {
    let service = ScriptedService::default();
    service.on_team(Ok("tok-9".into()));
    let mut manager = authenticated(&service).await;
    let seen = record_snapshots(&mut manager);

    manager.switch_identity(Some("team-9")).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2, "selection then credential arrival");
    assert_eq!(seen[0].acting_as.team_id(), Some("team-9"));
    assert!(seen[0].has_credential, "personal fallback still present");
    assert_eq!(seen[1].acting_as.team_id(), Some("team-9"));
}

// ---------------------------------------------------------------------------
// keychain-backed cache
// ---------------------------------------------------------------------------

/// Keychain shared between store instances, like the OS one across restarts.
#[derive(Clone, Default)]
struct SharedKeychain(Arc<Mutex<BTreeMap<CacheKey, String>>>);

impl SecretBackend for SharedKeychain {
    fn read(&self, key: CacheKey) -> keyring::Result<String> {
        self.0.lock().unwrap().get(&key).cloned().ok_or(keyring::Error::NoEntry)
    }

    fn write(&mut self, key: CacheKey, value: &str) -> keyring::Result<()> {
        self.0.lock().unwrap().insert(key, value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: CacheKey) -> keyring::Result<()> {
        self.0.lock().unwrap().remove(&key).map(drop).ok_or(keyring::Error::NoEntry)
    }
}

#[tokio::test]
async fn tokens_are_kept_in_keychain_across_restarts() {
    let tmp = tempfile::TempDir::new().expect("tmp dir");
    let keychain = SharedKeychain::default();
    let open = || {
        KeyringStore::new(
            keychain.clone(),
            FileStore::open(tmp.path().join("session")).expect("open"),
        )
    };

    let service = ScriptedService::default();
    service
        .on_who_am_i(Ok(identity()))
        .on_personal(Ok(Some("personal-tok".into())))
        .on_team(Ok("tok-7".into()));
    let mut manager = SessionManager::new(service.clone(), open());
    manager.initialize(false).await;
    manager.switch_identity(Some("team-7")).await.unwrap();

    assert!(!tmp.path().join("session/personalToken").exists());
    assert!(!tmp.path().join("session/teamToken").exists());
    assert!(tmp.path().join("session/identity").exists());
    assert_eq!(keychain.0.lock().unwrap().len(), 2);

    let restarted = SessionManager::new(service, open());
    assert_eq!(
        restarted.active_credential(),
        Some(&Credential::team("team-7", "tok-7"))
    );

    let mut manager = restarted;
    manager.logout();
    assert!(keychain.0.lock().unwrap().is_empty());
}

/// Reads fine, refuses every write.
struct ReadOnlyStore(MemoryStore);

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError> {
        self.0.get(key)
    }

    fn set(&mut self, _key: CacheKey, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".into()))
    }

    fn remove(&mut self, _key: CacheKey) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".into()))
    }
}

#[tokio::test]
async fn cache_write_failures_do_not_fail_session_operations() {
    let service = ScriptedService::default();
    service
        .on_who_am_i(Ok(identity()))
        .on_personal(Ok(Some("personal-tok".into())))
        .on_team(Ok("tok-7".into()));
    let mut manager = SessionManager::new(service, ReadOnlyStore(MemoryStore::new()));

    assert_eq!(manager.initialize(false).await, SessionPhase::Authenticated);
    manager.switch_identity(Some("team-7")).await.unwrap();
    assert_eq!(
        manager.active_credential(),
        Some(&Credential::team("team-7", "tok-7"))
    );

    manager.logout();
    assert_eq!(manager.phase(), SessionPhase::Anonymous);
    assert_eq!(manager.active_credential(), None);
}
