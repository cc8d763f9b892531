//! # modhub-session
//!
//! Session and identity management for the modhub client.
//!
//! Resolves who the user is (cached identity or the site's "who am I"
//! endpoint), lazily obtains personal and team bearer credentials, and
//! switches the identity outgoing requests act as. State survives restarts
//! through a per-key [`KeyValueStore`], with bearer tokens kept in the OS
//! keychain by [`KeyringStore`]; observers are told about every
//! settled change.

pub mod error;
pub mod http;
pub mod keyring_store;
pub mod manager;
pub mod observer;
pub mod selector;
pub mod service;
pub mod store;

pub use error::SessionError;
pub use http::HttpIdentityService;
pub use keyring_store::{KeyringStore, OsKeyring, SecretBackend};
pub use manager::{SessionManager, TeamTokenRequest};
pub use observer::{Resolution, SessionObserver, SessionPhase, SessionSnapshot};
pub use selector::{ActiveIdentity, NO_TEAM};
pub use service::IdentityService;
pub use store::{CacheKey, FileStore, KeyValueStore, MemoryStore, StoreError};
