pub mod auth;
pub mod search;

pub use auth::AuthCommands;
pub use search::SearchArgs;
