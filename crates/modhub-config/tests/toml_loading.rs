//! Integration tests for TOML and environment configuration loading.
//!
//! Uses `figment::Jail` for sandboxed cwd and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use modhub_config::HubConfig;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://mods.example.org/"
timeout_secs = 25
session_cookie = "auth-cookie=abc"

[search]
page_size = 50
scroll_threshold = 200

[cache]
dir = "/tmp/modhub-cache"
ephemeral = true
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(HubConfig::default()))
            .merge(Toml::file("config.toml"));
        let config = HubConfig::from_figment(&figment).expect("valid config");

        assert_eq!(config.api.base(), "https://mods.example.org");
        assert_eq!(config.api.timeout_secs, 25);
        assert!(config.api.has_session_cookie());
        assert_eq!(config.search.page_size, 50);
        assert_eq!(config.search.scroll_threshold, 200);
        assert_eq!(config.cache.dir, "/tmp/modhub-cache");
        assert!(config.cache.ephemeral);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_default_chain() {
    Jail::expect_with(|jail| {
        jail.create_dir(".modhub")?;
        jail.create_file(
            ".modhub/config.toml",
            r#"
[search]
page_size = 12
"#,
        )?;

        let config = HubConfig::load().expect("config loads");
        assert_eq!(config.search.page_size, 12);
        assert_eq!(config.api.timeout_secs, 10);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".modhub")?;
        jail.create_file(
            ".modhub/config.toml",
            r#"
[api]
base_url = "https://from-file.example.org"
"#,
        )?;
        jail.set_env("MODHUB_API__BASE_URL", "https://from-env.example.org");
        jail.set_env("MODHUB_SEARCH__PAGE_SIZE", "5");

        let config = HubConfig::load().expect("config loads");
        assert_eq!(config.api.base(), "https://from-env.example.org");
        assert_eq!(config.search.page_size, 5);
        Ok(())
    });
}

#[test]
fn out_of_range_page_size_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("MODHUB_SEARCH__PAGE_SIZE", "0");

        let figment = Figment::from(Serialized::defaults(HubConfig::default()))
            .merge(Env::prefixed("MODHUB_").split("__"));
        let error = HubConfig::from_figment(&figment).unwrap_err();
        assert!(error.to_string().contains("search.page_size"));
        Ok(())
    });
}

#[test]
fn malformed_value_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("MODHUB_API__TIMEOUT_SECS", "soon");

        let result = HubConfig::load();
        assert!(matches!(
            result,
            Err(modhub_config::ConfigError::Figment(_))
        ));
        Ok(())
    });
}
