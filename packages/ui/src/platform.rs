//! Platform backends for the identity store.
//!
//! - **Web** (WASM + `web` feature): `localStorage` via [`store::LocalStorageStore`],
//!   cookies via [`store::DocumentCookies`]
//! - **Native**: filesystem via [`store::FileStore`] under `<data_dir>/tourbook/`,
//!   cookies held in memory ([`store::MemoryCookies`])

use api::{AppConfig, IdentityStore, SessionConfig};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStorageStore;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformCookies = store::DocumentCookies;

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformStore = store::FileStore;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformCookies = store::MemoryCookies;

pub type PlatformIdentity = IdentityStore<PlatformStore, PlatformCookies>;

/// Create the identity store for the current platform.
pub fn make_identity_store(config: &SessionConfig) -> PlatformIdentity {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        IdentityStore::new(
            store::LocalStorageStore::new(),
            store::DocumentCookies::new(),
            config.clone(),
        )
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        IdentityStore::new(
            store::FileStore::new(data_dir().join("session")),
            store::MemoryCookies::new(),
            config.clone(),
        )
    }
}

/// Load the client configuration.
///
/// Native builds read `<config_dir>/tourbook/tourbook.toml` when it exists.
/// A broken configuration is logged and replaced by the defaults so the app
/// still starts.
pub fn load_config() -> AppConfig {
    match read_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration, using defaults: {}", e);
            AppConfig::default()
        }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
fn read_config() -> Result<AppConfig, api::ConfigError> {
    AppConfig::load()
}

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
fn read_config() -> Result<AppConfig, api::ConfigError> {
    let path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("tourbook")
        .join(AppConfig::filename());
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return AppConfig::load();
    };
    tracing::info!("Loading configuration from {}", path.display());
    let config = AppConfig::from_toml(&contents)?.with_env_overrides();
    config.validate()?;
    Ok(config)
}

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
fn data_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("tourbook")
}
