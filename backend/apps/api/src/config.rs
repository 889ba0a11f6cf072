//! Application Configuration
//!
//! Startup configuration from the environment. Development is
//! forgiving (random session secret, local defaults); production
//! refuses to start without an explicit secret.

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use auth::AuthConfig;
use gallery::GalleryConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORAGE_URL: &str = "http://localhost:9000";
const DEFAULT_STORAGE_TIMEOUT_SECS: u64 = 30;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    /// Read `APP_ENV`; anything other than `production` is development.
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: AppEnv,
    pub port: u16,
    pub database_url: String,
    pub storage_url: String,
    pub auth: AuthConfig,
    pub gallery: GalleryConfig,
}

impl AppConfig {
    pub fn from_env(app_env: AppEnv) -> anyhow::Result<Self> {
        let port = resolve_port(env::var("PORT").ok(), env::args().nth(1));

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let storage_url = match env::var("STORAGE_URL") {
            Ok(url) => url,
            Err(_) if app_env.is_production() => {
                anyhow::bail!("STORAGE_URL must be set in production")
            }
            Err(_) => DEFAULT_STORAGE_URL.to_string(),
        };

        let auth = match env::var("SESSION_SECRET") {
            Ok(b64) => AuthConfig {
                session_secret: parse_session_secret(&b64)?,
                cookie_secure: app_env.is_production(),
                ..AuthConfig::default()
            },
            Err(_) if app_env.is_production() => {
                anyhow::bail!("SESSION_SECRET must be set in production")
            }
            // Per-process random secret: sessions do not survive a
            // restart, which is fine for development.
            Err(_) => AuthConfig::development(),
        };

        let storage_timeout_secs = env::var("STORAGE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_STORAGE_TIMEOUT_SECS);

        Ok(Self {
            env: app_env,
            port,
            database_url,
            storage_url,
            auth,
            gallery: GalleryConfig::with_storage_timeout(Duration::from_secs(
                storage_timeout_secs,
            )),
        })
    }

    /// Production binds all interfaces; development stays local.
    pub fn bind_addr(&self) -> SocketAddr {
        let host: IpAddr = if self.env.is_production() {
            Ipv4Addr::UNSPECIFIED.into()
        } else {
            Ipv4Addr::LOCALHOST.into()
        };
        SocketAddr::new(host, self.port)
    }
}

fn resolve_port(env_port: Option<String>, arg_port: Option<String>) -> u16 {
    env_port
        .and_then(|v| v.parse().ok())
        .or_else(|| arg_port.and_then(|v| v.parse().ok()))
        .unwrap_or(DEFAULT_PORT)
}

fn parse_session_secret(b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(b64)
        .context("SESSION_SECRET is not valid base64")?;

    let mut secret = [0u8; 32];
    if bytes.len() != secret.len() {
        anyhow::bail!(
            "SESSION_SECRET must decode to exactly {} bytes, got {}",
            secret.len(),
            bytes.len()
        );
    }
    secret.copy_from_slice(&bytes);
    Ok(secret)
}
