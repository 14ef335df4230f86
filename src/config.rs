use derive_more::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, Display, PartialEq)]
pub enum ConfigError {
    #[display(fmt = "${} must be set", _0)]
    Missing(&'static str),

    #[display(fmt = "Failed to parse ${}: {:?}", key, value)]
    Invalid { key: &'static str, value: String },
}

impl std::error::Error for ConfigError {}

/// Where tokens come from and who they must be issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    pub jwks_url: String,
    pub issuer: String,
    pub audience: String,
}

impl AuthConfig {
    /// Settings for an Auth0-style tenant: issuer `https://<domain>/` publishing
    /// its keys under `/.well-known/jwks.json`.
    pub fn for_domain(domain: &str, audience: &str) -> AuthConfig {
        let issuer = format!("https://{}/", domain.trim_end_matches('/'));

        AuthConfig {
            jwks_url: format!("{}.well-known/jwks.json", issuer),
            issuer,
            audience: audience.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub pool_size: u32,
    pub auth: AuthConfig,
}

fn parse<T: FromStr>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError> {
    let value = value.unwrap_or_else(|| default.to_string());

    T::from_str(&value).map_err(|_| ConfigError::Invalid { key, value })
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        // Read the IP address and port on which to listen
        let ip: IpAddr = parse("LISTEN_IP", lookup("LISTEN_IP"), "127.0.0.1")?;
        let port: u16 = parse("PORT", lookup("PORT"), "5000")?;

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "ubeer.sqlite3".to_string());
        let mut pool_size: u32 = parse("DATABASE_POOL_SIZE", lookup("DATABASE_POOL_SIZE"), "3")?;
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_POOL_SIZE",
                value: pool_size.to_string(),
            });
        }

        // Every connection to an in-memory database opens its own empty one
        if is_in_memory(&database_url) {
            pool_size = 1;
        }

        let mut auth = AuthConfig::for_domain(&require("AUTH0_DOMAIN")?, &require("API_AUDIENCE")?);
        if let Some(jwks_url) = lookup("JWKS_URL") {
            auth.jwks_url = jwks_url;
        }

        Ok(Config {
            listen_addr: SocketAddr::new(ip, port),
            database_url,
            pool_size,
            auth,
        })
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url == ":memory:" || database_url.contains("mode=memory")
}
