//! Configuration
//!
//! Everything is read from the environment, a `.env` file included

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::public_url::PublicUrl;
use crate::short_code::DEFAULT_ATTEMPTS;
use crate::short_code::DEFAULT_LENGTH;
use crate::short_code::MAX_LENGTH;
use crate::short_code::MIN_LENGTH;
use crate::short_code::ShortCodeAllocator;
use crate::utils::env_var;
use crate::utils::env_var_or_else;

const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";
const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:6000";
const DEFAULT_PROFILE_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Runtime configuration
#[derive(Clone)]
pub struct Config {
    /// Address to listen on
    pub address: SocketAddr,

    /// Builder for the scan URLs
    pub public_url: PublicUrl,

    /// Secret to verify caller tokens with
    pub jwt_secret: String,

    /// Postgres connection, in-memory storage when not set
    pub database_url: Option<String>,

    /// Short code allocation
    pub allocator: ShortCodeAllocator,

    /// Idle lifetime of owner profiles
    pub profile_ttl: Duration,
}

impl Config {
    /// Read the configuration from the environment
    ///
    /// # Errors
    ///
    /// Will return `Err` for values that can not be used
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            address: address()?,
            public_url: public_url()?,
            jwt_secret: jwt_secret(),
            database_url: env_var("DATABASE_URL"),
            allocator: allocator()?,
            profile_ttl: profile_ttl()?,
        })
    }
}

fn address() -> Result<SocketAddr> {
    let mut address = env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS))
        .parse::<SocketAddr>()
        .context("Invalid `ADDRESS`")?;

    // optional override of just the port
    if let Some(port) = env_var("PORT") {
        let port = port.parse::<u16>().context("Invalid `PORT`")?;

        address.set_port(port);
    }

    Ok(address)
}

fn public_url() -> Result<PublicUrl> {
    let origin = env_var_or_else("PUBLIC_ORIGIN", || String::from(DEFAULT_PUBLIC_ORIGIN));

    PublicUrl::new(&origin).context("Invalid `PUBLIC_ORIGIN`")
}

fn jwt_secret() -> String {
    env_var_or_else("JWT_SECRET", || {
        let jwt_secret = rand::rng()
            .sample_iter(Alphanumeric)
            .take(32)
            .map(char::from)
            .collect::<String>();

        tracing::info!("`JWT_SECRET` is not set, generating temporary one: {jwt_secret}");

        jwt_secret
    })
}

fn allocator() -> Result<ShortCodeAllocator> {
    let length = parse_or("SHORT_CODE_LENGTH", DEFAULT_LENGTH)?;
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        bail!("`SHORT_CODE_LENGTH` must be between {MIN_LENGTH} and {MAX_LENGTH}, got {length}");
    }

    let attempts = parse_or("SHORT_CODE_ATTEMPTS", DEFAULT_ATTEMPTS)?;
    if attempts == 0 {
        bail!("`SHORT_CODE_ATTEMPTS` must be at least 1");
    }

    Ok(ShortCodeAllocator::new(length, attempts))
}

fn profile_ttl() -> Result<Duration> {
    let seconds = parse_or("PROFILE_TTL_SECONDS", DEFAULT_PROFILE_TTL_SECONDS)?;

    Ok(Duration::from_secs(seconds))
}

/// Parse an ENV var, or use a default when it is not set
fn parse_or<T>(var_name: &'static str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_var(var_name).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .with_context(|| format!("Invalid `{var_name}`: {value}"))
    })
}
