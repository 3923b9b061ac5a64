//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use sb_common::policy::BreakGlassList;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// `PostgreSQL` connection URL
    pub database_url: String,

    /// JWT signing secret used to verify inbound access tokens
    pub jwt_secret: String,

    /// Budget for a single external permission lookup (default: 5s)
    pub permission_lookup_timeout: Duration,

    /// Whether a failed or timed-out permission lookup grants access
    /// (default: true). Flip to false for fail-closed deployments.
    pub fail_open_on_timeout: bool,

    /// Break-glass operator role IDs (comma-separated UUIDs)
    pub break_glass_role_ids: Vec<String>,

    /// Break-glass operator user IDs (comma-separated UUIDs)
    pub break_glass_user_ids: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            permission_lookup_timeout: Duration::from_secs(
                env::var("PERMISSION_LOOKUP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            ),
            fail_open_on_timeout: env::var("FAIL_OPEN_ON_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            break_glass_role_ids: parse_id_list(env::var("BREAK_GLASS_ROLE_IDS").ok()),
            break_glass_user_ids: parse_id_list(env::var("BREAK_GLASS_USER_IDS").ok()),
        })
    }

    /// Parse the configured break-glass allow-list.
    pub fn break_glass(&self) -> Result<BreakGlassList> {
        BreakGlassList::try_from_ids(&self.break_glass_role_ids, &self.break_glass_user_ids)
            .context("invalid break-glass identifier in configuration")
    }
}

fn parse_id_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
