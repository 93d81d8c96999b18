use std::env;
use std::path::PathBuf;

use anyhow::Context;

use crate::domain::entities::MentionPolicy;

/// Default upper bound on comment text, in bytes
pub const DEFAULT_MAX_COMMENT_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Directory holding workflow definitions (`*.yml` / `*.yaml`)
    pub workflows_dir: PathBuf,
    pub user_directory_url: String,
    pub user_directory_token: Option<String>,
    /// Workflow engine base URL; runs are only logged when unset
    pub workflow_engine_url: Option<String>,
    pub workflow_engine_token: Option<String>,
    /// Webhook secret for verifying comment submissions (HMAC-SHA256)
    pub webhook_secret: Option<String>,
    /// Bearer token for the workflow admin endpoints
    pub admin_token: Option<String>,
    pub max_comment_bytes: usize,
    pub mention_policy: MentionPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mention_policy = match env::var("MENTION_DEDUP_POLICY") {
            Ok(raw) => raw
                .parse()
                .map_err(anyhow::Error::msg)
                .context("MENTION_DEDUP_POLICY")?,
            Err(_) => MentionPolicy::default(),
        };

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            workflows_dir: env::var("WORKFLOWS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./workflows")),
            user_directory_url: env::var("USER_DIRECTORY_URL")
                .context("USER_DIRECTORY_URL must be set")?,
            user_directory_token: env::var("USER_DIRECTORY_TOKEN").ok(),
            workflow_engine_url: env::var("WORKFLOW_ENGINE_URL").ok(),
            workflow_engine_token: env::var("WORKFLOW_ENGINE_TOKEN").ok(),
            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
            admin_token: env::var("ADMIN_TOKEN").ok(),
            max_comment_bytes: env::var("MAX_COMMENT_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_COMMENT_BYTES),
            mention_policy,
        })
    }

    /// Check if workflow runs are forwarded to an engine
    pub fn engine_enabled(&self) -> bool {
        self.workflow_engine_url.is_some()
    }
}
