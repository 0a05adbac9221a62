use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::builtins::person_command;
use crate::config::Config;
use crate::palette::CommandPalette;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PersonRecord {
    #[serde(default)]
    pub distinct_ids: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PersonListResponse {
    #[serde(default)]
    results: Vec<PersonRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("lookup unavailable: {0}")]
    Unavailable(String),
}

/// Remote person directory keyed by any identifier a user might type.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    async fn find_person(&self, key_identifier: &str) -> Result<Option<PersonRecord>, LookupError>;
}

pub struct HttpDirectoryLookup {
    client: reqwest::Client,
    url: String,
}

impl HttpDirectoryLookup {
    pub fn new(client: reqwest::Client, base_url: &str, endpoint: &str) -> Self {
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        Self { client, url }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(reqwest::Client::new(), &cfg.api_base_url, &cfg.lookup_endpoint)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DirectoryLookup for HttpDirectoryLookup {
    async fn find_person(&self, key_identifier: &str) -> Result<Option<PersonRecord>, LookupError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("key_identifier", key_identifier)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        let body: PersonListResponse = response.json().await?;
        Ok(body.results.into_iter().next())
    }
}

/// Never finds anyone; used when running without a backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineLookup;

#[async_trait]
impl DirectoryLookup for OfflineLookup {
    async fn find_person(
        &self,
        _key_identifier: &str,
    ) -> Result<Option<PersonRecord>, LookupError> {
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOutcome {
    pub generation: u64,
    pub input: String,
    pub person: PersonRecord,
}

/// Runs a lookup once the input has been stable for the quiet period.
///
/// Each input change aborts the pending lookup; an outcome is only applied if
/// no newer input arrived after it was requested.
pub struct LookupDebouncer {
    lookup: Arc<dyn DirectoryLookup>,
    quiet_period: Duration,
    min_input_len: usize,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    outcomes: mpsc::UnboundedSender<LookupOutcome>,
}

impl LookupDebouncer {
    pub fn new(
        lookup: Arc<dyn DirectoryLookup>,
        quiet_period: Duration,
        min_input_len: usize,
    ) -> (Self, mpsc::UnboundedReceiver<LookupOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        (
            Self {
                lookup,
                quiet_period,
                min_input_len,
                generation: 0,
                pending: None,
                outcomes,
            },
            receiver,
        )
    }

    pub fn from_config(
        lookup: Arc<dyn DirectoryLookup>,
        cfg: &Config,
    ) -> (Self, mpsc::UnboundedReceiver<LookupOutcome>) {
        Self::new(lookup, cfg.debounce(), cfg.lookup_min_input_len)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Must be called from within a tokio runtime.
    pub fn on_input_changed(&mut self, input: &str) {
        self.generation += 1;
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        if input.chars().count() <= self.min_input_len {
            return;
        }

        let generation = self.generation;
        let input = input.to_string();
        let lookup = self.lookup.clone();
        let quiet_period = self.quiet_period;
        let outcomes = self.outcomes.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            debug!(generation, "running directory lookup");
            match lookup.find_person(&input).await {
                Ok(Some(person)) => {
                    let _ = outcomes.send(LookupOutcome {
                        generation,
                        input,
                        person,
                    });
                }
                Ok(None) => debug!(generation, "directory lookup found nobody"),
                Err(error) => warn!(generation, %error, "directory lookup failed"),
            }
        }));
    }

    pub fn is_current(&self, outcome: &LookupOutcome) -> bool {
        outcome.generation == self.generation
    }

    /// Registers the person command if `outcome` is from the latest request.
    pub fn apply(&self, palette: &mut CommandPalette, outcome: LookupOutcome) -> bool {
        if !self.is_current(&outcome) {
            debug!(
                generation = outcome.generation,
                latest = self.generation,
                "dropping stale lookup outcome"
            );
            return false;
        }
        let Some(command) = person_command(palette.collaborators(), &outcome.input, &outcome.person)
        else {
            return false;
        };
        info!(key = %command.key, "registering looked-up person");
        palette.register_command(command);
        true
    }
}

impl Drop for LookupDebouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
