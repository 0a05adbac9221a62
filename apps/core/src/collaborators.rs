use std::sync::Arc;

use serde_json::Value;
use tracing::info;

pub trait Navigator: Send + Sync {
    fn push(&self, path: &str, query: Option<&str>, hash: Option<&str>);
    /// Opens an external URL, usually in a new window.
    fn open_url(&self, url: &str);
    /// Replaces the current location, leaving the app.
    fn assign_location(&self, href: &str);
}

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str, description: &str);
}

pub trait SoundPlayer: Send + Sync {
    fn play_squeak(&self);
}

pub trait Analytics: Send + Sync {
    fn capture(&self, event: &str, payload: Value);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub id: u64,
    pub name: String,
}

pub trait DashboardModel: Send + Sync {
    fn dashboards(&self) -> Vec<DashboardSummary>;
    /// Creates a dashboard and navigates to it.
    fn add_dashboard(&self, name: &str);
}

pub trait UrlSuggestions: Send + Sync {
    fn app_urls(&self) -> Vec<String>;
    fn suggested_urls(&self) -> Vec<String>;
}

pub trait PersonalApiKeys: Send + Sync {
    fn create_key(&self, label: &str);
}

/// The external side of the palette. Every executor side effect goes
/// through one of these handles.
#[derive(Clone)]
pub struct Collaborators {
    pub navigator: Arc<dyn Navigator>,
    pub clipboard: Arc<dyn Clipboard>,
    pub sound: Arc<dyn SoundPlayer>,
    pub analytics: Arc<dyn Analytics>,
    pub dashboards: Arc<dyn DashboardModel>,
    pub urls: Arc<dyn UrlSuggestions>,
    pub api_keys: Arc<dyn PersonalApiKeys>,
}

impl Collaborators {
    /// Every handle set to the same implementation.
    pub fn uniform<T>(inner: Arc<T>) -> Self
    where
        T: Navigator
            + Clipboard
            + SoundPlayer
            + Analytics
            + DashboardModel
            + UrlSuggestions
            + PersonalApiKeys
            + 'static,
    {
        Self {
            navigator: inner.clone(),
            clipboard: inner.clone(),
            sound: inner.clone(),
            analytics: inner.clone(),
            dashboards: inner.clone(),
            urls: inner.clone(),
            api_keys: inner,
        }
    }

    pub fn logging() -> Self {
        Self::uniform(Arc::new(LoggingCollaborator))
    }

    pub fn with_analytics(mut self, analytics: Arc<dyn Analytics>) -> Self {
        self.analytics = analytics;
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::uniform(Arc::new(NoopCollaborator))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCollaborator;

impl Navigator for NoopCollaborator {
    fn push(&self, _path: &str, _query: Option<&str>, _hash: Option<&str>) {}
    fn open_url(&self, _url: &str) {}
    fn assign_location(&self, _href: &str) {}
}

impl Clipboard for NoopCollaborator {
    fn copy(&self, _text: &str, _description: &str) {}
}

impl SoundPlayer for NoopCollaborator {
    fn play_squeak(&self) {}
}

impl Analytics for NoopCollaborator {
    fn capture(&self, _event: &str, _payload: Value) {}
}

impl DashboardModel for NoopCollaborator {
    fn dashboards(&self) -> Vec<DashboardSummary> {
        Vec::new()
    }

    fn add_dashboard(&self, _name: &str) {}
}

impl UrlSuggestions for NoopCollaborator {
    fn app_urls(&self) -> Vec<String> {
        Vec::new()
    }

    fn suggested_urls(&self) -> Vec<String> {
        Vec::new()
    }
}

impl PersonalApiKeys for NoopCollaborator {
    fn create_key(&self, _label: &str) {}
}

/// Reports side effects to the log instead of performing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCollaborator;

impl Navigator for LoggingCollaborator {
    fn push(&self, path: &str, query: Option<&str>, hash: Option<&str>) {
        info!(path, query, hash, "navigate");
    }

    fn open_url(&self, url: &str) {
        info!(url, "open url");
    }

    fn assign_location(&self, href: &str) {
        info!(href, "assign location");
    }
}

impl Clipboard for LoggingCollaborator {
    fn copy(&self, text: &str, description: &str) {
        info!(text, description, "copy to clipboard");
    }
}

impl SoundPlayer for LoggingCollaborator {
    fn play_squeak(&self) {
        info!("squeak");
    }
}

impl Analytics for LoggingCollaborator {
    fn capture(&self, event: &str, payload: Value) {
        info!(event, %payload, "analytics event");
    }
}

impl DashboardModel for LoggingCollaborator {
    fn dashboards(&self) -> Vec<DashboardSummary> {
        Vec::new()
    }

    fn add_dashboard(&self, name: &str) {
        info!(name, "add dashboard");
    }
}

impl UrlSuggestions for LoggingCollaborator {
    fn app_urls(&self) -> Vec<String> {
        Vec::new()
    }

    fn suggested_urls(&self) -> Vec<String> {
        Vec::new()
    }
}

impl PersonalApiKeys for LoggingCollaborator {
    fn create_key(&self, label: &str) {
        info!(label, "create personal api key");
    }
}
