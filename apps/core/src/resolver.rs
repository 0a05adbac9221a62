use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tracing::warn;

use crate::model::{CommandResult, ResultTemplate, Source};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("resolver failed: {message}")]
pub struct ResolveError {
    pub message: String,
}

impl ResolveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ResolverFn =
    dyn Fn(Option<&str>, Option<&str>) -> Result<Vec<ResultTemplate>, ResolveError> + Send + Sync;

/// Produces result templates for a command or flow.
///
/// The function shape receives `(argument, prefix_applied)`; the static shapes
/// ignore both.
#[derive(Clone)]
pub enum Resolver {
    Dynamic(Arc<ResolverFn>),
    Single(ResultTemplate),
    Many(Vec<ResultTemplate>),
}

impl Resolver {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(Option<&str>, Option<&str>) -> Result<Vec<ResultTemplate>, ResolveError>
            + Send
            + Sync
            + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    pub fn invoke(
        &self,
        argument: Option<&str>,
        prefix_applied: Option<&str>,
    ) -> Result<Vec<ResultTemplate>, ResolveError> {
        match self {
            Self::Dynamic(f) => f(argument, prefix_applied),
            Self::Single(template) => Ok(vec![template.clone()]),
            Self::Many(templates) => Ok(templates.clone()),
        }
    }
}

impl Debug for Resolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dynamic(_) => write!(f, "Resolver::Dynamic(..)"),
            Self::Single(template) => f.debug_tuple("Resolver::Single").field(template).finish(),
            Self::Many(templates) => f.debug_tuple("Resolver::Many").field(templates).finish(),
        }
    }
}

impl From<ResultTemplate> for Resolver {
    fn from(value: ResultTemplate) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<ResultTemplate>> for Resolver {
    fn from(value: Vec<ResultTemplate>) -> Self {
        Self::Many(value)
    }
}

/// Runs the source's resolver and tags each template with the source.
///
/// A failing resolver contributes nothing; other sources are unaffected.
pub fn resolve_source(
    source: &Source,
    argument: Option<&str>,
    prefix_applied: Option<&str>,
) -> Vec<CommandResult> {
    match source.resolver().invoke(argument, prefix_applied) {
        Ok(templates) => templates
            .into_iter()
            .map(|template| CommandResult::new(template, source.clone()))
            .collect(),
        Err(error) => {
            warn!(
                command = source.command_key().unwrap_or("<flow>"),
                scope = source.scope(),
                %error,
                "resolver failed; skipping its results"
            );
            Vec::new()
        }
    }
}
