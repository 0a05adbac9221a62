use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::resolver::Resolver;

/// Opaque handle the rendering layer maps to an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Icon(&'static str);

impl Icon {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

pub type ExecutorFn = dyn Fn() -> Option<Flow> + Send + Sync;

/// What happens when a result is selected.
#[derive(Clone)]
pub enum Executor {
    /// Only clears the input and leaves any active flow.
    ClearInput,
    /// Runs side effects and may hand back a flow to enter.
    Run(Arc<ExecutorFn>),
}

impl Executor {
    pub fn run<F>(f: F) -> Self
    where
        F: Fn() -> Option<Flow> + Send + Sync + 'static,
    {
        Self::Run(Arc::new(f))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClearInput => "clear_input",
            Self::Run(_) => "function",
        }
    }
}

impl Debug for Executor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClearInput => write!(f, "Executor::ClearInput"),
            Self::Run(_) => write!(f, "Executor::Run(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultTemplate {
    pub icon: Icon,
    pub display: String,
    pub synonyms: Vec<String>,
    pub executor: Option<Executor>,
    pub guarantee: bool,
}

impl ResultTemplate {
    pub fn new(icon: Icon, display: impl Into<String>) -> Self {
        Self {
            icon,
            display: display.into(),
            synonyms: Vec::new(),
            executor: None,
            guarantee: false,
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn executes<F>(self, f: F) -> Self
    where
        F: Fn() -> Option<Flow> + Send + Sync + 'static,
    {
        self.with_executor(Executor::run(f))
    }

    pub fn clears_input(self) -> Self {
        self.with_executor(Executor::ClearInput)
    }

    pub fn guaranteed(mut self) -> Self {
        self.guarantee = true;
        self
    }
}

/// A multi-step sub-session entered after an executor hands it back.
#[derive(Debug, Clone)]
pub struct Flow {
    pub icon: Option<Icon>,
    pub instruction: Option<String>,
    pub resolver: Resolver,
    pub scope: String,
}

impl Flow {
    pub fn new(scope: impl Into<String>, resolver: impl Into<Resolver>) -> Self {
        Self {
            icon: None,
            instruction: None,
            resolver: resolver.into(),
            scope: scope.into(),
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Command {
    pub key: String,
    pub prefixes: Vec<String>,
    pub resolver: Resolver,
    pub scope: String,
}

impl Command {
    pub fn new(
        key: impl Into<String>,
        scope: impl Into<String>,
        resolver: impl Into<Resolver>,
    ) -> Self {
        Self {
            key: key.into(),
            prefixes: Vec::new(),
            resolver: resolver.into(),
            scope: scope.into(),
        }
    }

    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

/// Back-reference from a result to whatever produced it.
#[derive(Debug, Clone)]
pub enum Source {
    Command(Arc<Command>),
    Flow(Arc<Flow>),
}

impl Source {
    pub fn scope(&self) -> &str {
        match self {
            Self::Command(command) => &command.scope,
            Self::Flow(flow) => &flow.scope,
        }
    }

    pub fn resolver(&self) -> &Resolver {
        match self {
            Self::Command(command) => &command.resolver,
            Self::Flow(flow) => &flow.resolver,
        }
    }

    pub fn command_key(&self) -> Option<&str> {
        match self {
            Self::Command(command) => Some(&command.key),
            Self::Flow(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub template: ResultTemplate,
    pub source: Source,
    pub index: Option<usize>,
}

impl CommandResult {
    pub fn new(template: ResultTemplate, source: Source) -> Self {
        Self {
            template,
            source,
            index: None,
        }
    }

    pub fn display(&self) -> &str {
        &self.template.display
    }

    pub fn scope(&self) -> &str {
        self.source.scope()
    }

    pub fn is_guaranteed(&self) -> bool {
        self.template.guarantee
    }
}
