use std::sync::Arc;

use tracing::info;

use crate::model::{CommandResult, Executor, Flow};

#[derive(Debug, Clone, Default)]
pub enum FlowState {
    #[default]
    Idle,
    InFlow(Arc<Flow>),
}

/// What selecting a result did.
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    /// The clear-input sentinel ran; any flow was left.
    Cleared,
    /// The executor handed back a flow, which is now active.
    EnteredFlow(Arc<Flow>),
    /// The executor returned nothing; the palette should close.
    Closed,
}

/// Tracks the single active flow, if any. Flows replace each other; they
/// never nest.
#[derive(Debug, Clone, Default)]
pub struct FlowMachine {
    state: FlowState,
}

impl FlowMachine {
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn active_flow(&self) -> Option<&Arc<Flow>> {
        match &self.state {
            FlowState::Idle => None,
            FlowState::InFlow(flow) => Some(flow),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, FlowState::Idle)
    }

    pub fn activate(&mut self, flow: Option<Arc<Flow>>) {
        match flow {
            Some(flow) => {
                info!(scope = %flow.scope, "entered flow");
                self.state = FlowState::InFlow(flow);
            }
            None => {
                if !self.is_idle() {
                    info!("left flow");
                }
                self.state = FlowState::Idle;
            }
        }
    }

    /// Returns whether a flow was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = !self.is_idle();
        self.activate(None);
        was_active
    }

    pub fn execute(&mut self, result: &CommandResult) -> ExecutionOutcome {
        match &result.template.executor {
            Some(Executor::ClearInput) => {
                self.activate(None);
                ExecutionOutcome::Cleared
            }
            Some(Executor::Run(executor)) => match executor() {
                Some(flow) => {
                    let flow = Arc::new(flow);
                    self.activate(Some(flow.clone()));
                    ExecutionOutcome::EnteredFlow(flow)
                }
                None => {
                    self.activate(None);
                    ExecutionOutcome::Closed
                }
            },
            None => {
                self.activate(None);
                ExecutionOutcome::Closed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ExecutionOutcome, FlowMachine};
    use crate::model::{Command, CommandResult, Flow, Icon, ResultTemplate, Source};

    const ICON: Icon = Icon::new("x");

    fn result(template: ResultTemplate) -> CommandResult {
        let command = Arc::new(Command::new("k", "global", template.clone()));
        CommandResult::new(template, Source::Command(command))
    }

    #[test]
    fn executor_returning_flow_enters_it() {
        let mut machine = FlowMachine::default();
        let outcome = machine.execute(&result(ResultTemplate::new(ICON, "Create").executes(|| {
            Some(Flow::new("Creating Dashboard", Vec::<ResultTemplate>::new()))
        })));

        assert!(matches!(outcome, ExecutionOutcome::EnteredFlow(_)));
        assert_eq!(machine.active_flow().unwrap().scope, "Creating Dashboard");
    }

    #[test]
    fn new_flow_replaces_current_one() {
        let mut machine = FlowMachine::default();
        machine.activate(Some(Arc::new(Flow::new("First", Vec::<ResultTemplate>::new()))));
        machine.execute(&result(ResultTemplate::new(ICON, "Next").executes(|| {
            Some(Flow::new("Second", Vec::<ResultTemplate>::new()))
        })));
        assert_eq!(machine.active_flow().unwrap().scope, "Second");
    }

    #[test]
    fn void_executor_returns_to_idle() {
        let mut machine = FlowMachine::default();
        machine.activate(Some(Arc::new(Flow::new("First", Vec::<ResultTemplate>::new()))));
        let outcome = machine.execute(&result(ResultTemplate::new(ICON, "Done").executes(|| None)));

        assert!(matches!(outcome, ExecutionOutcome::Closed));
        assert!(machine.is_idle());
    }

    #[test]
    fn clear_input_sentinel_leaves_flow() {
        let mut machine = FlowMachine::default();
        machine.activate(Some(Arc::new(Flow::new("First", Vec::<ResultTemplate>::new()))));

        let outcome = machine.execute(&result(ResultTemplate::new(ICON, "Ok").clears_input()));
        assert!(matches!(outcome, ExecutionOutcome::Cleared));
        assert!(machine.is_idle());
    }

    #[test]
    fn cancel_reports_whether_a_flow_was_active() {
        let mut machine = FlowMachine::default();
        assert!(!machine.cancel());
        machine.activate(Some(Arc::new(Flow::new("First", Vec::<ResultTemplate>::new()))));
        assert!(machine.cancel());
        assert!(machine.is_idle());
    }
}
