use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::builtins::{builtin_commands, dashboards_command, BUILTIN_COMMAND_KEYS};
use crate::collaborators::Collaborators;
use crate::contract::{ExecutedResultPayload, FlowDto, PaletteView, ResultGroupDto};
use crate::flow::{ExecutionOutcome, FlowMachine};
use crate::grouping::{clamp_index, group_results, result_at, total_results, ResultGroup};
use crate::model::{Command, CommandResult, Flow, Source};
use crate::palette_state::PaletteState;
use crate::ranking::rank_with_rng;
use crate::registry::{CommandRegistry, RegisteredCommand};
use crate::resolver::resolve_source;

pub const PALETTE_SHOWN_EVENT: &str = "palette shown";
pub const COMMAND_EXECUTED_EVENT: &str = "palette command executed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    ExitedFlow,
    ClearedInput,
    Hidden,
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Squeaked,
    Executed(ExecutionOutcome),
    NothingSelected,
}

/// The palette: registered commands, the active flow, and input state.
///
/// All mutation goes through these methods. Results and groups are
/// recomputed whenever the input, the flow, or the registry changes, and
/// held until the next change so the displayed sample is the executed one.
pub struct CommandPalette {
    registry: CommandRegistry,
    state: PaletteState,
    flow: FlowMachine,
    collaborators: Collaborators,
    rng: StdRng,
    results: Vec<CommandResult>,
    groups: Vec<ResultGroup>,
}

enum Candidates {
    Fixed(Vec<CommandResult>),
    Ranked(Vec<CommandResult>),
}

impl CommandPalette {
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_rng(collaborators, StdRng::from_entropy())
    }

    /// A palette whose empty-input sample is reproducible.
    pub fn with_seed(collaborators: Collaborators, seed: u64) -> Self {
        Self::with_rng(collaborators, StdRng::seed_from_u64(seed))
    }

    fn with_rng(collaborators: Collaborators, rng: StdRng) -> Self {
        let mut palette = Self {
            registry: CommandRegistry::new(),
            state: PaletteState::default(),
            flow: FlowMachine::default(),
            collaborators,
            rng,
            results: Vec::new(),
            groups: Vec::new(),
        };
        palette.refresh_results();
        palette
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn state(&self) -> &PaletteState {
        &self.state
    }

    pub fn register_command(&mut self, command: impl Into<Arc<Command>>) {
        self.registry.register(command);
        self.refresh_results();
    }

    pub fn deregister_command(&mut self, key: &str) {
        self.registry.deregister(key);
        self.refresh_results();
    }

    pub fn deregister_scope(&mut self, scope: &str) -> usize {
        let removed = self.registry.deregister_scope(scope);
        if removed > 0 {
            self.refresh_results();
        }
        removed
    }

    pub fn mount_builtins(&mut self) {
        for command in builtin_commands(&self.collaborators) {
            self.registry.register(command);
        }
        self.refresh_results();
    }

    pub fn unmount_builtins(&mut self) {
        for key in BUILTIN_COMMAND_KEYS {
            self.registry.deregister(key);
        }
        self.refresh_results();
    }

    pub fn is_shown(&self) -> bool {
        self.state.is_shown()
    }

    pub fn show(&mut self) {
        self.state.show();
        self.collaborators
            .analytics
            .capture(PALETTE_SHOWN_EVENT, serde_json::Value::Null);
    }

    pub fn hide(&mut self) {
        self.state.hide();
    }

    pub fn toggle(&mut self) -> bool {
        let shown = self.state.toggle();
        if shown {
            self.collaborators
                .analytics
                .capture(PALETTE_SHOWN_EVENT, serde_json::Value::Null);
        }
        shown
    }

    pub fn input(&self) -> &str {
        self.state.input()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.state.set_input(input);
        self.refresh_results();
    }

    pub fn is_squeak(&self) -> bool {
        self.state.is_squeak()
    }

    pub fn active_flow(&self) -> Option<&Arc<Flow>> {
        self.flow.active_flow()
    }

    pub fn arrow_up(&mut self) {
        self.state.arrow_up();
    }

    pub fn arrow_down(&mut self, max_index: usize) {
        self.state.arrow_down(max_index);
    }

    pub fn mouse_enter_result(&mut self, index: usize) {
        self.state.mouse_enter_result(index);
    }

    pub fn mouse_leave_result(&mut self) {
        self.state.mouse_leave_result();
    }

    pub fn active_result_index(&self) -> usize {
        self.state.active_result_index()
    }

    /// Registered commands plus the synthesized per-dashboard command.
    pub fn effective_commands(&self) -> Vec<RegisteredCommand> {
        self.registry
            .with_overlay(RegisteredCommand::new(dashboards_command(&self.collaborators)))
    }

    /// The ranked results for the current input, as last computed.
    pub fn search_results(&self) -> Vec<CommandResult> {
        self.results.clone()
    }

    /// The displayed groups. Indices here are what navigation and
    /// execution refer to.
    pub fn grouped_results(&self) -> &[ResultGroup] {
        &self.groups
    }

    /// Recomputes results outside the usual triggers, e.g. after the
    /// dashboard list changed.
    pub fn refresh_results(&mut self) {
        let results = match self.candidates() {
            Candidates::Fixed(results) => results,
            Candidates::Ranked(candidates) => {
                rank_with_rng(candidates, self.state.input(), &mut self.rng)
            }
        };
        let flow_scope = self.flow.active_flow().map(|flow| flow.scope.as_str());
        self.groups = group_results(results.clone(), flow_scope);
        self.results = results;
    }

    fn candidates(&self) -> Candidates {
        if self.is_squeak() {
            return Candidates::Fixed(Vec::new());
        }
        let input = self.state.input();
        if let Some(flow) = self.flow.active_flow() {
            return Candidates::Fixed(resolve_source(
                &Source::Flow(flow.clone()),
                Some(input),
                None,
            ));
        }

        let mut direct: Vec<CommandResult> = Vec::new();
        let mut prefixed: Vec<CommandResult> = Vec::new();
        for entry in self.effective_commands() {
            let source = Source::Command(entry.command.clone());
            if let Some(matched) = entry.pattern.as_ref().and_then(|p| p.matches(input)) {
                prefixed.extend(resolve_source(&source, matched.argument, Some(matched.prefix)));
            }
            direct.extend(resolve_source(&source, Some(input), None));
        }
        debug!(
            direct = direct.len(),
            prefixed = prefixed.len(),
            "resolved palette candidates"
        );

        direct.extend(prefixed);
        Candidates::Ranked(direct)
    }

    pub fn activate_flow(&mut self, flow: Option<Flow>) {
        self.flow.activate(flow.map(Arc::new));
        self.state.reset_session();
        self.refresh_results();
    }

    pub fn execute_result(&mut self, result: &CommandResult) -> ExecutionOutcome {
        let outcome = self.flow.execute(result);
        self.state.reset_session();
        if matches!(outcome, ExecutionOutcome::Closed) {
            self.state.hide();
        }
        self.refresh_results();

        match serde_json::to_value(ExecutedResultPayload::from(result)) {
            Ok(payload) => self
                .collaborators
                .analytics
                .capture(COMMAND_EXECUTED_EVENT, payload),
            Err(error) => warn!(%error, "failed to encode executed command payload"),
        }
        outcome
    }

    /// Leaves the flow, else clears the input, else hides the palette.
    pub fn escape(&mut self) -> EscapeOutcome {
        if self.flow.active_flow().is_some() {
            self.activate_flow(None);
            EscapeOutcome::ExitedFlow
        } else if !self.state.input().is_empty() {
            self.set_input("");
            EscapeOutcome::ClearedInput
        } else {
            self.hide();
            EscapeOutcome::Hidden
        }
    }

    /// Enter: plays the squeak, or executes the active result.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_squeak() {
            self.collaborators.sound.play_squeak();
            return SubmitOutcome::Squeaked;
        }
        let total = total_results(&self.groups);
        if total == 0 {
            return SubmitOutcome::NothingSelected;
        }
        let index = clamp_index(self.active_result_index(), total);
        match result_at(&self.groups, index).cloned() {
            Some(result) => SubmitOutcome::Executed(self.execute_result(&result)),
            None => SubmitOutcome::NothingSelected,
        }
    }

    pub fn view(&self) -> PaletteView {
        let total = total_results(&self.groups);
        PaletteView {
            shown: self.is_shown(),
            input: self.input().to_string(),
            active_result_index: clamp_index(self.active_result_index(), total),
            flow: self.active_flow().map(|flow| FlowDto {
                scope: flow.scope.clone(),
                instruction: flow.instruction.clone(),
                icon: flow.icon.map(|icon| icon.name().to_string()),
            }),
            groups: self.groups.iter().map(ResultGroupDto::from).collect(),
        }
    }
}

impl Default for CommandPalette {
    fn default() -> Self {
        Self::new(Collaborators::default())
    }
}
