use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::model::CommandResult;
use crate::search::{fuzzy_search, Searchable};

pub const RESULTS_MAX: usize = 5;
pub const GLOBAL_COMMAND_SCOPE: &str = "global";

impl Searchable for CommandResult {
    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.template.display.as_str())
            .chain(self.template.synonyms.iter().map(String::as_str))
            .collect()
    }
}

/// Orders candidates for display: guaranteed results first, then the best
/// fuzzy matches for `input` (or a random sample when `input` is empty), with
/// global-scope results moved after all others.
pub fn rank_with_rng<R: Rng + ?Sized>(
    candidates: Vec<CommandResult>,
    input: &str,
    rng: &mut R,
) -> Vec<CommandResult> {
    let (guaranteed, fusable): (Vec<CommandResult>, Vec<CommandResult>) =
        candidates.into_iter().partition(CommandResult::is_guaranteed);

    let mut guaranteed = unique_by_display(guaranteed);
    guaranteed.truncate(RESULTS_MAX);
    let fusable = unique_by_display(fusable);
    let remaining = RESULTS_MAX.saturating_sub(guaranteed.len());

    let fused = if input.is_empty() {
        sample(fusable, remaining, rng)
    } else {
        let hits = fuzzy_search(&fusable, input);
        let mut slots: Vec<Option<CommandResult>> = fusable.into_iter().map(Some).collect();
        hits.into_iter()
            .take(remaining)
            .filter_map(|hit| slots[hit.index].take())
            .collect()
    };
    debug!(
        guaranteed = guaranteed.len(),
        fused = fused.len(),
        empty_input = input.is_empty(),
        "ranked palette results"
    );

    let mut ranked = guaranteed;
    ranked.extend(fused);
    ranked.sort_by_key(|result| result.scope() == GLOBAL_COMMAND_SCOPE);
    ranked
}

/// Keeps the first result for each display text.
pub fn unique_by_display(results: Vec<CommandResult>) -> Vec<CommandResult> {
    let mut seen: HashSet<String> = HashSet::with_capacity(results.len());
    results
        .into_iter()
        .filter(|result| seen.insert(result.display().to_string()))
        .collect()
}

fn sample<R: Rng + ?Sized>(
    mut results: Vec<CommandResult>,
    amount: usize,
    rng: &mut R,
) -> Vec<CommandResult> {
    results.shuffle(rng);
    results.truncate(amount);
    results
}
