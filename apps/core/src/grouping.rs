use indexmap::IndexMap;

use crate::model::CommandResult;

#[derive(Debug, Clone)]
pub struct ResultGroup {
    pub scope: String,
    pub results: Vec<CommandResult>,
}

/// Splits ranked results by scope in first-seen order and numbers them
/// `0..n` across all groups.
///
/// An active flow's scope always gets a group, even an empty one.
pub fn group_results(results: Vec<CommandResult>, flow_scope: Option<&str>) -> Vec<ResultGroup> {
    let mut grouped: IndexMap<String, Vec<CommandResult>> = IndexMap::new();
    if let Some(scope) = flow_scope {
        grouped.insert(scope.to_string(), Vec::new());
    }
    for result in results {
        grouped
            .entry(result.scope().to_string())
            .or_default()
            .push(result);
    }

    let mut rolling_index = 0;
    grouped
        .into_iter()
        .map(|(scope, mut results)| {
            for result in &mut results {
                result.index = Some(rolling_index);
                rolling_index += 1;
            }
            ResultGroup { scope, results }
        })
        .collect()
}

pub fn total_results(groups: &[ResultGroup]) -> usize {
    groups.iter().map(|group| group.results.len()).sum()
}

pub fn result_at(groups: &[ResultGroup], index: usize) -> Option<&CommandResult> {
    groups
        .iter()
        .flat_map(|group| group.results.iter())
        .find(|result| result.index == Some(index))
}

pub fn clamp_index(index: usize, total: usize) -> usize {
    index.min(total.saturating_sub(1))
}

pub fn next_selection_index(current: usize, len: usize, direction: i32) -> usize {
    if len == 0 {
        return 0;
    }

    let max = len - 1;
    if direction < 0 {
        current.saturating_sub(1).min(max)
    } else if direction > 0 {
        (current + 1).min(max)
    } else {
        current.min(max)
    }
}
