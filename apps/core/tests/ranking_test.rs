use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use palette_core::model::{Command, CommandResult, Icon, ResultTemplate, Source};
use palette_core::ranking::{rank_with_rng, RESULTS_MAX};

fn result(display: &str, scope: &str, guarantee: bool) -> CommandResult {
    let mut template = ResultTemplate::new(Icon::new("x"), display);
    template.guarantee = guarantee;
    let command = Arc::new(Command::new(display, scope, template.clone()));
    CommandResult::new(template, Source::Command(command))
}

fn displays(results: &[CommandResult]) -> Vec<&str> {
    results.iter().map(CommandResult::display).collect()
}

#[test]
fn never_returns_more_than_the_cap() {
    let candidates: Vec<CommandResult> = (0..40)
        .map(|i| result(&format!("Go to Report {i}"), "global", false))
        .collect();

    for input in ["", "report", "go to"] {
        let ranked = rank_with_rng(candidates.clone(), input, &mut StdRng::seed_from_u64(3));
        assert!(ranked.len() <= RESULTS_MAX, "input {input:?} gave {}", ranked.len());
    }
}

#[test]
fn guaranteed_results_precede_fuzzy_matches_in_the_same_scope() {
    let ranked = rank_with_rng(
        vec![
            result("Go to Insights", "global", false),
            result("= 4", "global", true),
        ],
        "insights",
        &mut StdRng::seed_from_u64(5),
    );
    assert_eq!(displays(&ranked), vec!["= 4", "Go to Insights"]);
}

#[test]
fn guaranteed_results_survive_non_matching_input() {
    let ranked = rank_with_rng(
        vec![result("= 12", "global", true), result("Log Out", "global", false)],
        "6 * 2",
        &mut StdRng::seed_from_u64(5),
    );
    assert_eq!(displays(&ranked), vec!["= 12"]);
}

#[test]
fn fuzzy_slots_shrink_by_guaranteed_count() {
    let mut candidates: Vec<CommandResult> = (0..3)
        .map(|i| result(&format!("= {i}"), "global", true))
        .collect();
    candidates.extend((0..10).map(|i| result(&format!("Go to Team {i}"), "global", false)));

    let ranked = rank_with_rng(candidates, "team", &mut StdRng::seed_from_u64(9));
    assert_eq!(ranked.len(), RESULTS_MAX);
    assert_eq!(ranked.iter().filter(|r| r.is_guaranteed()).count(), 3);
}

#[test]
fn scene_results_come_before_global_ones() {
    let ranked = rank_with_rng(
        vec![
            result("Go to Insights", "global", false),
            result("Save Insight", "Insights", false),
        ],
        "insight",
        &mut StdRng::seed_from_u64(1),
    );
    assert_eq!(ranked[0].scope(), "Insights");
    assert_eq!(ranked[1].scope(), "global");
}

#[test]
fn empty_input_sample_is_reproducible_with_a_seed() {
    let candidates: Vec<CommandResult> = (0..20)
        .map(|i| result(&format!("Command {i}"), "global", false))
        .collect();

    let first = rank_with_rng(candidates.clone(), "", &mut StdRng::seed_from_u64(21));
    let second = rank_with_rng(candidates, "", &mut StdRng::seed_from_u64(21));
    assert_eq!(displays(&first), displays(&second));
    assert_eq!(first.len(), RESULTS_MAX);
}

#[test]
fn reseeding_reshuffles_only_the_sampled_tail() {
    let mut candidates = vec![
        result("= 42", "Calculator", true),
        result("Open https://example.com", "Open URLs", true),
    ];
    candidates.extend((0..20).map(|i| result(&format!("Command {i}"), "Insights", false)));

    let baseline = rank_with_rng(candidates.clone(), "", &mut StdRng::seed_from_u64(0));
    assert_eq!(&displays(&baseline)[..2], ["= 42", "Open https://example.com"]);

    let mut tail_changed = false;
    for seed in 1..20 {
        let ranked = rank_with_rng(candidates.clone(), "", &mut StdRng::seed_from_u64(seed));
        assert_eq!(ranked.len(), RESULTS_MAX);
        assert_eq!(displays(&ranked)[..2], displays(&baseline)[..2]);
        tail_changed |= displays(&ranked)[2..] != displays(&baseline)[2..];
    }
    assert!(tail_changed, "every seed sampled the same tail");
}
