use palette_core::search::{fuzzy_search, Searchable, MATCH_THRESHOLD};

struct Entry {
    display: &'static str,
    synonyms: Vec<&'static str>,
}

impl Searchable for Entry {
    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.display)
            .chain(self.synonyms.iter().copied())
            .collect()
    }
}

fn entry(display: &'static str) -> Entry {
    Entry {
        display,
        synonyms: Vec::new(),
    }
}

#[test]
fn typo_query_returns_expected_match() {
    let items = vec![entry("Go to Retention"), entry("Go to Annotations")];
    let hits = fuzzy_search(&items, "retnetion");
    assert_eq!(hits[0].index, 0);
}

#[test]
fn every_hit_is_within_threshold() {
    let items = vec![
        entry("Go to Dashboards"),
        entry("Go to Insights"),
        entry("Log Out"),
        entry("Create Personal API Key"),
    ];
    let hits = fuzzy_search(&items, "insight");
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|hit| hit.score <= MATCH_THRESHOLD));
    assert_eq!(hits[0].index, 1);
}

#[test]
fn synonym_match_ranks_item() {
    let items = vec![
        entry("Go to People"),
        Entry {
            display: "Go to Experiments",
            synonyms: vec!["feature flags", "a/b tests"],
        },
    ];
    let hits = fuzzy_search(&items, "feature flags");
    assert_eq!(hits[0].index, 1);
    assert_eq!(hits[0].score, 0.0);
}

#[test]
fn query_case_is_ignored() {
    let items = vec![entry("Log Out")];
    let hits = fuzzy_search(&items, "LOG OUT");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 0.0);
}
