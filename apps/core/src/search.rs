/// Scores above this are not considered a match.
pub const MATCH_THRESHOLD: f64 = 0.6;

/// How many characters into a field a match may start before the location
/// penalty alone reaches a full error.
const LOCATION_DISTANCE: f64 = 100.0;

/// Something with one or more text fields to fuzzy-search.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub index: usize,
    pub score: f64,
}

pub fn normalize_for_search(input: &str) -> String {
    input
        .split_whitespace()
        .flat_map(|word| word.chars().flat_map(char::to_lowercase).chain(Some(' ')))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Scores every item against `query` and returns the matches best-first.
///
/// Scores are distances: 0.0 is an exact match at the start of a field. An
/// item's score is the best over its fields. Ties keep input order.
pub fn fuzzy_search<T: Searchable>(items: &[T], query: &str) -> Vec<SearchHit> {
    let normalized_query = normalize_for_search(query);
    if normalized_query.is_empty() || items.is_empty() {
        return Vec::new();
    }
    let pattern: Vec<char> = normalized_query.chars().collect();

    let mut hits: Vec<SearchHit> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            item.search_fields()
                .into_iter()
                .filter_map(|field| {
                    score_field(&normalize_for_search(field), &normalized_query, &pattern)
                })
                .min_by(|a, b| a.total_cmp(b))
                .map(|score| SearchHit { index, score })
        })
        .collect();

    hits.sort_by(|a, b| a.score.total_cmp(&b.score).then_with(|| a.index.cmp(&b.index)));
    hits
}

fn score_field(normalized_field: &str, normalized_query: &str, pattern: &[char]) -> Option<f64> {
    if normalized_field.is_empty() {
        return None;
    }

    if let Some(byte_position) = normalized_field.find(normalized_query) {
        let position = normalized_field[..byte_position].chars().count();
        return Some(position as f64 / LOCATION_DISTANCE).filter(|s| *s <= MATCH_THRESHOLD);
    }

    let text: Vec<char> = normalized_field.chars().collect();
    // Every pattern char beyond the field's length costs at least one edit.
    let unavoidable = pattern.len().saturating_sub(text.len());
    if unavoidable as f64 / pattern.len() as f64 > MATCH_THRESHOLD {
        return None;
    }
    approximate_alignments(&text, pattern)
        .into_iter()
        .map(|(errors, start)| {
            errors as f64 / pattern.len() as f64 + start as f64 / LOCATION_DISTANCE
        })
        .min_by(|a, b| a.total_cmp(b))
        .filter(|score| *score <= MATCH_THRESHOLD)
}

/// For every end position in `text`, the fewest edits needed to turn some
/// substring ending there into `pattern`, with where that substring starts.
fn approximate_alignments(text: &[char], pattern: &[char]) -> Vec<(usize, usize)> {
    let n = text.len();
    let mut prev_cost: Vec<usize> = vec![0; n + 1];
    let mut prev_start: Vec<usize> = (0..=n).collect();
    let mut cur_cost: Vec<usize> = vec![0; n + 1];
    let mut cur_start: Vec<usize> = vec![0; n + 1];

    for (i, pattern_char) in pattern.iter().enumerate() {
        cur_cost[0] = i + 1;
        cur_start[0] = 0;
        for j in 1..=n {
            let substitute = prev_cost[j - 1] + usize::from(*pattern_char != text[j - 1]);
            let skip_pattern = prev_cost[j] + 1;
            let skip_text = cur_cost[j - 1] + 1;

            let (cost, start) = if substitute <= skip_pattern && substitute <= skip_text {
                (substitute, prev_start[j - 1])
            } else if skip_pattern <= skip_text {
                (skip_pattern, prev_start[j])
            } else {
                (skip_text, cur_start[j - 1])
            };
            cur_cost[j] = cost;
            cur_start[j] = start;
        }
        std::mem::swap(&mut prev_cost, &mut cur_cost);
        std::mem::swap(&mut prev_start, &mut cur_start);
    }

    (1..=n).map(|j| (prev_cost[j], prev_start[j])).collect()
}
