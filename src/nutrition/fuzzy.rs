//! Approximate name matching over the nutrition dataset.
//!
//! Scores follow the bitap formulation: `errors / pattern_len` plus a
//! proximity penalty of `|match_location - location| / distance`. Lower is
//! better; candidates scoring above the threshold are dropped. Field length
//! weighs in through a token-count norm so short names beat long ones that
//! contain the same words.

use std::collections::HashMap;

pub const DEFAULT_THRESHOLD: f64 = 0.3;
const DEFAULT_DISTANCE: usize = 100;
const MAX_BITS: usize = 32;
const MIN_SCORE: f64 = 0.001;
const EPSILON: f64 = f64::EPSILON;

#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    pub threshold: f64,
    pub location: usize,
    pub distance: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            location: 0,
            distance: DEFAULT_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Position of the item in the indexed collection.
    pub index: usize,
    pub score: f64,
}

#[derive(Debug)]
struct Entry {
    index: usize,
    text: Vec<char>,
    norm: f64,
}

/// Index over one text field per item. Built once, queried read-only.
#[derive(Debug)]
pub struct FuzzyIndex {
    entries: Vec<Entry>,
    options: MatchOptions,
}

impl FuzzyIndex {
    pub fn build<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        Self::with_options(names, MatchOptions::default())
    }

    /// Items whose field is missing or blank are not indexed and never match.
    pub fn with_options<'a, I>(names: I, options: MatchOptions) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let entries = names
            .into_iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let name = name?;
                let tokens = name.split(' ').filter(|t| !t.is_empty()).count();
                if tokens == 0 {
                    return None;
                }
                Some(Entry {
                    index,
                    text: name.to_lowercase().chars().collect(),
                    norm: field_norm(tokens),
                })
            })
            .collect();
        Self { entries, options }
    }

    /// Matches sorted best first; equal scores keep collection order.
    pub fn search(&self, query: &str) -> Vec<Hit> {
        if query.is_empty() {
            return Vec::new();
        }
        let pattern = Pattern::new(&query.to_lowercase(), self.options);

        let mut hits: Vec<Hit> = self
            .entries
            .iter()
            .filter_map(|e| {
                let score = pattern.score(&e.text)?;
                let score = if score == 0.0 { EPSILON } else { score };
                Some(Hit {
                    index: e.index,
                    score: score.powf(e.norm),
                })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.index.cmp(&b.index)));
        hits
    }
}

fn field_norm(tokens: usize) -> f64 {
    let n = 1.0 / (tokens as f64).sqrt();
    (n * 1000.0).round() / 1000.0
}

struct Chunk {
    chars: Vec<char>,
    alphabet: HashMap<char, u64>,
    start: usize,
}

struct Pattern {
    chars: Vec<char>,
    chunks: Vec<Chunk>,
    options: MatchOptions,
}

impl Pattern {
    fn new(pattern: &str, options: MatchOptions) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let len = chars.len();
        let mut chunks = Vec::new();

        if len <= MAX_BITS {
            chunks.push(Chunk::new(&chars, 0));
        } else {
            let remainder = len % MAX_BITS;
            let end = len - remainder;
            let mut i = 0;
            while i < end {
                chunks.push(Chunk::new(&chars[i..i + MAX_BITS], i));
                i += MAX_BITS;
            }
            if remainder > 0 {
                let start = len - MAX_BITS;
                chunks.push(Chunk::new(&chars[start..], start));
            }
        }

        Self {
            chars,
            chunks,
            options,
        }
    }

    /// `None` when no chunk matches within the threshold.
    fn score(&self, text: &[char]) -> Option<f64> {
        if self.chars == text {
            return Some(0.0);
        }
        let mut total = 0.0;
        let mut matched = false;
        for chunk in &self.chunks {
            let (is_match, score) = bitap(
                text,
                chunk,
                self.options.location + chunk.start,
                self.options,
            );
            matched |= is_match;
            total += score;
        }
        matched.then(|| total / self.chunks.len() as f64)
    }
}

impl Chunk {
    fn new(chars: &[char], start: usize) -> Self {
        let len = chars.len();
        let mut alphabet = HashMap::new();
        for (i, c) in chars.iter().enumerate() {
            *alphabet.entry(*c).or_insert(0u64) |= 1u64 << (len - i - 1);
        }
        Self {
            chars: chars.to_vec(),
            alphabet,
            start,
        }
    }
}

fn compute_score(
    pattern_len: usize,
    errors: usize,
    current: usize,
    expected: usize,
    distance: usize,
) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    let proximity = current.abs_diff(expected);
    if distance == 0 {
        return if proximity == 0 { accuracy } else { 1.0 };
    }
    accuracy + proximity as f64 / distance as f64
}

fn find_from(text: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if pattern.len() > text.len() {
        return None;
    }
    (from..=text.len() - pattern.len()).find(|&k| text[k..k + pattern.len()] == *pattern)
}

fn bitap(text: &[char], chunk: &Chunk, location: usize, opts: MatchOptions) -> (bool, f64) {
    let pattern = &chunk.chars;
    let pattern_len = pattern.len();
    let text_len = text.len();
    let distance = opts.distance;
    let expected = location.min(text_len);

    let mut threshold = opts.threshold;

    // exact occurrences tighten the threshold before the fuzzy pass
    let mut from = expected;
    while let Some(index) = find_from(text, pattern, from) {
        let score = compute_score(pattern_len, 0, index, expected, distance);
        threshold = threshold.min(score);
        from = index + pattern_len;
    }

    let mask: u64 = 1 << (pattern_len - 1);
    let mut best_location: Option<usize> = None;
    let mut final_score = 1.0;
    let mut bin_max = pattern_len + text_len;
    let mut last_bits: Vec<u64> = Vec::new();

    for errors in 0..pattern_len {
        // widest window that could still beat the threshold at this error count
        let mut bin_min = 0;
        let mut bin_mid = bin_max;
        while bin_min < bin_mid {
            let score = compute_score(pattern_len, errors, expected + bin_mid, expected, distance);
            if score <= threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid;
            }
            bin_mid = (bin_max - bin_min) / 2 + bin_min;
        }
        bin_max = bin_mid;

        let mut start = (expected + 1).saturating_sub(bin_mid).max(1);
        let finish = (expected + bin_mid).min(text_len) + pattern_len;

        let mut bits = vec![0u64; finish + 2];
        bits[finish + 1] = (1u64 << errors) - 1;

        let mut j = finish;
        while j >= start {
            let loc = j - 1;
            let char_match = text
                .get(loc)
                .and_then(|c| chunk.alphabet.get(c))
                .copied()
                .unwrap_or(0);

            bits[j] = ((bits[j + 1] << 1) | 1) & char_match;
            if errors > 0 {
                let next = last_bits.get(j + 1).copied().unwrap_or(0);
                let here = last_bits.get(j).copied().unwrap_or(0);
                bits[j] |= ((next | here) << 1) | 1 | next;
            }

            if bits[j] & mask != 0 {
                final_score = compute_score(pattern_len, errors, loc, expected, distance);
                if final_score <= threshold {
                    threshold = final_score;
                    best_location = Some(loc);
                    if loc <= expected {
                        break;
                    }
                    start = (2 * expected).saturating_sub(loc).max(1);
                }
            }
            j -= 1;
        }

        let next_floor = compute_score(pattern_len, errors + 1, expected, expected, distance);
        if next_floor > threshold {
            break;
        }
        last_bits = bits;
    }

    (best_location.is_some(), final_score.max(MIN_SCORE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> FuzzyIndex {
        FuzzyIndex::build(names.iter().map(|n| Some(*n)))
    }

    fn hit_indices(idx: &FuzzyIndex, q: &str) -> Vec<usize> {
        idx.search(q).into_iter().map(|h| h.index).collect()
    }

    #[test]
    fn tolerates_a_missing_letter() {
        let idx = index(&["Beef Liver", "Chicken Breast", "Apple"]);
        assert_eq!(hit_indices(&idx, "chiken"), vec![1]);
    }

    #[test]
    fn unrelated_query_matches_nothing() {
        let idx = index(&["Beef Liver", "Chicken Breast", "Apple"]);
        assert!(idx.search("zzqx").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let idx = index(&["Chicken Breast"]);
        assert_eq!(hit_indices(&idx, "CHICKEN"), vec![0]);
    }

    #[test]
    fn exact_name_is_best() {
        let idx = index(&["Chicken Breast Roasted", "Chicken Breast"]);
        let hits = idx.search("chicken breast");
        assert_eq!(hits[0].index, 1);
        assert!(hits[0].score < hits[1].score);
    }

    #[test]
    fn early_match_in_short_name_ranks_first() {
        let idx = index(&["Chicken Breast", "Breast of Turkey"]);
        assert_eq!(hit_indices(&idx, "breast"), vec![1, 0]);
    }

    #[test]
    fn ties_keep_collection_order() {
        let idx = index(&["Chicken Thigh", "Beef Liver", "Chicken Wing"]);
        let hits = idx.search("chicken");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits[0].index, 0);
        assert_eq!(hits[1].index, 2);
    }

    #[test]
    fn blank_and_missing_names_are_skipped() {
        let idx = FuzzyIndex::build(vec![None, Some("   "), Some("Rice")]);
        assert_eq!(idx.entries.len(), 1);
        assert_eq!(hit_indices(&idx, "rice"), vec![2]);
    }

    #[test]
    fn repeated_queries_are_stable() {
        let idx = index(&["Brown Rice", "White Rice", "Rice Cakes", "Wild Rice"]);
        assert_eq!(idx.search("rice"), idx.search("rice"));
    }

    #[test]
    fn long_patterns_are_chunked() {
        let name = "Cereals ready-to-eat, whole grain oat flakes with raisins";
        let idx = index(&["Apple", name]);
        assert_eq!(hit_indices(&idx, &name.to_lowercase()), vec![1]);
        assert_eq!(hit_indices(&idx, "cereals ready-to-eat, whole grain oat flakes"), vec![1]);
    }

    #[test]
    fn norm_is_rounded_inverse_sqrt() {
        assert_eq!(field_norm(1), 1.0);
        assert_eq!(field_norm(2), 0.707);
        assert_eq!(field_norm(4), 0.5);
    }
}
