// src/services/matcher.rs

use std::collections::BTreeSet;

/// The candidate that won a `best_match` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
	pub name: String,
	/// Similarity on a 0-100 scale.
	pub score: u8,
	/// Position of the winner in the candidate list.
	pub index: usize,
}

/// Picks the catalog name closest to a user supplied one.
pub trait NameMatcher {
	/// Similarity between `query` and `candidate`, 0-100. Identical strings
	/// score 100.
	fn score(&self, query: &str, candidate: &str) -> u8;

	/// Highest scoring candidate, if its score reaches `threshold`.
	///
	/// Ties go to the earliest candidate. An empty list never matches, and a
	/// threshold above 100 can never be reached.
	fn best_match(&self, query: &str, candidates: &[&str], threshold: u8) -> Option<MatchResult> {
		let mut best: Option<(usize, u8)> = None;

		for (index, candidate) in candidates.iter().enumerate() {
			let score = self.score(query, candidate);
			if best.map_or(true, |(_, top)| score > top) {
				best = Some((index, score));
			}
			if score == 100 {
				break;
			}
		}

		best.filter(|(_, score)| *score >= threshold)
			.map(|(index, score)| MatchResult {
				name: candidates[index].to_string(),
				score,
				index,
			})
	}
}

/// Token based fuzzy matcher in the spirit of a weighted ratio: the best of a
/// plain edit-distance ratio, a token-sorted ratio and a token-set ratio, with
/// substring (partial) variants once the two strings differ a lot in length.
///
/// Comparison is case-insensitive and ignores punctuation and token order.
/// Strings that only differ in case or punctuation score 99 so that a
/// verbatim candidate always outranks them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetMatcher;

impl TokenSetMatcher {
	pub fn new() -> Self {
		Self
	}
}

impl NameMatcher for TokenSetMatcher {
	fn score(&self, query: &str, candidate: &str) -> u8 {
		if query == candidate {
			return 100;
		}

		let a = preprocess(query);
		let b = preprocess(candidate);
		if a.is_empty() || b.is_empty() {
			return 0;
		}

		let score = weighted_ratio(&a, &b).round().clamp(0.0, 100.0) as u8;
		score.min(99)
	}
}

const UNBASE_SCALE: f64 = 0.95;

fn weighted_ratio(a: &str, b: &str) -> f64 {
	let base = ratio(a, b);

	let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
	let len_ratio = len_a.max(len_b) / len_a.min(len_b);

	if len_ratio < 1.5 {
		let sorted = token_sort(a, b, false) * UNBASE_SCALE;
		let set = token_set(a, b, false) * UNBASE_SCALE;
		return base.max(sorted).max(set);
	}

	let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
	let partial = partial_ratio(a, b) * partial_scale;
	let sorted = token_sort(a, b, true) * UNBASE_SCALE * partial_scale;
	let set = token_set(a, b, true) * UNBASE_SCALE * partial_scale;
	base.max(partial).max(sorted).max(set)
}

/// Lowercases, turns anything but letters and digits into separators and
/// collapses whitespace.
fn preprocess(s: &str) -> String {
	s.chars()
		.map(|c| if c.is_alphanumeric() { c } else { ' ' })
		.collect::<String>()
		.to_lowercase()
		.split_whitespace()
		.collect::<Vec<_>>()
		.join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
	strsim::normalized_levenshtein(a, b) * 100.0
}

/// Best ratio of the shorter string against every equally long window of the longer one.
fn partial_ratio(a: &str, b: &str) -> f64 {
	let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
	let short_len = short.chars().count();
	if short_len == 0 {
		return 0.0;
	}

	let long_chars: Vec<char> = long.chars().collect();
	if long_chars.len() == short_len {
		return ratio(short, long);
	}

	let mut best: f64 = 0.0;
	for window in long_chars.windows(short_len) {
		let window: String = window.iter().collect();
		best = best.max(ratio(short, &window));
		if best >= 100.0 {
			break;
		}
	}
	best
}

fn compare(a: &str, b: &str, partial: bool) -> f64 {
	if partial {
		partial_ratio(a, b)
	} else {
		ratio(a, b)
	}
}

fn token_sort(a: &str, b: &str, partial: bool) -> f64 {
	compare(&sorted_tokens(a), &sorted_tokens(b), partial)
}

fn sorted_tokens(s: &str) -> String {
	let mut tokens: Vec<&str> = s.split_whitespace().collect();
	tokens.sort_unstable();
	tokens.join(" ")
}

/// Compares the shared tokens against each side's full token set, so extra
/// words on one side (versions, editions) cost little.
fn token_set(a: &str, b: &str, partial: bool) -> f64 {
	let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
	let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

	let shared = join(tokens_a.intersection(&tokens_b));
	let only_a = join(tokens_a.difference(&tokens_b));
	let only_b = join(tokens_b.difference(&tokens_a));

	let combined_a = format!("{} {}", shared, only_a).trim().to_string();
	let combined_b = format!("{} {}", shared, only_b).trim().to_string();

	compare(&shared, &combined_a, partial)
		.max(compare(&shared, &combined_b, partial))
		.max(compare(&combined_a, &combined_b, partial))
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
	tokens.copied().collect::<Vec<_>>().join(" ")
}
