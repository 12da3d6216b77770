use crate::types::config::TieBreak;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch<'c> {
    pub target: &'c str,
    pub score: f64,
}

/// Dice coefficient over character bigrams, ignoring whitespace.
///
/// Identical strings score 1.0. A string with fewer than two characters cannot form a
/// bigram and scores 0.0 against anything it is not equal to. Case is significant.
pub fn similarity(first: &str, second: &str) -> f64 {
    let first: Vec<char> = first.chars().filter(|c| !c.is_whitespace()).collect();
    let second: Vec<char> = second.chars().filter(|c| !c.is_whitespace()).collect();

    if first == second {
        return 1.0;
    }
    if first.len() < 2 || second.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in first.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for pair in second.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / (first.len() + second.len() - 2) as f64
}

/// Picks the highest-scoring candidate. Returns `None` for an empty candidate set.
pub fn best_match<'c>(
    query: &str,
    candidates: &[&'c str],
    tie_break: TieBreak,
) -> Option<BestMatch<'c>> {
    let mut best: Option<BestMatch<'c>> = None;
    for &target in candidates {
        let score = similarity(query, target);
        let replace = match best {
            None => true,
            Some(current) if score > current.score => true,
            Some(current) if score == current.score => {
                matches!(tie_break, TieBreak::Lexical) && target < current.target
            }
            Some(_) => false,
        };
        if replace {
            best = Some(BestMatch { target, score });
        }
    }
    best
}
