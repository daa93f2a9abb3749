//! Name similarity for "did you mean" hints.
//!
//! The score is the matching-blocks ratio `2 * M / T`, where `M` is the number
//! of characters covered by the longest common block plus, recursively, the
//! blocks to its left and right, and `T` is the combined length of both names.

/// Minimum ratio for a candidate to be offered as a suggestion.
pub const SUGGESTION_CUTOFF: f64 = 0.5;

/// Similarity of two names in `[0.0, 1.0]`. Two empty names are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Best candidate scoring at least `cutoff`; on equal scores the
/// lexicographically greatest name wins, independent of candidate order.
pub fn closest_match<'a, I>(word: &str, candidates: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = ratio(word, candidate);
        if score < cutoff {
            continue;
        }
        let better = match best {
            None => true,
            Some((held, best_score)) => score > best_score || (score == best_score && candidate > held),
        };
        if better {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Longest common block as `(start_in_a, start_in_b, len)`, earliest in `a` first.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                cur[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = cur;
    }
    best
}
