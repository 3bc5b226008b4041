//! Partial-ratio fuzzy scoring

use rapidfuzz::fuzz;

/// Best alignment score of the shorter string against any substring of the
/// longer one, in `[0.0, 1.0]`.
///
/// Windows of the shorter string's length are slid across the longer string,
/// including the partial windows hanging off either end. Blank inputs score 0.
pub fn partial_ratio(s1: &str, s2: &str) -> f64 {
    if s1.trim().is_empty() || s2.trim().is_empty() {
        return 0.0;
    }

    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.len() < b.len() {
        best_window(&a, &b)
    } else if b.len() < a.len() {
        best_window(&b, &a)
    } else {
        best_window(&a, &b).max(best_window(&b, &a))
    }
}

fn best_window(needle: &[char], haystack: &[char]) -> f64 {
    let n = needle.len();
    let h = haystack.len();
    let score = |window: &[char]| fuzz::ratio(needle.iter().copied(), window.iter().copied());

    let mut best: f64 = 0.0;

    for end in 1..n {
        best = best.max(score(&haystack[..end]));
    }

    for start in 0..=(h - n) {
        best = best.max(score(&haystack[start..start + n]));
        if best >= 1.0 {
            return 1.0;
        }
    }

    for start in (h - n + 1)..h {
        best = best.max(score(&haystack[start..]));
    }

    best
}
