//! Bigram similarity between file names and episode titles.

use std::collections::HashMap;

/// Sorensen-Dice coefficient over character bigrams.
///
/// Whitespace is ignored and comparison is case-sensitive, so callers that
/// want case folding must do it themselves. Empty input scores `0.0`.
pub fn score(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    // strsim measures length in bytes, which only matches the bigram count for ascii
    if a.is_ascii() && b.is_ascii() {
        return strsim::sorensen_dice(a, b);
    }
    char_dice(a, b)
}

fn char_dice(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_default() += 1;
    }

    let mut shared = 0;
    for pair in b.windows(2) {
        match bigrams.get_mut(&(pair[0], pair[1])) {
            Some(count) if *count > 0 => {
                *count -= 1;
                shared += 1;
            }
            _ => {}
        }
    }

    (2 * shared) as f64 / (a.len() + b.len() - 2) as f64
}
