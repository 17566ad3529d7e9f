//! Approximate string similarity on a 0-100 scale.
//!
//! `ratio` is the normalized Indel similarity `2 * LCS / (|a| + |b|)`.
//! `partial_ratio` scores the shorter string against its best-aligned
//! window in the longer one, so "jon smith" still scores high against
//! "dr john smith md".

/// Length of the longest common subsequence
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    100.0 * (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Whole-string similarity
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    indel_ratio(&a, &b)
}

/// Best similarity of the shorter string against any window of the longer one.
/// Windows include partial overlaps at either end. Empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }

    let n = short.len();
    let m = long.len();
    let mut best = 0.0f64;

    let full = (0..=m - n).map(|start| &long[start..start + n]);
    let prefixes = (1..n).map(|len| &long[..len]);
    let suffixes = (1..n).map(|len| &long[m - len..]);

    for window in full.chain(prefixes).chain(suffixes) {
        best = best.max(indel_ratio(&short, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}
