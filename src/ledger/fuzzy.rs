//! Normalized edit-distance string similarity, scored 0-100.
//!
//! All scorers are built on the indel distance (insertions and deletions
//! only, equivalently the longest common subsequence):
//!
//! `ratio = 100 * 2 * lcs(a, b) / (len(a) + len(b))`
//!
//! [`weighted_ratio`] is what catalog lookups use. It preprocesses both
//! strings (lowercase, punctuation to spaces), then takes the best of the
//! plain ratio, the token-order-insensitive ratios and, when one string is
//! much longer than the other, the scaled partial (substring) ratios.

/// Weight applied to token based scores so an exact ratio wins ties.
const UNBASE_SCALE: f64 = 0.95;
/// Length ratio at which substring matching is considered.
const PARTIAL_MIN_LEN_RATIO: f64 = 1.5;
/// Length ratio beyond which substring scores are heavily discounted.
const PARTIAL_LONG_LEN_RATIO: f64 = 8.0;

/// Lowercase, map every non-alphanumeric char to a space and trim.
pub fn preprocess(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    mapped.to_lowercase().trim().to_string()
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    100.0 * (2 * lcs_len(a, b)) as f64 / total as f64
}

fn raw_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

fn raw_partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }
    let n = short.len();
    let mut best = 0.0f64;
    // Windows hanging off either end of the longer string count too
    for k in 1..n {
        best = best.max(ratio_chars(&short, &long[..k]));
        best = best.max(ratio_chars(&short, &long[long.len() - k..]));
    }
    for start in 0..=(long.len() - n) {
        best = best.max(ratio_chars(&short, &long[start..start + n]));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(s: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens
}

fn token_sort_join(s: &str) -> String {
    sorted_tokens(s).join(" ")
}

/// Intersection plus per-side remainders, each joined sorted.
fn token_set_parts(a: &str, b: &str) -> (String, String, String) {
    let mut ta = sorted_tokens(a);
    let mut tb = sorted_tokens(b);
    ta.dedup();
    tb.dedup();
    let sect: Vec<&str> = ta.iter().copied().filter(|t| tb.contains(t)).collect();
    let only_a: Vec<&str> = ta.iter().copied().filter(|t| !sect.contains(t)).collect();
    let only_b: Vec<&str> = tb.iter().copied().filter(|t| !sect.contains(t)).collect();
    let sect = sect.join(" ");
    let combined_a = format!("{} {}", sect, only_a.join(" ")).trim().to_string();
    let combined_b = format!("{} {}", sect, only_b.join(" ")).trim().to_string();
    (sect, combined_a, combined_b)
}

fn token_set_with(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let (sect, combined_a, combined_b) = token_set_parts(a, b);
    scorer(&sect, &combined_a)
        .max(scorer(&sect, &combined_b))
        .max(scorer(&combined_a, &combined_b))
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Plain indel similarity of the raw strings.
pub fn ratio(a: &str, b: &str) -> u8 {
    to_score(raw_ratio(a, b))
}

/// Best ratio of the shorter string against any same-length window of the longer.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_partial_ratio(a, b))
}

/// Ratio after sorting whitespace separated tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_ratio(
        &token_sort_join(&preprocess(a)),
        &token_sort_join(&preprocess(b)),
    ))
}

/// Ratio over the shared token set and each side's leftovers.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    to_score(token_set_with(&preprocess(a), &preprocess(b), raw_ratio))
}

/// Combined score used for catalog resolution.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let p1 = preprocess(a);
    let p2 = preprocess(b);
    let (l1, l2) = (p1.chars().count(), p2.chars().count());
    if l1 == 0 || l2 == 0 {
        return 0;
    }

    let base = raw_ratio(&p1, &p2);
    let len_ratio = l1.max(l2) as f64 / l1.min(l2) as f64;

    if len_ratio < PARTIAL_MIN_LEN_RATIO {
        let sort = raw_ratio(&token_sort_join(&p1), &token_sort_join(&p2)) * UNBASE_SCALE;
        let set = token_set_with(&p1, &p2, raw_ratio) * UNBASE_SCALE;
        return to_score(base.max(sort).max(set));
    }

    let partial_scale = if len_ratio > PARTIAL_LONG_LEN_RATIO { 0.6 } else { 0.9 };
    let partial = raw_partial_ratio(&p1, &p2) * partial_scale;
    let partial_sort = raw_partial_ratio(&token_sort_join(&p1), &token_sort_join(&p2))
        * UNBASE_SCALE
        * partial_scale;
    let partial_set = token_set_with(&p1, &p2, raw_partial_ratio) * UNBASE_SCALE * partial_scale;
    to_score(base.max(partial).max(partial_sort).max(partial_set))
}

/// Highest scoring choice; the first one wins on equal scores.
pub fn best_match<'a, I>(query: &str, choices: I) -> Option<(&'a str, u8)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, u8)> = None;
    for choice in choices {
        let score = weighted_ratio(query, choice);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((choice, score)),
        }
    }
    best
}
