//! Near-duplicate removal.
//!
//! Two articles are the same story when their titles or their bodies are more
//! similar than the configured threshold. Similarity is the gestalt
//! (Ratcliff/Obershelp) ratio `2·M / (|a| + |b|)`, where `M` counts the
//! characters in the recursively found longest common blocks.

use crate::models::Article;
use std::collections::HashMap;
use tracing::debug;

/// Keep articles in order, dropping any whose title or content is too close to
/// an article already kept.
pub fn deduplicate(articles: Vec<Article>, threshold: f64) -> Vec<Article> {
    let mut unique: Vec<Article> = Vec::with_capacity(articles.len());
    for candidate in articles {
        let duplicate_of = unique.iter().find(|kept| {
            similarity(&candidate.title, &kept.title) > threshold
                || similarity(&candidate.content, &kept.content) > threshold
        });
        match duplicate_of {
            Some(kept) => {
                debug!(title = %candidate.title, kept = %kept.title, "Dropping near-duplicate");
            }
            None => unique.push(candidate),
        }
    }
    unique
}

/// Case-insensitive similarity ratio in `[0, 1]`.
///
/// Symmetric: the inputs are matched in a fixed (lexicographic) order.
/// Two empty strings are identical (1.0); an empty string against a non-empty
/// one scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let (first, second) = if a <= b { (&a, &b) } else { (&b, &a) };
    let matched = SequenceMatcher::new(first, second).matching_chars();
    2.0 * matched as f64 / total as f64
}

/// Longest-common-block matcher over two char sequences.
struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions in `b` of each char, excluding popular chars.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, ch) in b.iter().enumerate() {
            b2j.entry(*ch).or_default().push(j);
        }
        // Chars making up more than 1% of a long `b` cannot seed a match.
        if b.len() >= 200 {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b2j }
    }

    /// Total size of all matching blocks.
    fn matching_chars(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        matched
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given ranges, earliest
    /// in `a` (then `b`) on ties.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(ch) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular chars never seed a block but may extend one.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi && best_j + best_k < bhi && a[best_i + best_k] == b[best_j + best_k] {
            best_k += 1;
        }
        (best_i, best_j, best_k)
    }
}
