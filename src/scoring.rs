//! Topical scoring and ranking.
//!
//! An article's score is a source bonus plus one point per keyword hit in
//! each keyword family (launches, AI entities, metrics, controversy). Scoring
//! is a pure function of the article and the [`ScoringRules`].

use crate::config::ScoringRules;
use crate::models::Article;
use std::ops::Range;

/// Score an article against the rules.
///
/// Matching is a case-insensitive substring search over the title and content.
/// Each keyword counts at most once. A keyword found only inside a longer
/// keyword of the same family (e.g. "preview" within "developer preview")
/// is not counted on its own.
///
/// # Arguments
///
/// * `article` - The article to score; its title and content are searched
/// * `rules` - Keyword families, priority sources and the source bonus
///
/// # Returns
///
/// The sum of keyword hits over all four families, plus `source_bonus` when
/// the article's source is a priority source.
///
/// # Examples
///
/// ```ignore
/// // "OpenAI launches new developer preview of GPT-5 ... a million users."
/// // from techcrunch.com: launch 2 + AI 2 + metric 2 + source bonus 3
/// assert_eq!(score_article(&article, &ScoringRules::default()), 9);
/// ```
pub fn score_article(article: &Article, rules: &ScoringRules) -> u32 {
    let haystack = format!("{}\n{}", article.title, article.content).to_lowercase();
    let bonus = if rules.priority_sources.iter().any(|s| s == &article.source) {
        rules.source_bonus
    } else {
        0
    };
    bonus
        + rules
            .keyword_sets()
            .iter()
            .map(|set| keyword_hits(&haystack, set))
            .sum::<u32>()
}

/// Number of distinct keywords of one family present in `haystack`, which
/// must already be lowercase.
pub fn keyword_hits(haystack: &str, keywords: &[String]) -> u32 {
    let keywords: Vec<String> = keywords.iter().map(|kw| kw.to_lowercase()).collect();
    let mut hits = 0;
    for (idx, kw) in keywords.iter().enumerate() {
        if kw.is_empty() {
            continue;
        }
        let covered: Vec<Range<usize>> = keywords
            .iter()
            .enumerate()
            .filter(|(other_idx, other)| {
                *other_idx != idx && other.len() > kw.len() && other.contains(kw.as_str())
            })
            .flat_map(|(_, other)| occurrences(haystack, other))
            .collect();
        let standalone = occurrences(haystack, kw).any(|found| {
            !covered
                .iter()
                .any(|span| span.start <= found.start && found.end <= span.end)
        });
        if standalone {
            hits += 1;
        }
    }
    hits
}

/// Byte ranges of every (possibly overlapping) occurrence of `needle`.
fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = Range<usize>> + 'a {
    let mut from = 0;
    std::iter::from_fn(move || {
        let start = from + haystack.get(from..)?.find(needle)?;
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
        Some(start..start + needle.len())
    })
}

/// Sort by score (highest first), keeping discovery order among equal scores,
/// and keep the top `limit`.
///
/// # Arguments
///
/// * `articles` - Deduplicated articles in discovery order
/// * `rules` - Scoring rules passed through to [`score_article`]
/// * `limit` - Maximum number of articles to return
///
/// # Returns
///
/// At most `limit` articles, highest score first.
pub fn rank(articles: Vec<Article>, rules: &ScoringRules, limit: usize) -> Vec<Article> {
    let mut scored: Vec<(u32, Article)> = articles
        .into_iter()
        .map(|article| (score_article(&article, rules), article))
        .collect();
    // `sort_by` is stable, so ties keep their relative order.
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));
    scored.truncate(limit);
    scored.into_iter().map(|(_, article)| article).collect()
}
