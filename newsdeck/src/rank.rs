use std::cmp::Ordering;

use crate::types::Article;

/// Sort key for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    Relevance,
    Date,
    Category,
}

/// Sort direction. `Desc` keeps each key's natural ordering; `Asc` inverts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Return a sorted copy of `articles`. Pure and stable: the input is never
/// mutated and ties preserve their original relative order.
///
/// Natural orderings before `order` is applied:
/// - relevance: higher `relevance_score` first (missing scores count as 0)
/// - date: newest `publish_time` first (missing/unparseable count as epoch)
/// - category: lexicographic ascending (missing counts as empty string)
pub fn rank(articles: &[Article], key: SortKey, order: SortOrder) -> Vec<Article> {
    let mut sorted = articles.to_vec();
    sorted.sort_by(|a, b| {
        let natural = match key {
            SortKey::Relevance => {
                let score_a = a.relevance_score.unwrap_or(0.0);
                let score_b = b.relevance_score.unwrap_or(0.0);
                score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
            }
            SortKey::Date => b.publish_instant().cmp(&a.publish_instant()),
            SortKey::Category => {
                let cat_a = a.category.as_deref().unwrap_or("");
                let cat_b = b.category.as_deref().unwrap_or("");
                cat_a.cmp(cat_b)
            }
        };
        match order {
            SortOrder::Desc => natural,
            SortOrder::Asc => natural.reverse(),
        }
    });
    sorted
}
