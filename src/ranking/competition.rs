use std::cmp::Ordering;

use crate::ranking::RankedEntry;

/// Assign competition ranks ("1, 1, 3") to items already sorted best-first.
///
/// The first item is rank 1. Each later item keeps the previous rank when its
/// score equals the previous score, otherwise takes its 1-based position.
pub fn assign_competition_ranks<T, S, F>(items: Vec<T>, score: F) -> Vec<RankedEntry<T>>
where
    S: PartialEq,
    F: Fn(&T) -> S,
{
    let mut ranked: Vec<RankedEntry<T>> = Vec::with_capacity(items.len());
    let mut prev: Option<S> = None;
    let mut rank = 0;

    for (i, item) in items.into_iter().enumerate() {
        let current = score(&item);
        if prev.as_ref() != Some(&current) {
            rank = i + 1;
        }
        prev = Some(current);
        ranked.push(RankedEntry::new(rank, item));
    }

    ranked
}

/// Sort by score descending and assign competition ranks.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_by_score<T, S, F>(mut items: Vec<T>, score: F) -> Vec<RankedEntry<T>>
where
    S: PartialOrd,
    F: Fn(&T) -> S,
{
    items.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
    assign_competition_ranks(items, score)
}
