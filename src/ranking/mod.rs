pub mod competition;

pub use competition::{assign_competition_ranks, rank_by_score};

/// Podium marker for ranks 1-3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    First,
    Second,
    Third,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::First),
            2 => Some(Medal::Second),
            3 => Some(Medal::Third),
            _ => None,
        }
    }

    /// Discord emoji shortcode
    pub fn emoji(&self) -> &'static str {
        match self {
            Medal::First => ":first_place:",
            Medal::Second => ":second_place:",
            Medal::Third => ":third_place:",
        }
    }
}

/// Item with its 1-based competition rank
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<T> {
    pub rank: usize,
    pub item: T,
}

impl<T> RankedEntry<T> {
    pub fn new(rank: usize, item: T) -> Self {
        Self { rank, item }
    }

    pub fn medal(&self) -> Option<Medal> {
        Medal::for_rank(self.rank)
    }
}
