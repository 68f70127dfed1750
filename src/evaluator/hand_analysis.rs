use super::rank_groups::RankGroups;
use super::straight_info::StraightInfo;
use super::suit_info::SuitInfo;
use crate::cards::{Card, Rank};
use crate::evaluator::{Category, Evaluation, HandValue};

/// Pre-computed analysis of a 5-card hand.
/// Built once and shared by all category detectors.
#[derive(Debug, Clone)]
pub struct HandAnalysis {
    pub sorted_cards: [Card; 5],
    pub ranks: [Rank; 5],
    /// Raw rank counts array (kept for potential future use and debugging)
    #[allow(dead_code)]
    pub rank_counts: [u8; 15],
    pub rank_groups: RankGroups,
    pub suit_info: SuitInfo,
    pub straight_info: StraightInfo,
}

impl HandAnalysis {
    /// Analyze a 5-card hand, computing all properties needed for evaluation.
    pub fn new(cards: &[Card; 5]) -> Self {
        // Sort cards by rank descending, then by suit descending
        let mut sorted_cards = *cards;
        sorted_cards.sort_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));

        // Extract ranks
        let ranks = [
            sorted_cards[0].rank(),
            sorted_cards[1].rank(),
            sorted_cards[2].rank(),
            sorted_cards[3].rank(),
            sorted_cards[4].rank(),
        ];

        // Count rank frequencies
        let mut rank_counts = [0u8; 15];
        for &rank in ranks.iter() {
            rank_counts[rank.value() as usize] += 1;
        }

        // Build domain objects
        let rank_groups = RankGroups::from_counts(&rank_counts);
        let suit_info = SuitInfo::detect(&sorted_cards);
        let straight_info = StraightInfo::detect(&ranks);

        Self { sorted_cards, ranks, rank_counts, rank_groups, suit_info, straight_info }
    }

    /// Build an Evaluation from a category and tiebreak ranks.
    pub fn build_evaluation(&self, category: Category, tiebreak: [Rank; 5]) -> Evaluation {
        let value = HandValue::from_parts(category, &tiebreak);
        Evaluation { category, best_five: self.sorted_cards, value }
    }
}
