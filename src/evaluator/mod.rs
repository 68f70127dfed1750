pub(crate) mod combinations;
pub(crate) mod detector;
pub(crate) mod hand_analysis;
pub(crate) mod rank_groups;
pub(crate) mod straight_info;
pub(crate) mod suit_info;

use crate::cards::{Card, Rank};
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use core::cmp::Ordering;

/// Compact, comparable hand strength. Higher is better.
/// Encodes category and ranked tiebreakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
pub struct HandValue(u64);

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Detailed evaluation result. `value` drives ordering.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Evaluation {
    pub category: Category,
    pub best_five: [Card; 5],
    value: HandValue,
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Evaluation {}

impl Evaluation {
    /// Return the packed comparable value for ordering/caching.
    pub const fn value(&self) -> HandValue {
        self.value
    }
}

impl HandValue {
    /// Return the packed comparable value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Pack a category and five rank tiebreakers into a comparable value.
    /// Uses 6 bits per rank to be generous (supports up to 63).
    pub fn from_parts(category: Category, ranks_desc: &[Rank; 5]) -> Self {
        // Layout (most significant -> least):
        // [ category (8 bits) | r0 (6) | r1 (6) | r2 (6) | r3 (6) | r4 (6) | 10 zero bits ]
        // r0 is the primary tiebreaker and must be more significant than r1..r4.
        const CAT_SHIFT: u32 = 48; // put category in the high byte
        const RANK_STRIDE: u32 = 6;
        let mut v: u64 = (category as u64) << CAT_SHIFT;
        for (i, r) in ranks_desc.iter().enumerate() {
            // Place r0 just below the category, then r1, ...
            let offset = CAT_SHIFT - RANK_STRIDE * (i as u32 + 1);
            v |= (*r as u64) << offset;
        }
        HandValue(v)
    }
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("not enough cards to evaluate")]
    NotEnoughCards,
    #[error("evaluate_hand accepts 5..=7 cards, got {0}")]
    InvalidCardCount(usize),
}

/// Evaluate a Hold'em hand given hole cards and a board.
/// Validates inputs, builds the 7-card set (2 hole + 5 board),
/// and returns the best five-card evaluation with category and tiebreaks.
///
/// ```
/// use holdem_core::cards::{Card, Rank, Suit};
/// use holdem_core::evaluator::{evaluate_holdem, Category};
/// use holdem_core::hand::{Board, HoleCards};
///
/// let hole = HoleCards::try_new(
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::Ace, Suit::Hearts),
/// ).unwrap();
/// let board = Board::try_new(vec![
///     Card::new(Rank::Queen, Suit::Clubs),
///     Card::new(Rank::Jack, Suit::Diamonds),
///     Card::new(Rank::Nine, Suit::Hearts),
///     Card::new(Rank::Three, Suit::Spades),
///     Card::new(Rank::Two, Suit::Clubs),
/// ]).unwrap();
/// let eval = evaluate_holdem(&hole, &board).unwrap();
/// assert_eq!(eval.category, Category::Pair);
/// ```
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<Evaluation, EvalError> {
    validate_holdem(hole, board)?;
    let board_cards = board.as_slice();
    if board_cards.len() < 5 {
        return Err(EvalError::NotEnoughCards);
    }
    // Build a 7-card set: two hole + 5 board
    let seven = [
        hole.first(),
        hole.second(),
        board_cards[0],
        board_cards[1],
        board_cards[2],
        board_cards[3],
        board_cards[4],
    ];
    Ok(evaluate_seven(&seven))
}

/// Evaluate exactly five cards; detects category and encodes tie-breakers.
pub fn evaluate_five(cards: &[Card; 5]) -> Evaluation {
    use detector::DETECTORS;
    use hand_analysis::HandAnalysis;

    // Build analysis once (sorted cards, rank counts, groups, flush/straight info)
    let analysis = HandAnalysis::new(cards);

    // Check categories in priority order (highest to lowest)
    for detector in DETECTORS.iter() {
        if detector.detect(&analysis) {
            return detector.build_evaluation(&analysis);
        }
    }

    // Unreachable: HighCard detector always matches as fallback
    unreachable!("HighCard detector should always match")
}

/// Evaluate seven cards (helper for Hold'em style 7-card evaluation).
/// Iterate all 21 five-card combinations from 7 and return the best by value.
pub fn evaluate_seven(cards: &[Card; 7]) -> Evaluation {
    use combinations::Combinations7Choose5;

    let mut best: Option<Evaluation> = None;

    for indices in Combinations7Choose5::new() {
        let hand = [
            cards[indices[0]],
            cards[indices[1]],
            cards[indices[2]],
            cards[indices[3]],
            cards[indices[4]],
        ];
        let eval = evaluate_five(&hand);

        if best.as_ref().map_or(true, |b| eval > *b) {
            best = Some(eval);
        }
    }

    best.unwrap_or_else(|| evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]))
}

/// Evaluate six cards, returning the best of the 6 five-card subsets.
pub fn evaluate_six(cards: &[Card; 6]) -> Evaluation {
    use combinations::Combinations6Choose5;

    let mut best: Option<Evaluation> = None;
    for indices in Combinations6Choose5::new() {
        let hand = [
            cards[indices[0]],
            cards[indices[1]],
            cards[indices[2]],
            cards[indices[3]],
            cards[indices[4]],
        ];
        let eval = evaluate_five(&hand);
        if best.as_ref().map_or(true, |b| eval > *b) {
            best = Some(eval);
        }
    }
    best.expect("C(6,5) always yields at least one subset")
}

/// Evaluate any 5, 6, or 7 card hand, returning the best five-card evaluation.
///
/// ```
/// use holdem_core::cards::parse_cards;
/// use holdem_core::evaluator::{evaluate_hand, Category};
///
/// let cards = parse_cards("As Ah Ks Kh Kd 2c 3c").unwrap();
/// let eval = evaluate_hand(&cards).unwrap();
/// assert_eq!(eval.category, Category::FullHouse);
/// ```
pub fn evaluate_hand(cards: &[Card]) -> Result<Evaluation, EvalError> {
    match cards.len() {
        5 => Ok(evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]])),
        6 => Ok(evaluate_six(&[cards[0], cards[1], cards[2], cards[3], cards[4], cards[5]])),
        7 => Ok(evaluate_seven(&[
            cards[0], cards[1], cards[2], cards[3], cards[4], cards[5], cards[6],
        ])),
        n => Err(EvalError::InvalidCardCount(n)),
    }
}

/// Return the indices into `hands` of every evaluation tied for the best.
/// A single winner yields a one-element vector; a split pot yields all ties.
///
/// ```
/// use holdem_core::cards::{Card, Rank, Suit};
/// use holdem_core::evaluator::{evaluate_five, find_winners};
///
/// let a = evaluate_five(&[
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::Ace, Suit::Hearts),
///     Card::new(Rank::King, Suit::Clubs),
///     Card::new(Rank::Nine, Suit::Diamonds),
///     Card::new(Rank::Two, Suit::Clubs),
/// ]);
/// let b = evaluate_five(&[
///     Card::new(Rank::Ace, Suit::Diamonds),
///     Card::new(Rank::Ace, Suit::Clubs),
///     Card::new(Rank::King, Suit::Diamonds),
///     Card::new(Rank::Nine, Suit::Clubs),
///     Card::new(Rank::Two, Suit::Diamonds),
/// ]);
/// assert_eq!(find_winners(&[a, b]), vec![0, 1]);
/// ```
pub fn find_winners(hands: &[Evaluation]) -> Vec<usize> {
    let Some(best) = hands.iter().max() else {
        return Vec::new();
    };
    hands.iter().enumerate().filter(|(_, e)| *e == best).map(|(i, _)| i).collect()
}

/// Compare two Hold'em hands on a shared board. Returns the ordering or a validation error.
///
/// ```
/// use holdem_core::cards::{Card, Rank, Suit};
/// use holdem_core::evaluator::compare_holdem;
/// use holdem_core::hand::{Board, HoleCards};
/// use std::cmp::Ordering;
///
/// let board = Board::try_new(vec![
///     Card::new(Rank::Queen, Suit::Clubs),
///     Card::new(Rank::Jack, Suit::Diamonds),
///     Card::new(Rank::Nine, Suit::Hearts),
///     Card::new(Rank::Three, Suit::Spades),
///     Card::new(Rank::Two, Suit::Clubs),
/// ]).unwrap();
/// let a = HoleCards::try_new(
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::Ace, Suit::Hearts),
/// ).unwrap();
/// let b = HoleCards::try_new(
///     Card::new(Rank::King, Suit::Spades),
///     Card::new(Rank::King, Suit::Hearts),
/// ).unwrap();
/// let ord = compare_holdem(&a, &b, &board).unwrap();
/// assert_eq!(ord, Ordering::Greater);
/// ```
pub fn compare_holdem(a: &HoleCards, b: &HoleCards, board: &Board) -> Result<Ordering, EvalError> {
    let va = evaluate_holdem(a, board)?;
    let vb = evaluate_holdem(b, board)?;
    Ok(va.cmp(&vb))
}
