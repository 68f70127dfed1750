//! Outs-based draw analysis: flush draws and straight draws (including
//! backdoor and double-gutshot shapes) available to a hand on the flop or
//! turn.

use crate::cards::{Card, Rank, Suit};
use crate::hand::{Board, HoleCards};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DrawsError {
    #[error("draw analysis requires a flop or turn board (3 or 4 cards), got {0}")]
    InvalidBoardLength(usize),
}

/// The shape of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DrawType {
    FlushDraw,
    BackdoorFlushDraw,
    OpenEndedStraightDraw,
    Gutshot,
    DoubleGutshot,
    BackdoorStraightDraw,
}

/// A draw to a flush of a specific suit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushDraw {
    pub suit: Suit,
    pub kind: DrawType,
    /// Suited cards already held toward this flush: 3 for a backdoor draw,
    /// 4 for a live flush draw.
    pub cards_held: usize,
    /// Cards that complete the flush.
    pub outs: Vec<Card>,
    /// True when the player holds the Ace of the drawing suit.
    pub is_nut: bool,
}

/// A draw to a straight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StraightDraw {
    /// Top rank of the best straight this draw can complete.
    pub high_card: Rank,
    pub kind: DrawType,
    /// Rank(s) whose cards complete the straight.
    pub needed_ranks: Vec<Rank>,
    pub outs: Vec<Card>,
    /// True when the completed straight is the Ace-high straight.
    pub is_nut: bool,
}

/// Either flavor of draw, as returned by [`DrawAnalysis::primary_draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw<'a> {
    Flush(&'a FlushDraw),
    Straight(&'a StraightDraw),
}

/// The complete draw picture for a hand on a given board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrawAnalysis {
    pub flush_draws: Vec<FlushDraw>,
    pub straight_draws: Vec<StraightDraw>,
    pub has_made_flush: bool,
    pub has_made_straight: bool,
}

impl DrawAnalysis {
    /// Union of every out across every non-backdoor draw.
    pub fn all_outs(&self) -> HashSet<Card> {
        let mut outs = HashSet::new();
        for fd in &self.flush_draws {
            outs.extend(fd.outs.iter().copied());
        }
        for sd in &self.straight_draws {
            outs.extend(sd.outs.iter().copied());
        }
        outs
    }

    pub fn total_outs(&self) -> usize {
        self.all_outs().len()
    }

    pub fn count_flush_outs(&self) -> usize {
        self.flush_draws.iter().map(|d| d.outs.len()).sum()
    }

    pub fn count_straight_outs(&self) -> usize {
        self.straight_draws.iter().map(|d| d.outs.len()).sum()
    }

    /// True if any non-backdoor flush draw is to the nuts.
    pub fn has_nut_flush_draw(&self) -> bool {
        self.flush_draws.iter().any(|d| d.is_nut && d.kind == DrawType::FlushDraw)
    }

    /// True if any straight draw completes to the nut (Ace-high) straight.
    pub fn has_nut_straight_draw(&self) -> bool {
        self.straight_draws.iter().any(|d| d.is_nut)
    }

    /// The single most valuable draw, by a fixed priority order: flush draw,
    /// open-ended straight draw, (double) gutshot, backdoor flush, backdoor
    /// straight.
    pub fn primary_draw(&self) -> Option<Draw<'_>> {
        if let Some(fd) = self.flush_draws.iter().find(|d| d.kind == DrawType::FlushDraw) {
            return Some(Draw::Flush(fd));
        }
        if let Some(sd) =
            self.straight_draws.iter().find(|d| d.kind == DrawType::OpenEndedStraightDraw)
        {
            return Some(Draw::Straight(sd));
        }
        if let Some(sd) = self
            .straight_draws
            .iter()
            .find(|d| matches!(d.kind, DrawType::Gutshot | DrawType::DoubleGutshot))
        {
            return Some(Draw::Straight(sd));
        }
        if let Some(fd) = self.flush_draws.iter().find(|d| d.kind == DrawType::BackdoorFlushDraw) {
            return Some(Draw::Flush(fd));
        }
        if let Some(sd) =
            self.straight_draws.iter().find(|d| d.kind == DrawType::BackdoorStraightDraw)
        {
            return Some(Draw::Straight(sd));
        }
        None
    }
}

/// 14-bit rank-presence mask: bit 0 mirrors the Ace (for the wheel), bits
/// 1..=13 represent ranks 2..=14.
fn rank_bit(r: Rank) -> u16 {
    1 << (r.value() - 1)
}

fn rank_for_bit(bit: u32) -> Rank {
    if bit == 0 {
        Rank::Ace
    } else {
        Rank::ALL[(bit - 1) as usize]
    }
}

fn rank_from_value(v: u8) -> Rank {
    Rank::ALL[(v - 2) as usize]
}

fn build_rank_mask<I: IntoIterator<Item = Rank>>(ranks: I) -> u16 {
    let mut mask = 0u16;
    for r in ranks {
        mask |= rank_bit(r);
        if r == Rank::Ace {
            mask |= 1; // wheel mirror
        }
    }
    mask
}

/// Top rank of the straight completed by filling window `start..start+5`.
fn window_top_rank(start: u32) -> Rank {
    Rank::ALL[(start + 5 - 2) as usize]
}

fn window_mask(start: u32) -> u16 {
    0b11111u16 << start
}

fn outs_for_rank(rank: Rank, known: &HashSet<Card>) -> Vec<Card> {
    Suit::ALL
        .iter()
        .map(|&s| Card::new(rank, s))
        .filter(|c| !known.contains(c))
        .collect()
}

/// Analyze the flush and straight draws available to `hole` on `board`.
/// `board` must have exactly 3 (flop) or 4 (turn) cards — there are no more
/// draws once the river is dealt.
///
/// ```
/// use holdem_core::cards::{Card, Rank, Suit};
/// use holdem_core::draws::analyze_draws;
/// use holdem_core::hand::{Board, HoleCards};
///
/// let hole = HoleCards::try_new(
///     Card::new(Rank::Ace, Suit::Hearts),
///     Card::new(Rank::King, Suit::Hearts),
/// ).unwrap();
/// let board = Board::try_new(vec![
///     Card::new(Rank::Queen, Suit::Hearts),
///     Card::new(Rank::Four, Suit::Hearts),
///     Card::new(Rank::Two, Suit::Clubs),
/// ]).unwrap();
/// let analysis = analyze_draws(&hole, &board).unwrap();
/// assert!(analysis.has_nut_flush_draw());
/// ```
pub fn analyze_draws(hole: &HoleCards, board: &Board) -> Result<DrawAnalysis, DrawsError> {
    if board.len() != 3 && board.len() != 4 {
        return Err(DrawsError::InvalidBoardLength(board.len()));
    }

    let mut known: Vec<Card> = vec![hole.first(), hole.second()];
    known.extend(board.as_slice().iter().copied());
    let known_set: HashSet<Card> = known.iter().copied().collect();

    let mut analysis = DrawAnalysis::default();

    analyze_flush_draws(&known, &hole.as_array(), board.len(), &known_set, &mut analysis);
    analyze_straight_draws(&known, board.len(), &known_set, &mut analysis);

    Ok(analysis)
}

fn analyze_flush_draws(
    known: &[Card],
    hole: &[Card; 2],
    board_len: usize,
    known_set: &HashSet<Card>,
    analysis: &mut DrawAnalysis,
) {
    for &suit in &Suit::ALL {
        let count = known.iter().filter(|c| c.suit() == suit).count();
        if count >= 5 {
            analysis.has_made_flush = true;
            continue;
        }
        if count == 4 {
            let outs = outs_for_rank_in_suit(suit, known_set);
            let is_nut = hole.contains(&Card::new(Rank::Ace, suit));
            analysis.flush_draws.push(FlushDraw {
                suit,
                kind: DrawType::FlushDraw,
                cards_held: count,
                outs,
                is_nut,
            });
        } else if count == 3 && board_len == 3 {
            let outs = outs_for_rank_in_suit(suit, known_set);
            let is_nut = hole.contains(&Card::new(Rank::Ace, suit));
            analysis.flush_draws.push(FlushDraw {
                suit,
                kind: DrawType::BackdoorFlushDraw,
                cards_held: count,
                outs,
                is_nut,
            });
        }
        // count == 3 on the turn, or count < 3, is not a draw.
    }
}

fn outs_for_rank_in_suit(suit: Suit, known: &HashSet<Card>) -> Vec<Card> {
    Rank::ALL.iter().map(|&r| Card::new(r, suit)).filter(|c| !known.contains(c)).collect()
}

fn analyze_straight_draws(
    known: &[Card],
    board_len: usize,
    known_set: &HashSet<Card>,
    analysis: &mut DrawAnalysis,
) {
    let mask = build_rank_mask(known.iter().map(|c| c.rank()));

    // 10 windows: starts 0..=9 over a 14-bit span.
    let made = (0..=9u32).any(|s| mask & window_mask(s) == window_mask(s));
    if made {
        analysis.has_made_straight = true;
        return;
    }

    // For each window with exactly one missing rank, record (start, missing bit position).
    let mut near_misses: Vec<(u32, u32)> = Vec::new();
    for s in 0..=9u32 {
        let w = window_mask(s);
        let filled = (mask & w).count_ones();
        if filled == 4 {
            let missing_bit = (w & !mask).trailing_zeros();
            near_misses.push((s, missing_bit - s));
        }
    }

    let mut consumed: HashSet<u32> = HashSet::new();
    let mut seen_ranks: HashSet<Rank> = HashSet::new();

    // Open-ended: window s missing its own bottom (position 0) paired with
    // window s+1 missing its own top (position 4) — the two windows share
    // the same 4-rank run in the middle and differ only in which end is open.
    for &(s, pos) in &near_misses {
        if pos != 0 || consumed.contains(&s) {
            continue;
        }
        if let Some(&(s2, pos2)) = near_misses.iter().find(|&&(s2, _)| s2 == s + 1) {
            if pos2 == 4 && !consumed.contains(&s2) {
                let low_rank = rank_for_bit(s);
                let high_rank = rank_for_bit(s + 5);
                let mut outs = outs_for_rank(low_rank, known_set);
                outs.extend(outs_for_rank(high_rank, known_set));
                let high_card = window_top_rank(s + 1);
                analysis.straight_draws.push(StraightDraw {
                    high_card,
                    kind: DrawType::OpenEndedStraightDraw,
                    needed_ranks: vec![low_rank, high_rank],
                    outs,
                    is_nut: high_card == Rank::Ace,
                });
                consumed.insert(s);
                consumed.insert(s2);
                seen_ranks.insert(low_rank);
                seen_ranks.insert(high_rank);
            }
        }
    }

    // Remaining near-misses are single-rank gutshots (edge or interior).
    for &(s, _pos) in &near_misses {
        if consumed.contains(&s) {
            continue;
        }
        let needed = rank_for_bit(s + window_mask_missing_offset(mask, s));
        if seen_ranks.contains(&needed) {
            continue;
        }
        seen_ranks.insert(needed);
        let high_card = window_top_rank(s);
        analysis.straight_draws.push(StraightDraw {
            high_card,
            kind: DrawType::Gutshot,
            needed_ranks: vec![needed],
            outs: outs_for_rank(needed, known_set),
            is_nut: high_card == Rank::Ace,
        });
    }

    // Independent scan for double-gutshots: 4 ranks spanning a 6-rank window
    // with two internal gaps. This can coexist with the OESD/gutshots found
    // above, and only applies before the river.
    if board_len < 5 {
        analysis.straight_draws.extend(detect_double_gutshots(mask, known_set));
    }

    // Backdoor straights (three connected ranks on the flop, needing two
    // running cards) only matter when nothing stronger is already live.
    if board_len == 3 && analysis.straight_draws.is_empty() {
        analysis.straight_draws.extend(detect_backdoor_straights(mask, known_set));
    }
}

/// Position (0..=4) of the single missing bit inside window `start`.
fn window_mask_missing_offset(mask: u16, start: u32) -> u32 {
    let w = window_mask(start);
    (w & !mask).trailing_zeros() - start
}

/// Scan every 6-rank window for exactly 4 held ranks with two gaps, neither
/// gap at the window's own edge (that shape is an OESD/gutshot, not a
/// double-gutshot).
fn detect_double_gutshots(mask: u16, known: &HashSet<Card>) -> Vec<StraightDraw> {
    let mut draws = Vec::new();
    for s in 0..=8u32 {
        let window = 0b111111u16 << s;
        if (mask & window).count_ones() != 4 {
            continue;
        }
        let gaps: Vec<u32> = (0..6u32).filter(|&p| mask & (1 << (s + p)) == 0).collect();
        if gaps.len() != 2 || gaps.contains(&0) || gaps.contains(&5) {
            continue;
        }
        let needed_ranks: Vec<Rank> = gaps.iter().map(|&p| rank_for_bit(s + p)).collect();
        let mut outs = Vec::new();
        for &r in &needed_ranks {
            outs.extend(outs_for_rank(r, known));
        }
        if outs.is_empty() {
            continue;
        }
        let high_card = rank_for_bit(s + 5);
        draws.push(StraightDraw {
            high_card,
            kind: DrawType::DoubleGutshot,
            needed_ranks,
            outs,
            is_nut: high_card == Rank::Ace,
        });
    }
    draws
}

/// Scan every 3-rank window for three connected ranks that could be extended
/// into a straight with two more running cards.
fn detect_backdoor_straights(mask: u16, known: &HashSet<Card>) -> Vec<StraightDraw> {
    let mut draws = Vec::new();
    for s in 0..=11u32 {
        let window = 0b111u16 << s;
        if mask & window != window {
            continue;
        }

        let (needed_ranks, high_card, is_nut) = if s == 0 {
            // Window holds Ace(low)-2-3: only a runner-runner extension
            // upward (4 and 5) completes the wheel.
            (vec![Rank::Four, Rank::Five], Rank::Five, false)
        } else {
            let top_val = rank_for_bit(s + 2).value();
            if top_val < 5 {
                // A 2-3-4 run has no rank below to extend from and isn't
                // treated as a wheel-adjacent shape; skip it.
                continue;
            }
            let mut needed = vec![rank_from_value(top_val - 3)];
            if top_val < 14 {
                needed.push(rank_from_value(top_val + 1));
            }
            let high_val = (top_val + 1).min(14);
            (needed, rank_from_value(high_val), top_val + 1 >= 14)
        };

        let mut outs = Vec::new();
        for &r in &needed_ranks {
            outs.extend(outs_for_rank(r, known));
        }
        if outs.is_empty() {
            continue;
        }
        draws.push(StraightDraw {
            high_card,
            kind: DrawType::BackdoorStraightDraw,
            needed_ranks,
            outs,
            is_nut,
        });
    }
    draws
}
