//! Monte Carlo equity: simulate random runouts to estimate each player's
//! share of the pot.

use crate::canonical::CanonicalHand;
use crate::cards::Card;
use crate::evaluator::{evaluate_hand, find_winners, EvalError};
use crate::hand::{Board, HoleCards};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

const MIN_PLAYERS: usize = 2;
const MAX_PLAYERS: usize = 10;
const MAX_DEAL_ATTEMPTS: usize = 200;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EquityError {
    #[error("equity requires {MIN_PLAYERS}..={MAX_PLAYERS} players, got {0}")]
    InvalidPlayerCount(usize),
    #[error("hand evaluation failed: {0}")]
    Eval(#[from] EvalError),
    #[error("a player's range has no combos left once dead cards are excluded")]
    EmptyRange,
    #[error("could not deal a conflict-free trial after {MAX_DEAL_ATTEMPTS} attempts")]
    InvariantViolated,
}

/// What a player is holding, for equity purposes.
#[derive(Debug, Clone)]
pub enum PlayerHand {
    /// Two known hole cards.
    Specific(HoleCards),
    /// A weighted-uniform range of canonical hands; one combo is sampled
    /// per trial.
    Range(Vec<CanonicalHand>),
    /// Any two live cards, sampled uniformly per trial.
    Random,
}

/// One player's accumulated Monte Carlo result.
///
/// `equity()` is `equity_sum / trials`, where `equity_sum` accrues `1/k` for
/// every trial the player shares a `k`-way tie (an outright win is `k == 1`).
/// This is the exact fractional-pot-share estimator; it is not the same as
/// `win_rate + tie_rate / 2`, which only matches it for two-way ties.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerEquity {
    pub wins: u64,
    pub ties: u64,
    pub equity_sum: f64,
    pub trials: u64,
}

impl PlayerEquity {
    pub fn equity(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.equity_sum / self.trials as f64
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.wins as f64 / self.trials as f64
        }
    }

    pub fn tie_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.ties as f64 / self.trials as f64
        }
    }
}

/// A snapshot of running equity at a given trial count, for convergence tracing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergencePoint {
    pub trial: u64,
    pub equities: Vec<f64>,
}

/// Complete result of an equity run.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityResult {
    pub players: Vec<PlayerEquity>,
    pub trials_run: u64,
    pub convergence: Vec<ConvergencePoint>,
}

/// An equity computation request.
#[derive(Debug, Clone)]
pub struct EquityRequest {
    pub players: Vec<PlayerHand>,
    pub board: Board,
    /// Cards known to be dead (e.g. folded or burned) beyond the players'
    /// hole cards and the board.
    pub dead_cards: HashSet<Card>,
    pub trials: u64,
    pub seed: u64,
    /// Record a [`ConvergencePoint`] every `convergence_interval` trials.
    /// `0` disables convergence tracing.
    pub convergence_interval: u64,
}

impl EquityRequest {
    pub fn new(players: Vec<PlayerHand>, board: Board, trials: u64, seed: u64) -> Self {
        Self { players, board, dead_cards: HashSet::new(), trials, seed, convergence_interval: 0 }
    }
}

/// Run a Monte Carlo equity simulation to completion.
///
/// ```
/// use holdem_core::cards::{Card, Rank, Suit};
/// use holdem_core::equity::{run_equity, EquityRequest, PlayerHand};
/// use holdem_core::hand::{Board, HoleCards};
///
/// let aces = HoleCards::try_new(
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::Ace, Suit::Hearts),
/// ).unwrap();
/// let kings = HoleCards::try_new(
///     Card::new(Rank::King, Suit::Spades),
///     Card::new(Rank::King, Suit::Hearts),
/// ).unwrap();
/// let request = EquityRequest::new(
///     vec![PlayerHand::Specific(aces), PlayerHand::Specific(kings)],
///     Board::try_new(Vec::new()).unwrap(),
///     500,
///     42,
/// );
/// let result = run_equity(&request).unwrap();
/// assert!(result.players[0].equity() > result.players[1].equity());
/// ```
pub fn run_equity(request: &EquityRequest) -> Result<EquityResult, EquityError> {
    run_equity_cancellable(request, None)
}

/// Run a Monte Carlo equity simulation, stopping early if `cancel` is set.
/// The returned result's `trials_run` reflects however many trials actually
/// completed.
pub fn run_equity_cancellable(
    request: &EquityRequest,
    cancel: Option<&AtomicBool>,
) -> Result<EquityResult, EquityError> {
    let n = request.players.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
        return Err(EquityError::InvalidPlayerCount(n));
    }

    let mut base_dead: HashSet<Card> = request.dead_cards.iter().copied().collect();
    base_dead.extend(request.board.as_slice().iter().copied());
    for p in &request.players {
        if let PlayerHand::Specific(hole) = p {
            base_dead.insert(hole.first());
            base_dead.insert(hole.second());
        }
    }

    let range_combos: Vec<Option<Vec<[Card; 2]>>> = request
        .players
        .iter()
        .map(|p| match p {
            PlayerHand::Range(hands) => {
                let mut combos = Vec::new();
                for h in hands {
                    combos.extend(h.get_combos_excluding(&base_dead));
                }
                Some(combos)
            }
            _ => None,
        })
        .collect();
    for combos in range_combos.iter().flatten() {
        if combos.is_empty() {
            return Err(EquityError::EmptyRange);
        }
    }

    let full_deck: Vec<Card> = (0..52u8).filter_map(Card::from_index).collect();

    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    let mut players: Vec<PlayerEquity> = vec![PlayerEquity::default(); n];
    let mut convergence = Vec::new();
    let board_needed = 5 - request.board.len();

    let mut trial = 0u64;
    while trial < request.trials {
        if let Some(flag) = cancel {
            if flag.load(AtomicOrdering::Relaxed) {
                break;
            }
        }

        match deal_one_trial(request, &base_dead, &range_combos, &full_deck, board_needed, &mut rng)
        {
            Some(deal) => {
                let runout = deal.runout;
                let evaluations: Vec<_> = deal
                    .hands
                    .iter()
                    .map(|h| {
                        let mut seven = Vec::with_capacity(7);
                        seven.push(h[0]);
                        seven.push(h[1]);
                        seven.extend(request.board.as_slice().iter().copied());
                        seven.extend(runout.iter().copied());
                        evaluate_hand(&seven)
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let winners = find_winners(&evaluations);
                let share = 1.0 / winners.len() as f64;
                for &w in &winners {
                    players[w].equity_sum += share;
                    if winners.len() == 1 {
                        players[w].wins += 1;
                    } else {
                        players[w].ties += 1;
                    }
                }
                for p in players.iter_mut() {
                    p.trials += 1;
                }

                trial += 1;
                if request.convergence_interval > 0 && trial % request.convergence_interval == 0 {
                    convergence.push(ConvergencePoint {
                        trial,
                        equities: players.iter().map(PlayerEquity::equity).collect(),
                    });
                }
            }
            None => return Err(EquityError::InvariantViolated),
        }
    }

    Ok(EquityResult { players, trials_run: trial, convergence })
}

struct TrialDeal {
    hands: Vec<[Card; 2]>,
    runout: Vec<Card>,
}

fn deal_one_trial(
    request: &EquityRequest,
    base_dead: &HashSet<Card>,
    range_combos: &[Option<Vec<[Card; 2]>>],
    full_deck: &[Card],
    board_needed: usize,
    rng: &mut ChaCha8Rng,
) -> Option<TrialDeal> {
    for _attempt in 0..MAX_DEAL_ATTEMPTS {
        let mut used: HashSet<Card> = base_dead.clone();
        let mut hands = Vec::with_capacity(request.players.len());
        let mut ok = true;

        for (player, combos) in request.players.iter().zip(range_combos.iter()) {
            let dealt = match (player, combos) {
                (PlayerHand::Specific(hole), _) => hole.as_array(),
                (PlayerHand::Range(_), Some(combos)) => {
                    match sample_conflict_free_combo(combos, &used, rng) {
                        Some(c) => c,
                        None => {
                            ok = false;
                            break;
                        }
                    }
                }
                (PlayerHand::Random, _) => match sample_random_pair(full_deck, &used, rng) {
                    Some(c) => c,
                    None => {
                        ok = false;
                        break;
                    }
                },
                (PlayerHand::Range(_), None) => unreachable!("range combos precomputed per player"),
            };
            used.insert(dealt[0]);
            used.insert(dealt[1]);
            hands.push(dealt);
        }
        if !ok {
            continue;
        }

        let remaining: Vec<Card> =
            full_deck.iter().copied().filter(|c| !used.contains(c)).collect();
        if remaining.len() < board_needed {
            continue;
        }
        let mut pool = remaining;
        pool.shuffle(rng);
        let runout = pool[..board_needed].to_vec();

        return Some(TrialDeal { hands, runout });
    }
    None
}

fn sample_conflict_free_combo(
    combos: &[[Card; 2]],
    used: &HashSet<Card>,
    rng: &mut ChaCha8Rng,
) -> Option<[Card; 2]> {
    for _ in 0..MAX_DEAL_ATTEMPTS {
        let c = combos[rng.random_range(0..combos.len())];
        if !used.contains(&c[0]) && !used.contains(&c[1]) {
            return Some(c);
        }
    }
    None
}

fn sample_random_pair(
    full_deck: &[Card],
    used: &HashSet<Card>,
    rng: &mut ChaCha8Rng,
) -> Option<[Card; 2]> {
    let live: Vec<Card> = full_deck.iter().copied().filter(|c| !used.contains(c)).collect();
    if live.len() < 2 {
        return None;
    }
    let mut indices: Vec<usize> = (0..live.len()).collect();
    indices.shuffle(rng);
    Some([live[indices[0]], live[indices[1]]])
}

/// Split `request.trials` across a rayon thread pool, combining per-worker
/// results. Each worker uses a distinct ChaCha8 stream so the overall
/// result is deterministic for a given `request.seed` and thread count,
/// though not for a given seed across different thread counts. Convergence
/// tracing is not supported across workers: `convergence` is always empty.
#[cfg(feature = "parallel")]
pub fn run_equity_parallel(request: &EquityRequest) -> Result<EquityResult, EquityError> {
    use rayon::prelude::*;

    let n = request.players.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
        return Err(EquityError::InvalidPlayerCount(n));
    }

    let workers = rayon::current_num_threads().max(1) as u64;
    let base_trials = request.trials / workers;
    let remainder = request.trials % workers;

    let partials: Vec<Result<EquityResult, EquityError>> = (0..workers)
        .into_par_iter()
        .map(|worker| {
            let worker_trials = base_trials + if worker < remainder { 1 } else { 0 };
            if worker_trials == 0 {
                return Ok(EquityResult {
                    players: vec![PlayerEquity::default(); n],
                    trials_run: 0,
                    convergence: Vec::new(),
                });
            }
            let mut sub_request = request.clone();
            sub_request.trials = worker_trials;
            sub_request.convergence_interval = 0;

            // Same seed, distinct ChaCha8 stream per worker: deterministic
            // for a fixed (seed, thread count) pair without needing to
            // derive a fresh per-worker seed.
            run_equity_with_stream(&sub_request, worker)
        })
        .collect();

    let mut total = EquityResult {
        players: vec![PlayerEquity::default(); n],
        trials_run: 0,
        convergence: Vec::new(),
    };
    for partial in partials {
        let partial = partial?;
        total.trials_run += partial.trials_run;
        for (acc, p) in total.players.iter_mut().zip(partial.players.iter()) {
            acc.wins += p.wins;
            acc.ties += p.ties;
            acc.equity_sum += p.equity_sum;
            acc.trials += p.trials;
        }
    }
    Ok(total)
}

#[cfg(feature = "parallel")]
fn run_equity_with_stream(
    request: &EquityRequest,
    stream: u64,
) -> Result<EquityResult, EquityError> {
    let n = request.players.len();
    let mut base_dead: HashSet<Card> = request.dead_cards.iter().copied().collect();
    base_dead.extend(request.board.as_slice().iter().copied());
    for p in &request.players {
        if let PlayerHand::Specific(hole) = p {
            base_dead.insert(hole.first());
            base_dead.insert(hole.second());
        }
    }
    let range_combos: Vec<Option<Vec<[Card; 2]>>> = request
        .players
        .iter()
        .map(|p| match p {
            PlayerHand::Range(hands) => {
                let mut combos = Vec::new();
                for h in hands {
                    combos.extend(h.get_combos_excluding(&base_dead));
                }
                Some(combos)
            }
            _ => None,
        })
        .collect();
    for combos in range_combos.iter().flatten() {
        if combos.is_empty() {
            return Err(EquityError::EmptyRange);
        }
    }

    let full_deck: Vec<Card> = (0..52u8).filter_map(Card::from_index).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    rng.set_stream(stream);
    let mut players: Vec<PlayerEquity> = vec![PlayerEquity::default(); n];
    let board_needed = 5 - request.board.len();

    let mut trial = 0u64;
    while trial < request.trials {
        match deal_one_trial(request, &base_dead, &range_combos, &full_deck, board_needed, &mut rng)
        {
            Some(deal) => {
                let runout = deal.runout;
                let evaluations: Vec<_> = deal
                    .hands
                    .iter()
                    .map(|h| {
                        let mut seven = Vec::with_capacity(7);
                        seven.push(h[0]);
                        seven.push(h[1]);
                        seven.extend(request.board.as_slice().iter().copied());
                        seven.extend(runout.iter().copied());
                        evaluate_hand(&seven)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let winners = find_winners(&evaluations);
                let share = 1.0 / winners.len() as f64;
                for &w in &winners {
                    players[w].equity_sum += share;
                    if winners.len() == 1 {
                        players[w].wins += 1;
                    } else {
                        players[w].ties += 1;
                    }
                }
                for p in players.iter_mut() {
                    p.trials += 1;
                }
                trial += 1;
            }
            None => return Err(EquityError::InvariantViolated),
        }
    }

    Ok(EquityResult { players, trials_run: trial, convergence: Vec::new() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn hole(a: Card, b: Card) -> HoleCards {
        HoleCards::try_new(a, b).unwrap()
    }

    #[test]
    fn pocket_aces_crush_pocket_kings_preflop() {
        let request = EquityRequest::new(
            vec![
                PlayerHand::Specific(hole(
                    Card::new(Rank::Ace, Suit::Spades),
                    Card::new(Rank::Ace, Suit::Hearts),
                )),
                PlayerHand::Specific(hole(
                    Card::new(Rank::King, Suit::Spades),
                    Card::new(Rank::King, Suit::Hearts),
                )),
            ],
            Board::try_new(Vec::new()).unwrap(),
            2000,
            1,
        );
        let result = run_equity(&request).unwrap();
        assert_eq!(result.trials_run, 2000);
        assert!(result.players[0].equity() > 0.75);
        assert!(result.players[0].equity() + result.players[1].equity() > 0.99);
    }

    #[test]
    fn straight_and_royal_draw_beats_top_set_on_this_flop() {
        let request = EquityRequest::new(
            vec![
                PlayerHand::Specific(hole(
                    Card::new(Rank::Ace, Suit::Hearts),
                    Card::new(Rank::King, Suit::Hearts),
                )),
                PlayerHand::Specific(hole(
                    Card::new(Rank::Queen, Suit::Diamonds),
                    Card::new(Rank::Queen, Suit::Clubs),
                )),
            ],
            Board::try_new(vec![
                Card::new(Rank::Queen, Suit::Hearts),
                Card::new(Rank::Jack, Suit::Hearts),
                Card::new(Rank::Ten, Suit::Clubs),
            ])
            .unwrap(),
            2000,
            3,
        );
        let result = run_equity(&request).unwrap();
        assert!(result.players[0].equity() > 0.60);
    }

    #[test]
    fn reproducible_given_identical_seed() {
        let make_request = || {
            EquityRequest::new(
                vec![
                    PlayerHand::Specific(hole(
                        Card::new(Rank::Ace, Suit::Clubs),
                        Card::new(Rank::King, Suit::Clubs),
                    )),
                    PlayerHand::Specific(hole(
                        Card::new(Rank::Queen, Suit::Diamonds),
                        Card::new(Rank::Queen, Suit::Hearts),
                    )),
                ],
                Board::try_new(vec![
                    Card::new(Rank::Two, Suit::Spades),
                    Card::new(Rank::Seven, Suit::Hearts),
                    Card::new(Rank::Jack, Suit::Clubs),
                ])
                .unwrap(),
                500,
                7,
            )
        };
        let a = run_equity(&make_request()).unwrap();
        let b = run_equity(&make_request()).unwrap();
        assert_eq!(a.players[0].equity_sum, b.players[0].equity_sum);
        assert_eq!(a.players[1].equity_sum, b.players[1].equity_sum);
    }

    #[test]
    fn equity_sums_to_one_across_players_on_completed_board() {
        let request = EquityRequest::new(
            vec![
                PlayerHand::Specific(hole(
                    Card::new(Rank::Ace, Suit::Spades),
                    Card::new(Rank::Two, Suit::Clubs),
                )),
                PlayerHand::Specific(hole(
                    Card::new(Rank::King, Suit::Diamonds),
                    Card::new(Rank::Queen, Suit::Hearts),
                )),
            ],
            Board::try_new(vec![
                Card::new(Rank::Three, Suit::Spades),
                Card::new(Rank::Four, Suit::Hearts),
                Card::new(Rank::Five, Suit::Clubs),
                Card::new(Rank::Nine, Suit::Diamonds),
                Card::new(Rank::Jack, Suit::Spades),
            ])
            .unwrap(),
            10,
            3,
        );
        let result = run_equity(&request).unwrap();
        let total: f64 = result.players.iter().map(|p| p.equity()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_too_few_players() {
        let request = EquityRequest::new(
            vec![PlayerHand::Specific(hole(
                Card::new(Rank::Ace, Suit::Spades),
                Card::new(Rank::King, Suit::Spades),
            ))],
            Board::try_new(Vec::new()).unwrap(),
            10,
            1,
        );
        assert!(matches!(run_equity(&request), Err(EquityError::InvalidPlayerCount(1))));
    }

    #[test]
    fn range_player_samples_from_canonical_hand_combos() {
        let aces: CanonicalHand = "AA".parse().unwrap();
        let request = EquityRequest::new(
            vec![
                PlayerHand::Range(vec![aces]),
                PlayerHand::Specific(hole(
                    Card::new(Rank::King, Suit::Spades),
                    Card::new(Rank::King, Suit::Hearts),
                )),
            ],
            Board::try_new(Vec::new()).unwrap(),
            300,
            11,
        );
        let result = run_equity(&request).unwrap();
        assert_eq!(result.trials_run, 300);
        assert!(result.players[0].equity() > 0.7);
    }

    #[test]
    fn convergence_trace_records_requested_points() {
        let mut request = EquityRequest::new(
            vec![
                PlayerHand::Specific(hole(
                    Card::new(Rank::Ace, Suit::Spades),
                    Card::new(Rank::Ace, Suit::Hearts),
                )),
                PlayerHand::Specific(hole(
                    Card::new(Rank::King, Suit::Spades),
                    Card::new(Rank::King, Suit::Hearts),
                )),
            ],
            Board::try_new(Vec::new()).unwrap(),
            200,
            5,
        );
        request.convergence_interval = 50;
        let result = run_equity(&request).unwrap();
        assert_eq!(result.convergence.len(), 4);
        assert_eq!(result.convergence.last().unwrap().trial, 200);
    }

    #[test]
    fn cancellation_stops_early_with_partial_trials() {
        let request = EquityRequest::new(
            vec![
                PlayerHand::Specific(hole(
                    Card::new(Rank::Ace, Suit::Spades),
                    Card::new(Rank::Ace, Suit::Hearts),
                )),
                PlayerHand::Specific(hole(
                    Card::new(Rank::King, Suit::Spades),
                    Card::new(Rank::King, Suit::Hearts),
                )),
            ],
            Board::try_new(Vec::new()).unwrap(),
            1_000_000,
            9,
        );
        let cancel = AtomicBool::new(true);
        let result = run_equity_cancellable(&request, Some(&cancel)).unwrap();
        assert_eq!(result.trials_run, 0);
    }
}
