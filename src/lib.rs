//! holdem-core: Texas Hold'em analytics primitives
//!
//! Goals:
//! - Deterministic, fast hand evaluation for Texas Hold'em
//! - Small, well-documented public API
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! This crate is a pure computation library: no I/O, no game-state
//! sequencing, no betting logic. It answers four questions:
//! "what beats what" ([`evaluator`]), "which of the 169 strategically
//! distinct starting hands is this" ([`canonical`]), "what draws does
//! this hand have" ([`draws`]), and "what is each player's equity under
//! repeated random runouts" ([`equity`]).
//!
//! ## Quick start: evaluate a Hold'em hand
//! ```
//! use holdem_core::cards::{Card, Rank, Suit};
//! use holdem_core::evaluator::{evaluate_holdem, Category};
//! use holdem_core::hand::{Board, HoleCards};
//!
//! let hole = HoleCards::try_new(
//!     Card::new(Rank::Ace, Suit::Spades),
//!     Card::new(Rank::Ace, Suit::Hearts),
//! ).unwrap();
//! let board = Board::try_new(vec![
//!     Card::new(Rank::King, Suit::Clubs),
//!     Card::new(Rank::Queen, Suit::Diamonds),
//!     Card::new(Rank::Jack, Suit::Hearts),
//!     Card::new(Rank::Three, Suit::Spades),
//!     Card::new(Rank::Two, Suit::Clubs),
//! ]).unwrap();
//!
//! let eval = evaluate_holdem(&hole, &board).unwrap();
//! assert_eq!(eval.category, Category::Pair);
//! ```

pub mod canonical;
pub mod cards;
pub mod deck;
pub mod draws;
pub mod equity;
pub mod evaluator;
pub mod hand;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
