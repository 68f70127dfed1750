use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("card not available in deck: {0}")]
    UnavailableCard(Card),
}

/// A standard 52-card deck with draw/remove/peek/reset semantics.
///
/// Cards removed with [`Deck::remove`] are excluded from the deck even across
/// [`Deck::reset`] (they represent cards known to be out of play, e.g. burned
/// or folded). Cards taken with [`Deck::draw`]/[`Deck::draw_n`] are merely
/// dealt and return to the deck on [`Deck::reset`].
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    removed: HashSet<Card>,
}

impl Deck {
    /// ```
    /// use holdem_core::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for &s in &Suit::ALL {
            for &r in &Rank::ALL {
                cards.push(Card::new(r, s));
            }
        }
        Self { cards, removed: HashSet::new() }
    }

    /// Number of cards still available to draw.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Shuffle using the provided RNG implementing Rng.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.draw()).collect()
    }

    /// Look at the top `n` cards without removing them from the deck.
    /// Returns fewer than `n` cards if the deck holds less.
    pub fn peek(&self, n: usize) -> &[Card] {
        let len = self.cards.len();
        let start = len.saturating_sub(n);
        &self.cards[start..]
    }

    /// Permanently exclude a specific card (e.g. a known dead card) from the
    /// deck. Unlike [`Deck::draw`], a removed card does not return on
    /// [`Deck::reset`].
    pub fn remove(&mut self, card: Card) -> Result<(), DeckError> {
        let pos =
            self.cards.iter().position(|&c| c == card).ok_or(DeckError::UnavailableCard(card))?;
        self.cards.remove(pos);
        self.removed.insert(card);
        Ok(())
    }

    /// Rebuild the deck to a fresh 52 cards minus every card ever
    /// [`Deck::remove`]d. Previously-[`Deck::draw`]n cards return to the
    /// deck; removed cards do not.
    pub fn reset(&mut self) {
        self.cards.clear();
        for &s in &Suit::ALL {
            for &r in &Rank::ALL {
                let card = Card::new(r, s);
                if !self.removed.contains(&card) {
                    self.cards.push(card);
                }
            }
        }
    }
}
