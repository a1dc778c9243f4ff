//! Card piles and movement between them.
//!
//! `Piles` holds the four combat piles as ordered `im::Vector`s so that
//! snapshotting a pile (card-target resolution) is O(1). A card instance
//! lives in exactly one pile at a time; membership is the location.
//!
//! ## Orientation
//!
//! Index 0 is the *top* of a pile. Drawing takes from the front of the
//! draw pile; the hand is ordered left (front) to right (back).

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardInstance, CardUid};
use crate::core::GameRng;

/// A named card pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pile {
    Hand,
    DrawPile,
    DiscardPile,
    ExhaustPile,
}

impl Pile {
    /// Search order used when a card must be located anywhere.
    pub const SEARCH_ORDER: [Pile; 4] = [Pile::Hand, Pile::DrawPile, Pile::DiscardPile, Pile::ExhaustPile];
}

/// Position for inserting a card into a pile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PilePosition {
    Top,
    #[default]
    Bottom,
    /// A uniformly random slot.
    Random,
}

/// The four combat piles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piles {
    pub hand: Vector<CardInstance>,
    pub draw_pile: Vector<CardInstance>,
    pub discard_pile: Vector<CardInstance>,
    pub exhaust_pile: Vector<CardInstance>,
}

impl Piles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, pile: Pile) -> &Vector<CardInstance> {
        match pile {
            Pile::Hand => &self.hand,
            Pile::DrawPile => &self.draw_pile,
            Pile::DiscardPile => &self.discard_pile,
            Pile::ExhaustPile => &self.exhaust_pile,
        }
    }

    pub fn get_mut(&mut self, pile: Pile) -> &mut Vector<CardInstance> {
        match pile {
            Pile::Hand => &mut self.hand,
            Pile::DrawPile => &mut self.draw_pile,
            Pile::DiscardPile => &mut self.discard_pile,
            Pile::ExhaustPile => &mut self.exhaust_pile,
        }
    }

    #[must_use]
    pub fn len(&self, pile: Pile) -> usize {
        self.get(pile).len()
    }

    /// Which pile a card is in, searching in `Pile::SEARCH_ORDER`.
    #[must_use]
    pub fn locate(&self, uid: CardUid) -> Option<Pile> {
        Pile::SEARCH_ORDER
            .into_iter()
            .find(|&pile| self.get(pile).iter().any(|c| c.uid == uid))
    }

    #[must_use]
    pub fn contains(&self, pile: Pile, uid: CardUid) -> bool {
        self.get(pile).iter().any(|c| c.uid == uid)
    }

    /// Find a card anywhere.
    #[must_use]
    pub fn find(&self, uid: CardUid) -> Option<&CardInstance> {
        let pile = self.locate(uid)?;
        self.get(pile).iter().find(|c| c.uid == uid)
    }

    /// Mutable access to a card wherever it is.
    pub fn find_mut(&mut self, uid: CardUid) -> Option<&mut CardInstance> {
        let pile = self.locate(uid)?;
        self.get_mut(pile).iter_mut().find(|c| c.uid == uid)
    }

    /// Remove a card from a specific pile.
    pub fn take_from(&mut self, pile: Pile, uid: CardUid) -> Option<CardInstance> {
        let cards = self.get_mut(pile);
        let index = cards.iter().position(|c| c.uid == uid)?;
        Some(cards.remove(index))
    }

    /// Remove a card from whichever pile holds it (first match in search order).
    pub fn take(&mut self, uid: CardUid) -> Option<(Pile, CardInstance)> {
        let pile = self.locate(uid)?;
        self.take_from(pile, uid).map(|card| (pile, card))
    }

    /// Insert a card into a pile.
    pub fn put(&mut self, pile: Pile, card: CardInstance, position: PilePosition, rng: &mut GameRng) {
        let cards = self.get_mut(pile);
        match position {
            PilePosition::Top => cards.push_front(card),
            PilePosition::Bottom => cards.push_back(card),
            PilePosition::Random => {
                let slot = rng.index(cards.len() + 1).unwrap_or(0);
                cards.insert(slot, card);
            }
        }
    }

    /// Move a card to another pile. Returns the pile it came from.
    pub fn move_card(
        &mut self,
        uid: CardUid,
        to: Pile,
        position: PilePosition,
        rng: &mut GameRng,
    ) -> Option<Pile> {
        let (from, card) = self.take(uid)?;
        self.put(to, card, position, rng);
        Some(from)
    }

    /// Remove and return the top card of the draw pile.
    pub fn pop_draw(&mut self) -> Option<CardInstance> {
        self.draw_pile.pop_front()
    }

    /// Shuffle a pile in place.
    pub fn shuffle(&mut self, pile: Pile, rng: &mut GameRng) {
        let cards = self.get_mut(pile);
        let mut order: Vec<CardInstance> = cards.iter().cloned().collect();
        rng.shuffle(&mut order);
        *cards = order.into_iter().collect();
    }

    /// Move the whole discard pile into the draw pile and shuffle it.
    ///
    /// Returns how many cards were moved.
    pub fn reshuffle_discard(&mut self, rng: &mut GameRng) -> usize {
        let moved = self.discard_pile.len();
        if moved == 0 {
            return 0;
        }
        let discard = std::mem::take(&mut self.discard_pile);
        self.draw_pile.append(discard);
        self.shuffle(Pile::DrawPile, rng);
        moved
    }

    /// Total cards across all piles.
    #[must_use]
    pub fn total(&self) -> usize {
        Pile::SEARCH_ORDER.iter().map(|&p| self.len(p)).sum()
    }
}
