//! Session-level transitions: unlock, reset and "study now".
//!
//! Every transition reads the current [`StudyState`] and returns a new one.
//! Callers commit the returned value; on error the current state stays as
//! it was.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use super::card::Card;
use super::catalog::{Catalog, DeckDefinition, DeckTheme};
use super::progression::{JudgedCards, ProgressionPolicy};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnlockError {
    #[error("Invalid code. Please try again.")]
    InvalidCode,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudyError {
    #[error("card not found: {0}")]
    CardNotFound(Uuid),
}

/// Metadata of the unlocked deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDeck {
    pub code: String,
    pub title: String,
    pub theme: DeckTheme,
    pub total_cards: usize,
}

impl ActiveDeck {
    fn from_definition(def: &DeckDefinition) -> Self {
        Self {
            code: def.code.clone(),
            title: def.title.clone(),
            theme: def.theme.clone(),
            total_cards: def.cards.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Page {
    Landing,
    Flashcards,
}

#[derive(Debug, Clone, Default)]
pub struct StudyState {
    pub active: Option<ActiveDeck>,
    pub deck: Vec<Card>,
    pub remembered: JudgedCards,
    pub forgotten: JudgedCards,
}

impl StudyState {
    /// The landing state: nothing unlocked.
    pub fn landing() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        if self.active.is_some() {
            Page::Flashcards
        } else {
            Page::Landing
        }
    }

    /// Cards eligible for display, front to back.
    pub fn visible<'a>(&'a self, policy: &ProgressionPolicy) -> &'a [Card] {
        let end = policy.visible_window.min(self.deck.len());
        &self.deck[..end]
    }

    /// An unlocked deck with nothing left to study.
    pub fn is_completed(&self) -> bool {
        self.active.is_some() && self.deck.is_empty()
    }
}

/// Start a fresh session for `code`.
pub fn unlock<R: Rng + ?Sized>(
    catalog: &Catalog,
    code: &str,
    rng: &mut R,
) -> Result<StudyState, UnlockError> {
    let def = catalog.lookup(code.trim()).ok_or(UnlockError::InvalidCode)?;

    let mut deck: Vec<Card> = def.cards.iter().map(Card::from_template).collect();
    deck.shuffle(rng);

    Ok(StudyState {
        active: Some(ActiveDeck::from_definition(def)),
        deck,
        remembered: JudgedCards::new(),
        forgotten: JudgedCards::new(),
    })
}

pub fn reset() -> StudyState {
    StudyState::landing()
}

/// Bring the card identified by `key` to the head of the deck.
///
/// Only cards still in the deck qualify; graduated cards stay out for the
/// rest of the session.
pub fn study_now(state: &StudyState, key: Uuid) -> Result<StudyState, StudyError> {
    let pos = state
        .deck
        .iter()
        .position(|c| c.key == key)
        .ok_or(StudyError::CardNotFound(key))?;

    let mut next = state.clone();
    let card = next.deck.remove(pos);
    next.deck.insert(0, card);
    Ok(next)
}
