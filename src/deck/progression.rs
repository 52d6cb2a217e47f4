//! Deck progression: what a single swipe does to the pending deck and to the
//! remembered/forgotten collections.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use super::card::Card;
use super::session::StudyState;
use crate::constants::{
    DEFAULT_FORGOTTEN_REQUEUE_DEPTH, DEFAULT_GRADUATION_LEVEL, DEFAULT_VISIBLE_WINDOW,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// "forgotten"
    Left,
    /// "remembered"
    Right,
}

impl SwipeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Tunable constants of the requeue heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionPolicy {
    /// A card leaves the deck once a right swipe brings it to this level.
    pub graduation_level: u32,
    /// A forgotten card is reinserted this many slots behind the new head.
    pub forgotten_requeue_depth: usize,
    pub visible_window: usize,
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            graduation_level: DEFAULT_GRADUATION_LEVEL,
            forgotten_requeue_depth: DEFAULT_FORGOTTEN_REQUEUE_DEPTH,
            visible_window: DEFAULT_VISIBLE_WINDOW,
        }
    }
}

/// Ordered collection holding at most one card per front text.
///
/// Insertion order is tracked with a sequence number so eviction by front
/// text does not need a linear scan.
#[derive(Debug, Clone, Default)]
pub struct JudgedCards {
    next_seq: u64,
    entries: BTreeMap<u64, Card>,
    by_front: HashMap<String, u64>,
}

impl JudgedCards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `card`, evicting any older entry with the same front text.
    pub fn push(&mut self, card: Card) {
        self.remove_front(&card.front);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_front.insert(card.front.clone(), seq);
        self.entries.insert(seq, card);
    }

    pub fn remove_front(&mut self, front: &str) -> Option<Card> {
        let seq = self.by_front.remove(front)?;
        self.entries.remove(&seq)
    }

    pub fn contains_front(&self, front: &str) -> bool {
        self.by_front.contains_key(front)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for JudgedCards {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Placement {
    Requeued { position: usize },
    Graduated,
}

/// What happened to the swiped card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeReport {
    pub key: Uuid,
    pub front: String,
    pub direction: SwipeDirection,
    pub level: u32,
    pub placement: Placement,
}

/// Apply a swipe to the head of the deck.
///
/// Returns the next state; the input is never modified. An empty deck is a
/// no-op and yields no report.
pub fn apply_swipe(
    state: &StudyState,
    direction: SwipeDirection,
    policy: &ProgressionPolicy,
) -> (StudyState, Option<SwipeReport>) {
    let Some((head, rest)) = state.deck.split_first() else {
        return (state.clone(), None);
    };

    let mut deck = rest.to_vec();
    let mut remembered = state.remembered.clone();
    let mut forgotten = state.forgotten.clone();
    remembered.remove_front(&head.front);
    forgotten.remove_front(&head.front);

    let (swiped, placement) = match direction {
        SwipeDirection::Left => {
            let swiped = head.forgotten();
            let position = policy.forgotten_requeue_depth.min(deck.len());
            deck.insert(position, swiped.clone());
            forgotten.push(swiped.clone());
            (swiped, Placement::Requeued { position })
        }
        SwipeDirection::Right => {
            let swiped = head.remembered();
            remembered.push(swiped.clone());
            if swiped.level < policy.graduation_level {
                deck.push(swiped.clone());
                let position = deck.len() - 1;
                (swiped, Placement::Requeued { position })
            } else {
                (swiped, Placement::Graduated)
            }
        }
    };

    let report = SwipeReport {
        key: swiped.key,
        front: swiped.front,
        direction,
        level: swiped.level,
        placement,
    };

    let next = StudyState {
        active: state.active.clone(),
        deck,
        remembered,
        forgotten,
    };
    (next, Some(report))
}
