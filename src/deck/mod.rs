pub mod card;
pub mod catalog;
pub mod progression;
pub mod session;

pub use card::{Card, CardFaces, CardStatus, CardTemplate};
pub use catalog::{Catalog, DeckDefinition, DeckTheme};
pub use progression::{apply_swipe, JudgedCards, ProgressionPolicy, SwipeDirection, SwipeReport};
pub use session::{reset, study_now, unlock, ActiveDeck, Page, StudyError, StudyState, UnlockError};
