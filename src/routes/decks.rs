use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::deck::{Card, CardTemplate, DeckDefinition, DeckTheme};
use crate::response::{ok, AppError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeckSummary<'a> {
    code: &'a str,
    title: &'a str,
    card_count: usize,
    sample_card: Option<&'a CardTemplate>,
    theme: &'a DeckTheme,
}

impl<'a> From<&'a DeckDefinition> for DeckSummary<'a> {
    fn from(def: &'a DeckDefinition) -> Self {
        Self {
            code: &def.code,
            title: &def.title,
            card_count: def.cards.len(),
            sample_card: def.sample_card(),
            theme: &def.theme,
        }
    }
}

/// A deck as it would look right after unlocking, before the shuffle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeckDetail<'a> {
    code: &'a str,
    title: &'a str,
    theme: &'a DeckTheme,
    cards: Vec<Card>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_decks))
        .route("/:code", get(get_deck))
}

async fn list_decks(State(state): State<AppState>) -> impl IntoResponse {
    let decks: Vec<DeckSummary<'_>> = state.catalog().iter().map(DeckSummary::from).collect();
    ok(decks)
}

async fn get_deck(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let def = state
        .catalog()
        .lookup(&code)
        .ok_or_else(|| AppError::not_found("DECK_NOT_FOUND", "Deck not found"))?;

    Ok(ok(DeckDetail {
        code: &def.code,
        title: &def.title,
        theme: &def.theme,
        cards: def.cards.iter().map(Card::from_template).collect(),
    }))
}
