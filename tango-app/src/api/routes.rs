use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use chrono::Local;
use tango_core::{next_review, DayWindow};

use crate::api::dto::{parse_outcome, CardOut, DeckOut, ReviewIn};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn tango_core::Repository>,
}

#[derive(Deserialize)]
pub struct DueQuery {
    deck: String,
}

pub async fn list_decks(State(st): State<Arc<AppState>>) -> Result<Json<Vec<DeckOut>>, StatusCode> {
    let mut decks = st
        .repo
        .list_decks()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    decks.sort_by_key(|d| d.created_at);
    Ok(Json(decks.into_iter().map(DeckOut::from).collect()))
}

pub async fn due_cards(
    State(st): State<Arc<AppState>>,
    Query(q): Query<DueQuery>,
) -> Result<Json<Vec<CardOut>>, StatusCode> {
    let deck = super::server::resolve_deck(&*st.repo, &q.deck)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let window = DayWindow::containing(&Local::now());
    let due = st
        .repo
        .fetch_due_cards(deck.id, window)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(due.into_iter().map(CardOut::from).collect()))
}

pub async fn post_review(
    State(st): State<Arc<AppState>>,
    Json(body): Json<ReviewIn>,
) -> Result<StatusCode, StatusCode> {
    let outcome = parse_outcome(&body.outcome).ok_or(StatusCode::BAD_REQUEST)?;
    let card = st
        .repo
        .get_card(body.card_id)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    if card.deck_id != body.deck_id {
        return Err(StatusCode::BAD_REQUEST);
    }
    let update = next_review(card.success_count, outcome, chrono::Utc::now())
        .map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;
    st.repo
        .persist_schedule(card.deck_id, card.id, update)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    tracing::debug!(card = %card.id, outcome = ?outcome, "review recorded");
    Ok(StatusCode::NO_CONTENT)
}
