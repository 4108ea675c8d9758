use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api::routes::{due_cards, list_decks, post_review, AppState};
use tango_core::{Deck, Repository};

pub async fn run(repo: Arc<dyn Repository>, addr: SocketAddr) -> anyhow::Result<()> {
    let state = Arc::new(AppState { repo });

    let app = Router::new()
        .route("/decks", get(list_decks))
        .route("/due", get(due_cards))
        .route("/review", post(post_review))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    tracing::info!(%addr, "tango api listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

pub async fn resolve_deck<R: Repository + ?Sized>(repo: &R, sel: &str) -> anyhow::Result<Deck> {
    if let Ok(id) = uuid::Uuid::parse_str(sel) {
        if let Ok(d) = repo.get_deck(id).await {
            return Ok(d);
        }
    }
    let decks = repo.list_decks().await?;
    if let Some(d) = decks.into_iter().find(|d| d.name.eq_ignore_ascii_case(sel)) {
        return Ok(d);
    }
    anyhow::bail!("deck not found")
}
