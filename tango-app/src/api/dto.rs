use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tango_core::{Card, Deck, Outcome};

#[derive(Serialize)]
pub struct DeckOut {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Deck> for DeckOut {
    fn from(d: Deck) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            created_at: d.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CardOut {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub sentence: String,
    pub word: String,
    pub pronounce: String,
    pub meaning: String,
    pub translate: String,
    pub success_count: i64,
    pub next_date: DateTime<Utc>,
}

impl From<Card> for CardOut {
    fn from(c: Card) -> Self {
        Self {
            id: c.id,
            deck_id: c.deck_id,
            sentence: c.sentence,
            word: c.word,
            pronounce: c.pronounce,
            meaning: c.meaning,
            translate: c.translate,
            success_count: c.success_count,
            next_date: c.next_date,
        }
    }
}

#[derive(Deserialize)]
pub struct ReviewIn {
    pub deck_id: Uuid,
    pub card_id: Uuid,
    pub outcome: String,
}

pub fn parse_outcome(s: &str) -> Option<Outcome> {
    match s.to_lowercase().as_str() {
        "p" | "pass" | "easy" => Some(Outcome::Pass),
        "f" | "fail" | "again" => Some(Outcome::Fail),
        _ => None,
    }
}
