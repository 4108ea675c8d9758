use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::due::DayWindow;
use crate::scheduler::ScheduleUpdate;

pub type DeckId = Uuid;
pub type CardId = Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: &str, description: &str) {
        self.name = name.to_string();
        self.description = description.to_string();
        self.updated_at = Utc::now();
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardContent {
    pub sentence: String,
    pub word: String,
    pub pronounce: String,
    pub meaning: String,
    pub translate: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub deck_id: DeckId,
    pub sentence: String,
    pub word: String,
    pub pronounce: String,
    pub meaning: String,
    pub translate: String,

    pub success_count: i64,
    pub next_date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(deck_id: DeckId, content: CardContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            sentence: content.sentence,
            word: content.word,
            pronounce: content.pronounce,
            meaning: content.meaning,
            translate: content.translate,
            success_count: 0,
            next_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn content(&self) -> CardContent {
        CardContent {
            sentence: self.sentence.clone(),
            word: self.word.clone(),
            pronounce: self.pronounce.clone(),
            meaning: self.meaning.clone(),
            translate: self.translate.clone(),
        }
    }

    pub fn set_content(&mut self, content: &CardContent) {
        self.sentence = content.sentence.clone();
        self.word = content.word.clone();
        self.pronounce = content.pronounce.clone();
        self.meaning = content.meaning.clone();
        self.translate = content.translate.clone();
        self.updated_at = Utc::now();
    }

    // Does not touch updated_at; only update_card does.
    pub fn set_schedule(&mut self, update: ScheduleUpdate) {
        self.success_count = update.success_count;
        self.next_date = update.next_date;
    }

    pub fn is_due(&self, window: &DayWindow) -> bool {
        window.contains(self.next_date)
    }
}
