use crate::{Card, CardContent, CardId, CoreError, DayWindow, Deck, DeckId, ScheduleUpdate};
use async_trait::async_trait;

pub mod memory;

#[async_trait]
pub trait Repository: Send + Sync {
    // Decks
    async fn create_deck(&self, name: &str, description: &str) -> Result<Deck, CoreError>;
    async fn get_deck(&self, id: DeckId) -> Result<Deck, CoreError>;
    async fn list_decks(&self) -> Result<Vec<Deck>, CoreError>;
    async fn update_deck(&self, id: DeckId, name: &str, description: &str)
        -> Result<Deck, CoreError>;
    async fn delete_deck(&self, id: DeckId) -> Result<(), CoreError>;

    // Cards
    async fn create_card(&self, deck_id: DeckId, content: &CardContent)
        -> Result<Card, CoreError>;
    async fn get_card(&self, id: CardId) -> Result<Card, CoreError>;
    // Newest first
    async fn list_cards(&self, deck_id: DeckId) -> Result<Vec<Card>, CoreError>;
    async fn update_card(&self, id: CardId, content: &CardContent) -> Result<Card, CoreError>;
    async fn delete_card(&self, id: CardId) -> Result<(), CoreError>;

    // Scheduling
    async fn fetch_due_cards(
        &self,
        deck_id: DeckId,
        window: DayWindow,
    ) -> Result<Vec<Card>, CoreError>;
    // Writes exactly success_count and next_date, nothing else
    async fn persist_schedule(
        &self,
        deck_id: DeckId,
        card_id: CardId,
        update: ScheduleUpdate,
    ) -> Result<(), CoreError>;
}
