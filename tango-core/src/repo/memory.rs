use crate::{Card, CardContent, CardId, CoreError, DayWindow, Deck, DeckId, ScheduleUpdate};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryRepo {
    decks: RwLock<HashMap<DeckId, Deck>>,
    cards: RwLock<HashMap<CardId, Card>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl crate::repo::Repository for MemoryRepo {
    async fn create_deck(&self, name: &str, description: &str) -> Result<Deck, CoreError> {
        let deck = Deck::new(name, description);
        self.decks.write().insert(deck.id, deck.clone());
        Ok(deck)
    }

    async fn get_deck(&self, id: DeckId) -> Result<Deck, CoreError> {
        self.decks
            .read()
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound("deck"))
    }

    async fn list_decks(&self) -> Result<Vec<Deck>, CoreError> {
        Ok(self.decks.read().values().cloned().collect())
    }

    async fn update_deck(
        &self,
        id: DeckId,
        name: &str,
        description: &str,
    ) -> Result<Deck, CoreError> {
        let mut m = self.decks.write();
        let Some(deck) = m.get_mut(&id) else {
            return Err(CoreError::NotFound("deck"));
        };
        deck.rename(name, description);
        Ok(deck.clone())
    }

    async fn delete_deck(&self, id: DeckId) -> Result<(), CoreError> {
        self.decks
            .write()
            .remove(&id)
            .ok_or(CoreError::NotFound("deck"))?;
        self.cards.write().retain(|_, c| c.deck_id != id);
        Ok(())
    }

    async fn create_card(
        &self,
        deck_id: DeckId,
        content: &CardContent,
    ) -> Result<Card, CoreError> {
        if !self.decks.read().contains_key(&deck_id) {
            return Err(CoreError::NotFound("deck"));
        }
        let card = Card::new(deck_id, content.clone());
        self.cards.write().insert(card.id, card.clone());
        Ok(card)
    }

    async fn get_card(&self, id: CardId) -> Result<Card, CoreError> {
        self.cards
            .read()
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound("card"))
    }

    async fn list_cards(&self, deck_id: DeckId) -> Result<Vec<Card>, CoreError> {
        let cards = self.cards.read();
        let mut v: Vec<Card> = cards
            .values()
            .filter(|c| c.deck_id == deck_id)
            .cloned()
            .collect();
        v.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(v)
    }

    async fn update_card(&self, id: CardId, content: &CardContent) -> Result<Card, CoreError> {
        let mut m = self.cards.write();
        let Some(card) = m.get_mut(&id) else {
            return Err(CoreError::NotFound("card"));
        };
        card.set_content(content);
        Ok(card.clone())
    }

    async fn delete_card(&self, id: CardId) -> Result<(), CoreError> {
        self.cards
            .write()
            .remove(&id)
            .ok_or(CoreError::NotFound("card"))?;
        Ok(())
    }

    async fn fetch_due_cards(
        &self,
        deck_id: DeckId,
        window: DayWindow,
    ) -> Result<Vec<Card>, CoreError> {
        let cards = self.cards.read();
        Ok(cards
            .values()
            .filter(|c| c.deck_id == deck_id && c.is_due(&window))
            .cloned()
            .collect())
    }

    async fn persist_schedule(
        &self,
        deck_id: DeckId,
        card_id: CardId,
        update: ScheduleUpdate,
    ) -> Result<(), CoreError> {
        let mut m = self.cards.write();
        let Some(card) = m.get_mut(&card_id) else {
            return Err(CoreError::NotFound("card"));
        };
        if card.deck_id != deck_id {
            return Err(CoreError::NotFound("card"));
        }
        card.set_schedule(update);
        Ok(())
    }
}
