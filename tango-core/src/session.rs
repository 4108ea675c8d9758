use crate::scheduler;
use crate::{Card, CoreError, DayWindow, DeckId, Outcome, Repository};
use chrono::{DateTime, FixedOffset, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::sync::Arc;

pub struct ReviewSession {
    repo: Arc<dyn Repository>,
    deck_id: DeckId,
    rng: StdRng,
    state: SessionState,
}

enum SessionState {
    Presenting {
        card: Card,
        answer_revealed: bool,
        remaining: usize,
    },
    Finished,
}

pub struct SessionView<'a> {
    pub card: Option<&'a Card>,
    pub answer_revealed: bool,
    pub remaining: usize,
}

impl ReviewSession {
    pub async fn start(
        repo: Arc<dyn Repository>,
        deck_id: DeckId,
        now: DateTime<FixedOffset>,
    ) -> Result<Self, CoreError> {
        Self::with_rng(repo, deck_id, now, StdRng::from_os_rng()).await
    }

    pub async fn start_with_seed(
        repo: Arc<dyn Repository>,
        deck_id: DeckId,
        now: DateTime<FixedOffset>,
        seed: u64,
    ) -> Result<Self, CoreError> {
        Self::with_rng(repo, deck_id, now, StdRng::seed_from_u64(seed)).await
    }

    async fn with_rng(
        repo: Arc<dyn Repository>,
        deck_id: DeckId,
        now: DateTime<FixedOffset>,
        rng: StdRng,
    ) -> Result<Self, CoreError> {
        let mut session = Self {
            repo,
            deck_id,
            rng,
            state: SessionState::Finished,
        };
        session.load(now).await?;
        Ok(session)
    }

    // Re-fetch the due set and draw the next card; empty set ends the session.
    async fn load(&mut self, now: DateTime<FixedOffset>) -> Result<(), CoreError> {
        let window = DayWindow::containing(&now);
        let due = self.repo.fetch_due_cards(self.deck_id, window).await?;
        self.state = match due.choose(&mut self.rng) {
            Some(card) => SessionState::Presenting {
                card: card.clone(),
                answer_revealed: false,
                remaining: due.len(),
            },
            None => SessionState::Finished,
        };
        Ok(())
    }

    pub fn reveal_answer(&mut self) {
        if let SessionState::Presenting {
            answer_revealed, ..
        } = &mut self.state
        {
            *answer_revealed = true;
        }
    }

    pub fn hide_answer(&mut self) {
        if let SessionState::Presenting {
            answer_revealed, ..
        } = &mut self.state
        {
            *answer_revealed = false;
        }
    }

    pub async fn grade(
        &mut self,
        outcome: Outcome,
        now: DateTime<FixedOffset>,
    ) -> Result<(), CoreError> {
        let SessionState::Presenting { card, .. } = &self.state else {
            return Err(CoreError::Invalid("session is finished"));
        };
        let update = scheduler::next_review(card.success_count, outcome, now.with_timezone(&Utc))?;
        self.repo
            .persist_schedule(self.deck_id, card.id, update)
            .await?;
        self.load(now).await
    }

    pub fn current_view(&self) -> SessionView<'_> {
        match &self.state {
            SessionState::Presenting {
                card,
                answer_revealed,
                remaining,
            } => SessionView {
                card: Some(card),
                answer_revealed: *answer_revealed,
                remaining: *remaining,
            },
            SessionState::Finished => SessionView {
                card: None,
                answer_revealed: false,
                remaining: 0,
            },
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished)
    }

    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }
}
