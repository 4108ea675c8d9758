use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tango_core::{
    repo::Repository, Card, CardContent, CardId, CoreError, DayWindow, Deck, DeckId,
    ScheduleUpdate,
};

pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let repo = Self { pool };
        repo.ensure_schema().await?;
        Ok(repo)
    }

    pub async fn open_memory() -> Result<Self, CoreError> {
        // One connection: every handle must see the same in-memory database.
        let opts = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let repo = Self { pool };
        repo.ensure_schema().await?;
        Ok(repo)
    }

    async fn ensure_schema(&self) -> Result<(), CoreError> {
        // Create tables/indexes if they do not exist (mirrors migrations).
        const STMT: &str = r#"
        CREATE TABLE IF NOT EXISTS decks (
          id           TEXT PRIMARY KEY,
          name         TEXT NOT NULL,
          description  TEXT NOT NULL DEFAULT '',
          created_at   TEXT NOT NULL,
          updated_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cards (
          id             TEXT PRIMARY KEY,
          deck_id        TEXT NOT NULL,
          sentence       TEXT NOT NULL,
          word           TEXT NOT NULL,
          pronounce      TEXT NOT NULL,
          meaning        TEXT NOT NULL,
          translate      TEXT NOT NULL,
          success_count  INTEGER NOT NULL DEFAULT 0,
          next_date      TEXT NOT NULL,
          created_at     TEXT NOT NULL,
          updated_at     TEXT NOT NULL,
          FOREIGN KEY(deck_id) REFERENCES decks(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_cards_deck_next ON cards (deck_id, next_date);
        "#;

        // Execute statements one by one for compatibility.
        for chunk in STMT.split(';') {
            let sql = chunk.trim();
            if sql.is_empty() {
                continue;
            }
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|_| CoreError::Storage("sqlite schema"))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Repository for SqliteRepo {
    // ===== Decks =====
    async fn create_deck(&self, name: &str, description: &str) -> Result<Deck, CoreError> {
        let deck = Deck::new(name, description);
        sqlx::query(
            "INSERT INTO decks (id,name,description,created_at,updated_at) VALUES (?,?,?,?,?)",
        )
        .bind(deck.id.to_string())
        .bind(&deck.name)
        .bind(&deck.description)
        .bind(dt_to_str(deck.created_at))
        .bind(dt_to_str(deck.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("insert deck"))?;
        Ok(deck)
    }

    async fn get_deck(&self, id: DeckId) -> Result<Deck, CoreError> {
        let row = sqlx::query(
            "SELECT id,name,description,created_at,updated_at FROM decks WHERE id=?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("read deck"))?
        .ok_or(CoreError::NotFound("deck"))?;
        row_into_deck(row)
    }

    async fn list_decks(&self) -> Result<Vec<Deck>, CoreError> {
        let rows = sqlx::query("SELECT id,name,description,created_at,updated_at FROM decks")
            .fetch_all(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("read decks"))?;
        rows.into_iter().map(row_into_deck).collect()
    }

    async fn update_deck(
        &self,
        id: DeckId,
        name: &str,
        description: &str,
    ) -> Result<Deck, CoreError> {
        let mut deck = self.get_deck(id).await?;
        deck.rename(name, description);
        sqlx::query("UPDATE decks SET name=?, description=?, updated_at=? WHERE id=?")
            .bind(&deck.name)
            .bind(&deck.description)
            .bind(dt_to_str(deck.updated_at))
            .bind(deck.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("update deck"))?;
        Ok(deck)
    }

    async fn delete_deck(&self, id: DeckId) -> Result<(), CoreError> {
        let res = sqlx::query("DELETE FROM decks WHERE id=?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("delete deck"))?;
        if res.rows_affected() == 0 {
            return Err(CoreError::NotFound("deck"));
        }
        Ok(())
    }

    // ===== Cards =====
    async fn create_card(
        &self,
        deck_id: DeckId,
        content: &CardContent,
    ) -> Result<Card, CoreError> {
        let exists = sqlx::query("SELECT 1 FROM decks WHERE id=? LIMIT 1")
            .bind(deck_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("read deck"))?;
        if exists.is_none() {
            return Err(CoreError::NotFound("deck"));
        }

        let card = Card::new(deck_id, content.clone());
        sqlx::query(
            "INSERT INTO cards \
             (id,deck_id,sentence,word,pronounce,meaning,translate,success_count,next_date,created_at,updated_at) \
             VALUES (?,?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(card.id.to_string())
        .bind(card.deck_id.to_string())
        .bind(&card.sentence)
        .bind(&card.word)
        .bind(&card.pronounce)
        .bind(&card.meaning)
        .bind(&card.translate)
        .bind(card.success_count)
        .bind(dt_to_str(card.next_date))
        .bind(dt_to_str(card.created_at))
        .bind(dt_to_str(card.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("insert card"))?;
        Ok(card)
    }

    async fn get_card(&self, id: CardId) -> Result<Card, CoreError> {
        let row = sqlx::query("SELECT * FROM cards WHERE id=?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("read card"))?
            .ok_or(CoreError::NotFound("card"))?;
        row_into_card(row)
    }

    async fn list_cards(&self, deck_id: DeckId) -> Result<Vec<Card>, CoreError> {
        let rows = sqlx::query("SELECT * FROM cards WHERE deck_id=? ORDER BY created_at DESC")
            .bind(deck_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("read cards"))?;
        rows.into_iter().map(row_into_card).collect()
    }

    async fn update_card(&self, id: CardId, content: &CardContent) -> Result<Card, CoreError> {
        let mut card = self.get_card(id).await?;
        card.set_content(content);
        sqlx::query(
            "UPDATE cards SET sentence=?, word=?, pronounce=?, meaning=?, translate=?, updated_at=? WHERE id=?",
        )
        .bind(&card.sentence)
        .bind(&card.word)
        .bind(&card.pronounce)
        .bind(&card.meaning)
        .bind(&card.translate)
        .bind(dt_to_str(card.updated_at))
        .bind(card.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("update card"))?;
        Ok(card)
    }

    async fn delete_card(&self, id: CardId) -> Result<(), CoreError> {
        let res = sqlx::query("DELETE FROM cards WHERE id=?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("delete card"))?;
        if res.rows_affected() == 0 {
            return Err(CoreError::NotFound("card"));
        }
        Ok(())
    }

    // ===== Scheduling =====
    async fn fetch_due_cards(
        &self,
        deck_id: DeckId,
        window: DayWindow,
    ) -> Result<Vec<Card>, CoreError> {
        let rows = sqlx::query(
            "SELECT * FROM cards WHERE deck_id=? AND next_date >= ? AND next_date <= ?",
        )
        .bind(deck_id.to_string())
        .bind(dt_to_str(window.start))
        .bind(dt_to_str(window.end))
        .fetch_all(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("read due cards"))?;
        rows.into_iter().map(row_into_card).collect()
    }

    async fn persist_schedule(
        &self,
        deck_id: DeckId,
        card_id: CardId,
        update: ScheduleUpdate,
    ) -> Result<(), CoreError> {
        let res = sqlx::query(
            "UPDATE cards SET success_count=?, next_date=? WHERE id=? AND deck_id=?",
        )
        .bind(update.success_count)
        .bind(dt_to_str(update.next_date))
        .bind(card_id.to_string())
        .bind(deck_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("update schedule"))?;
        if res.rows_affected() == 0 {
            return Err(CoreError::NotFound("card"));
        }
        Ok(())
    }
}

// ===== Helpers =====
fn uuid_from_str(s: String) -> Result<uuid::Uuid, CoreError> {
    uuid::Uuid::parse_str(&s).map_err(|_| CoreError::Invalid("uuid"))
}

// Fixed subsecond width keeps lexicographic order equal to instant order,
// which the due-window range predicate relies on; nanoseconds roundtrip
// `Utc::now()` exactly.
fn dt_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn dt_from_str(s: String) -> Result<DateTime<Utc>, CoreError> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map_err(|_| CoreError::Invalid("datetime"))
        .map(|dt| dt.with_timezone(&Utc))
}

fn row_into_deck(row: SqliteRow) -> Result<Deck, CoreError> {
    Ok(Deck {
        id: uuid_from_str(row.get::<String, _>("id"))?,
        name: row.get::<String, _>("name"),
        description: row.get::<String, _>("description"),
        created_at: dt_from_str(row.get::<String, _>("created_at"))?,
        updated_at: dt_from_str(row.get::<String, _>("updated_at"))?,
    })
}

fn row_into_card(row: SqliteRow) -> Result<Card, CoreError> {
    Ok(Card {
        id: uuid_from_str(row.get::<String, _>("id"))?,
        deck_id: uuid_from_str(row.get::<String, _>("deck_id"))?,
        sentence: row.get::<String, _>("sentence"),
        word: row.get::<String, _>("word"),
        pronounce: row.get::<String, _>("pronounce"),
        meaning: row.get::<String, _>("meaning"),
        translate: row.get::<String, _>("translate"),
        success_count: row.get::<i64, _>("success_count"),
        next_date: dt_from_str(row.get::<String, _>("next_date"))?,
        created_at: dt_from_str(row.get::<String, _>("created_at"))?,
        updated_at: dt_from_str(row.get::<String, _>("updated_at"))?,
    })
}
