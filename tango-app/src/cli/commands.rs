use crate::api::server as api_server;
use crate::cli::opts::*;

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tango_core::{
    pass_interval_days, CardContent, DayWindow, Deck, Outcome, Repository, ReviewSession,
};
use tango_json::paths::data_root;
use tango_json::JsonStore;
use tango_sqlite::SqliteRepo;
use uuid::Uuid;

pub async fn run_cli(args: Cli) -> Result<()> {
    let repo = open_repo(&args.store, args.db_path.clone()).await?;
    match args.cmd.clone() {
        Command::Deck(cmd) => deck_cmd(repo, cmd).await,
        Command::Card(cmd) => card_cmd(repo, cmd).await,
        Command::Due(cmd) => due_cmd(repo, cmd).await,
        Command::Study(cmd) => study_cmd(repo, cmd).await,
        Command::Api(api) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug")),
                )
                .init();
            let addr: std::net::SocketAddr = api.addr.parse()?;
            api_server::run(repo, addr).await
        }
    }
}

pub async fn open_repo(store: &StoreKind, db_path: Option<PathBuf>) -> Result<Arc<dyn Repository>> {
    match store {
        StoreKind::Json => {
            let s = JsonStore::open_default().await?;
            Ok(Arc::new(s))
        }
        StoreKind::Sqlite => {
            let p = db_path.unwrap_or_else(|| data_root().join("tango.sqlite3"));
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let s = SqliteRepo::open_file(&p).await?;
            Ok(Arc::new(s))
        }
    }
}

async fn deck_cmd(repo: Arc<dyn Repository>, cmd: DeckCmd) -> Result<()> {
    match cmd {
        DeckCmd::Add { name, description } => {
            let d = repo.create_deck(&name, &description).await?;
            println!("{}", d.id);
        }
        DeckCmd::List => {
            let mut v = repo.list_decks().await?;
            v.sort_by_key(|d| d.created_at);
            for d in v {
                println!("{}\t{}\t{}", d.id, d.name, d.description);
            }
        }
        DeckCmd::Edit { deck, name, description } => {
            let d = resolve_deck(&*repo, &deck).await?;
            let name = name.unwrap_or_else(|| d.name.clone());
            let description = description.unwrap_or_else(|| d.description.clone());
            repo.update_deck(d.id, &name, &description).await?;
            println!("ok");
        }
        DeckCmd::Rm { deck } => {
            let d = resolve_deck(&*repo, &deck).await?;
            repo.delete_deck(d.id).await?;
            println!("ok");
        }
    }
    Ok(())
}

async fn card_cmd(repo: Arc<dyn Repository>, cmd: CardCmd) -> Result<()> {
    match cmd {
        CardCmd::Add(a) => {
            let deck = resolve_deck(&*repo, &a.deck).await?;
            let content = CardContent {
                sentence: a.sentence,
                word: a.word,
                pronounce: a.pronounce,
                meaning: a.meaning,
                translate: a.translate,
            };
            let c = repo.create_card(deck.id, &content).await?;
            println!("{}", c.id);
        }
        CardCmd::List { deck } => {
            let deck = resolve_deck(&*repo, &deck).await?;
            for c in repo.list_cards(deck.id).await? {
                println!(
                    "{}\t{}\t{}\tstreak={}\tdue={}",
                    c.id,
                    c.word,
                    c.sentence,
                    c.success_count,
                    c.next_date.with_timezone(&Local).format("%Y-%m-%d")
                );
            }
        }
        CardCmd::Edit(e) => {
            let id = parse_uuid(&e.card_id)?;
            let card = repo.get_card(id).await?;
            let mut content = card.content();
            if let Some(s) = e.sentence { content.sentence = s; }
            if let Some(w) = e.word { content.word = w; }
            if let Some(p) = e.pronounce { content.pronounce = p; }
            if let Some(m) = e.meaning { content.meaning = m; }
            if let Some(t) = e.translate { content.translate = t; }
            repo.update_card(id, &content).await?;
            println!("ok");
        }
        CardCmd::Rm { card_id } => {
            repo.delete_card(parse_uuid(&card_id)?).await?;
            println!("ok");
        }
    }
    Ok(())
}

async fn due_cmd(repo: Arc<dyn Repository>, cmd: DueCmd) -> Result<()> {
    let deck = resolve_deck(&*repo, &cmd.deck).await?;
    let window = DayWindow::containing(&Local::now());
    let due = repo.fetch_due_cards(deck.id, window).await?;
    for c in &due {
        println!("{}\t{}\tstreak={}", c.id, c.word, c.success_count);
    }
    println!("{} due today in {}", due.len(), deck.name);
    Ok(())
}

async fn study_cmd(repo: Arc<dyn Repository>, cmd: StudyCmd) -> Result<()> {
    let deck = resolve_deck(&*repo, &cmd.deck).await?;
    let now = Local::now().fixed_offset();
    let mut session = match cmd.seed {
        Some(seed) => ReviewSession::start_with_seed(repo.clone(), deck.id, now, seed).await?,
        None => ReviewSession::start(repo.clone(), deck.id, now).await?,
    };

    while !session.is_finished() {
        let (card, remaining) = {
            let view = session.current_view();
            let Some(card) = view.card else { break };
            (card.clone(), view.remaining)
        };

        println!("\n[{} due] {}", remaining, card.word);
        println!("{}", card.sentence);
        if !card.pronounce.is_empty() {
            println!("({})", card.pronounce);
        }
        prompt_enter("[enter=show answer]")?;
        session.reveal_answer();
        println!("A: {}", card.meaning);
        if !card.translate.is_empty() {
            println!("   {}", card.translate);
        }

        let pass_days = pass_interval_days(card.success_count);
        println!("[p=pass ({pass_days} day), f=fail (again), q=quit]");
        let outcome = loop {
            let line = read_line("grade> ")?;
            match line.trim().to_lowercase().as_str() {
                "p" | "pass" | "easy" => break Outcome::Pass,
                "f" | "fail" | "again" => break Outcome::Fail,
                "q" | "quit" => return Ok(()),
                _ => println!("enter p, f, or q"),
            }
        };
        session.grade(outcome, Local::now().fixed_offset()).await?;
    }

    println!("\nDeck finished for today.");
    Ok(())
}

// ===== Helpers =====
fn parse_uuid(s: &str) -> Result<Uuid> { Uuid::parse_str(s).map_err(|_| anyhow!("invalid uuid")) }

async fn resolve_deck<R: Repository + ?Sized>(repo: &R, sel: &str) -> Result<Deck> {
    if let Ok(id) = Uuid::parse_str(sel) {
        if let Ok(d) = repo.get_deck(id).await { return Ok(d); }
    }
    let decks = repo.list_decks().await?;
    if let Some(d) = decks.into_iter().find(|d| d.name.eq_ignore_ascii_case(sel)) { return Ok(d); }
    bail!("deck not found: {}", sel)
}

fn prompt_enter(label: &str) -> Result<()> { print!("{label}"); stdout().flush().ok(); let mut s = String::new(); stdin().read_line(&mut s)?; Ok(()) }
fn read_line(prompt: &str) -> Result<String> { print!("{prompt}"); stdout().flush().ok(); let mut s = String::new(); stdin().read_line(&mut s)?; Ok(s) }
