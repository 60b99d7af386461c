//! Application entry point: console pictogram board.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the translator and speech synthesizer from config.
//! 5. Open the file-backed store and the [`BoardSession`].
//! 6. Print each settled sentence as it arrives.
//! 7. Read commands from stdin until `quit` or end of input.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use picto_voice::{
    audio::{AudioOutput, CpalOutput},
    catalog::Category,
    config::AppConfig,
    session::{BoardSession, SpeakError},
    speech::{ApiSynthesizer, OutputOpener},
    store::FileStore,
    translate::{ApiTranslator, FallbackTranslator},
};

const HELP: &str = "\
commands:
  list [category]               categories, or the tiles of one category
  tap <id>                      append a pictogram to the sequence
  remove <n>                    remove the n-th sequence tile
  clear                         empty the sequence
  speak                         speak the current sentence
  save                          save sequence + sentence as a favorite
  favorites                     list saved phrases
  load <id>                     restore a saved phrase
  forget <id>                   delete a saved phrase
  new <category> <glyph> <label>  create a custom pictogram
  delete <id>                   delete a custom pictogram
  quit";

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Handle one input line.  Returns `false` when the user asked to quit.
async fn dispatch(session: &BoardSession, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return true;
    };
    let args: Vec<&str> = parts.collect();

    match (command, args.as_slice()) {
        ("quit" | "exit", _) => return false,
        ("help", _) => println!("{HELP}"),

        ("list", []) => {
            for category in Category::ALL {
                println!("  {category:?} ({category})");
            }
        }
        ("list", [name]) => match Category::parse(name) {
            Some(Category::Favorites) => print_favorites(session),
            Some(category) => {
                for p in session.pictograms_in(category) {
                    println!("  {:<22} {} {}", p.id, p.glyph, p.label);
                }
            }
            None => println!("unknown category '{name}'"),
        },

        ("tap", [id]) => {
            if session.tap_catalog(id).is_none() {
                println!("no pictogram '{id}'");
            }
            print_sequence(session);
        }
        ("remove", [n]) => {
            match n.parse::<usize>() {
                Ok(n) if n >= 1 => {
                    session.tap_sequence(n - 1);
                }
                _ => println!("expected a tile number"),
            }
            print_sequence(session);
        }
        ("clear", []) => {
            session.clear();
            print_sequence(session);
        }

        ("speak", []) => match session.speak().await {
            Ok(_) => {}
            Err(SpeakError::NotReady) => println!("(wait for the sentence first)"),
            Err(e) => println!("could not speak: {e}"),
        },

        ("save", []) => match session.save_favorite() {
            Some(phrase) => println!("saved #{}: {}", phrase.id, phrase.text),
            None => println!("nothing to save"),
        },
        ("favorites", []) => print_favorites(session),
        ("load", [id]) => {
            if session.select_favorite(id) {
                print_sequence(session);
            } else {
                println!("no saved phrase '{id}'");
            }
        }
        ("forget", [id]) => {
            if !session.delete_favorite(id) {
                println!("no saved phrase '{id}'");
            }
        }

        ("new", [category, glyph, label @ ..]) if !label.is_empty() => {
            let Some(category) = Category::parse(category) else {
                println!("unknown category '{category}'");
                return true;
            };
            match session.create_pictogram(&label.join(" "), glyph, category) {
                Ok(p) => println!("created {} {} {}", p.id, p.glyph, p.label),
                Err(e) => println!("rejected: {e}"),
            }
        }
        ("delete", [id]) => {
            if !session.delete_pictogram(id) {
                println!("no custom pictogram '{id}'");
            }
        }

        _ => println!("unrecognised command; type 'help'"),
    }
    true
}

fn print_sequence(session: &BoardSession) {
    let tiles: Vec<String> = session
        .sequence()
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}:{} {}", i + 1, p.glyph, p.label))
        .collect();
    let state = session.translation();
    println!("[{}]  <{}>", tiles.join("  "), state.phase.label());
    if let Some(text) = state.settled_text() {
        println!("  \"{text}\"");
    }
}

fn print_favorites(session: &BoardSession) {
    let favorites = session.favorites();
    if favorites.is_empty() {
        println!("  (no saved phrases)");
    }
    for phrase in favorites {
        let glyphs: String = phrase.pictograms.iter().map(|p| p.glyph.as_str()).collect();
        println!(
            "  #{} {} {}  ({})",
            phrase.id,
            glyphs,
            phrase.text,
            phrase.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("picto-voice starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    rt.block_on(run(config))
}

async fn run(config: AppConfig) -> Result<()> {
    // 4. Service clients
    let translator = Arc::new(FallbackTranslator::new(ApiTranslator::from_config(
        &config.translation,
    )));
    let synthesizer = Arc::new(ApiSynthesizer::from_config(&config.speech));
    let sample_rate = config.speech.sample_rate;
    let opener: OutputOpener =
        Box::new(move || Ok(Arc::new(CpalOutput::open(sample_rate)?) as Arc<dyn AudioOutput>));

    // 5. Store + session
    let store = FileStore::new(config.storage.resolve_dir());
    log::info!("Store directory: {}", store.dir().display());
    let session = BoardSession::open(
        &config,
        Arc::new(store),
        translator,
        synthesizer,
        opener,
    )
    .await;

    // 6. Sentence printer
    let mut updates = session.subscribe_translation();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let sentence = updates.borrow_and_update().settled_text().map(str::to_owned);
            if let Some(sentence) = sentence {
                println!("  \"{sentence}\"");
            }
        }
    });

    // 7. Command loop
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !dispatch(&session, line.trim()).await {
            break;
        }
    }

    session.shutdown();
    printer.abort();
    Ok(())
}
