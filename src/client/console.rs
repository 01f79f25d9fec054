use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::info;

use super::debouncer::{DisplayState, Phase, TranslationDebouncer};
use super::relay_client::RelayClient;
use super::theme::{FileThemeStore, Theme, ThemeState};
use crate::config::ClientConfig;
use crate::languages::{LanguageCode, CATALOG};

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the whole text value
    Text(String),
    From(String),
    To(String),
    Swap,
    Clear,
    Theme,
    Languages,
    Status,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Command {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Text(line.to_string());
    };
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim().to_string();
    match name {
        "from" => Command::From(arg),
        "to" => Command::To(arg),
        "swap" => Command::Swap,
        "clear" => Command::Clear,
        "theme" => Command::Theme,
        "languages" | "langs" => Command::Languages,
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        // Unknown commands are treated as text so nothing typed is lost
        _ => Command::Text(line.to_string()),
    }
}

/// Line to print when the display moves from `prev` to `next`, if any
pub fn render_transition(prev: &DisplayState, next: &DisplayState) -> Option<String> {
    if next.loading && !prev.loading {
        return Some("Translating...".to_string());
    }
    if !next.loading && (prev.loading || prev.translation != next.translation) {
        if next.translation.is_empty() {
            return None;
        }
        return Some(format!("=> {}", next.translation));
    }
    None
}

async fn render_loop(mut rx: watch::Receiver<DisplayState>, mut theme_rx: watch::Receiver<Theme>) {
    let mut last = rx.borrow_and_update().clone();
    theme_rx.borrow_and_update();
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = rx.borrow_and_update().clone();
                if let Some(line) = render_transition(&last, &current) {
                    println!("{}", line);
                }
                last = current;
            }
            changed = theme_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let theme = *theme_rx.borrow_and_update();
                println!("{} {:?} theme", theme.icon(), theme);
            }
        }
    }
}

/// One-line summary for `/status`
pub fn status_line(
    phase: Phase,
    text: &str,
    (from, to): (LanguageCode, LanguageCode),
    display: &DisplayState,
) -> String {
    let result = if display.translation.is_empty() {
        "-".to_string()
    } else {
        display.translation.clone()
    };
    format!(
        "[{:?}] {} -> {} | text: {:?} | loading: {} | translation: {}",
        phase, from, to, text, display.loading, result
    )
}

fn print_help() {
    println!("Type text to translate; each line replaces the previous text.");
    println!("  /from <code>   set source language");
    println!("  /to <code>     set target language");
    println!("  /swap          exchange source and target");
    println!("  /clear         clear the text");
    println!("  /theme         toggle light/dark");
    println!("  /languages     list language codes");
    println!("  /status        show the current request state");
    println!("  /quit          exit");
}

fn parse_language(arg: &str) -> Option<LanguageCode> {
    match arg.parse::<LanguageCode>() {
        Ok(lang) => Some(lang),
        Err(e) => {
            println!("{} (try /languages)", e);
            None
        }
    }
}

/// Run the interactive client until stdin closes or `/quit`
pub async fn run(config: &ClientConfig) -> Result<()> {
    let from: LanguageCode = config
        .from_lang
        .parse()
        .context("Invalid client_config.from_lang")?;
    let to: LanguageCode = config
        .to_lang
        .parse()
        .context("Invalid client_config.to_lang")?;

    let service = Arc::new(RelayClient::new(&config.relay_url));
    let debouncer = TranslationDebouncer::with_delay(
        service,
        from,
        to,
        Duration::from_millis(config.settle_delay_ms),
    );
    let theme = ThemeState::load(Arc::new(FileThemeStore::new(&config.theme_path)));

    info!("Using relay at {}", config.relay_url);
    println!(
        "{} Live translator ({} -> {}). /help for commands.",
        theme.get().icon(),
        from.display_name(),
        to.display_name()
    );

    let render = tokio::spawn(render_loop(debouncer.subscribe(), theme.subscribe()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Text(text) => debouncer.set_text(text),
            Command::Clear => debouncer.set_text(""),
            Command::From(arg) => {
                if let Some(lang) = parse_language(&arg) {
                    debouncer.set_from(lang);
                    println!("From: {}", lang.display_name());
                }
            }
            Command::To(arg) => {
                if let Some(lang) = parse_language(&arg) {
                    debouncer.set_to(lang);
                    println!("To: {}", lang.display_name());
                }
            }
            Command::Swap => {
                debouncer.swap_languages();
                let (from, to) = debouncer.languages();
                println!("{} -> {}", from.display_name(), to.display_name());
            }
            Command::Theme => {
                theme.toggle()?;
            }
            Command::Languages => {
                for lang in CATALOG {
                    println!("  {}  {}", lang.code(), lang.display_name());
                }
            }
            Command::Status => println!(
                "{}",
                status_line(
                    debouncer.phase(),
                    &debouncer.text(),
                    debouncer.languages(),
                    &debouncer.display(),
                )
            ),
            Command::Help => print_help(),
            Command::Quit => break,
        }
    }

    drop(debouncer);
    render.abort();
    Ok(())
}
