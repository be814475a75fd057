//! newswire — a terminal news reader that pages through articles on demand.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ FetchOutcome  ┌──────────┐  draw()  ┌──────────┐
//! │ worker.rs │ ────────────► │ feed.rs  │ ───────► │  ui.rs   │
//! │ (thread)  │ ◄──────────── │ (state)  │          │ (render) │
//! └───────────┘ FetchRequest  └──────────┘          └──────────┘
//!                                  ▲
//!                                  │ handle_key_event()
//!                             ┌──────────┐
//!                             │ input.rs │
//!                             └──────────┘
//! ```
//!
//! * **`client/`** — the `ArticleSource` trait and the NewsAPI
//!   implementation.
//! * **`worker`** — a background thread that performs one blocking page
//!   fetch per request from the feed.
//! * **`feed`** — the paging state machine: loaded articles, next-page
//!   cursor, load state, retry.
//! * **`app`** — list selection; scrolling near the bottom arms the
//!   feed's prefetch.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: configuration, terminal
//!   setup, and the event loop.

mod app;
mod client;
mod feed;
mod input;
mod ui;
mod worker;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::App;
use client::{ArticleSource, NewsApi, DEFAULT_DOMAINS, DEFAULT_PAGE_SIZE};
use feed::PagingFeed;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.  This prevents the common TUI bug where a panic leaves the
/// terminal in a broken state.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.  Without this, a panic inside the event loop would leave
/// raw mode enabled and the alternate screen active.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Initialize tracing with file output.
///
/// Logging is off by default: writing to stdout would corrupt the TUI.
/// Set `NEWSWIRE_LOG` to a file path to enable it; `RUST_LOG` filters as
/// usual.
fn init_tracing() {
    let Ok(log_path) = std::env::var("NEWSWIRE_LOG") else {
        return;
    };
    let Ok(file) = std::fs::File::create(&log_path) else {
        eprintln!("warning: failed to create log file {log_path}");
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    install_panic_hook();
    init_tracing();

    // -- configuration -------------------------------------------------------
    // The credential is configuration, never a runtime input; the only
    // accepted argument overrides the source domains.
    let api_key = std::env::var("NEWSWIRE_API_KEY")
        .context("set NEWSWIRE_API_KEY to your news API key")?;
    let domains = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DOMAINS.into());

    // -- build the source and start the fetch worker -------------------------
    let source = NewsApi::new(api_key, domains)?;
    let source_name = source.name().to_string();
    let (requests, outcomes) = worker::spawn(Box::new(source), DEFAULT_PAGE_SIZE);

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(PagingFeed::new(requests), source_name);

    // The screen starts on a spinner: kick off the first page immediately.
    app.feed.refresh();

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any completed fetches from the worker into the feed.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Apply fetch outcomes
        while let Ok(outcome) = outcomes.try_recv() {
            app.feed.apply(outcome);
        }

        // 2. Render
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 3. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here: the terminal is restored, and dropping the
    // feed's request channel lets the worker thread wind down on its own.
    Ok(())
}
