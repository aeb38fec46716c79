use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;

use stencil::app::App;
use stencil::config::Config;
use stencil::event::Event;
use stencil::{logging, terminal, ui};

/// Terminal editor for notification layout templates.
#[derive(Debug, Parser)]
#[command(name = "stencil", version, about)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Open this layout for editing on startup.
    #[arg(long, value_name = "ID")]
    layout: Option<String>,
    /// Browse without editing; all mutating actions are disabled.
    #[arg(long)]
    readonly: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    config.ui.readonly |= cli.readonly;

    // Held until exit so buffered log lines reach the file.
    let _log_guard = logging::init(&config.logging)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();

    // Background thread: read crossterm events and feed into channel
    let event_tx = tx.clone();
    std::thread::spawn(move || loop {
        if crossterm::event::poll(Duration::from_millis(16)).unwrap_or(false) {
            match crossterm::event::read() {
                Ok(crossterm::event::Event::Key(key)) => {
                    let _ = event_tx.send(Event::Key(key));
                }
                Ok(crossterm::event::Event::Mouse(mouse)) => {
                    let _ = event_tx.send(Event::Mouse(mouse));
                }
                Ok(crossterm::event::Event::Resize(w, h)) => {
                    let _ = event_tx.send(Event::Resize(w, h));
                }
                _ => {}
            }
        } else {
            let _ = event_tx.send(Event::Tick);
        }
    });

    terminal::install_panic_hook();
    let mut term = terminal::init()?;
    let mut app = App::new(&config, tx);
    app.bootstrap(cli.layout);

    let result = run_loop(&mut term, &mut app, &mut rx).await;

    terminal::restore()?;
    result
}

async fn run_loop(
    terminal: &mut terminal::Tui,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<Event>,
) -> anyhow::Result<()> {
    loop {
        if app.state.dirty {
            terminal.draw(|frame| ui::layout::render(frame, &app.state))?;
            app.state.dirty = false;
        }

        match rx.recv().await {
            Some(event) => app.handle_event(event),
            None => break,
        }

        if app.state.should_quit {
            break;
        }
    }
    Ok(())
}
