mod app;
mod cli;
mod components;
mod config;
mod event;
mod reminder;
mod theme;
mod tui;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use app::{App, Message};
use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use config::Config;
use crossterm::event::{KeyCode, KeyModifiers};
use event::Input;
use ratatui::layout::{Constraint, Layout, Rect};
use reminder::{FileStore, ReminderStore};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "reminders")]
#[command(version)]
#[command(about = "Keep track of reminders, sorted by when they are due")]
struct Args {
    /// Reminder store (TOML)
    #[arg(long, env = "REMINDERS_DATA_FILE", global = true)]
    data_file: Option<PathBuf>,

    /// Config file (defaults to <config dir>/reminders/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<cli::Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config = Config::load(args.config.as_deref());

    let data_file = args
        .data_file
        .clone()
        .or_else(|| config.data_file())
        .ok_or_else(|| eyre!("Could not find a data directory; pass --data-file"))?;
    let store = FileStore::new(data_file);

    match args.command {
        Some(command) => {
            init_logging(None)?;
            tracing::debug!(path = %store.path().display(), "using reminder store");
            cli::run(command, &store, &config, &mut std::io::stdout()).await
        }
        None => {
            init_logging(config.log_file().as_deref())?;
            tracing::info!(path = %store.path().display(), "starting reminders screen");
            run_tui(Arc::new(store), &config)
        }
    }
}

/// The screen owns the terminal, so it logs to a file; subcommands log to
/// stderr.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

fn run_tui(store: Arc<dyn ReminderStore>, config: &Config) -> Result<()> {
    theme::init(&config.theme);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(store, tx).with_date_format(config.date_format.clone());

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, &mut rx);
    tui::restore()?;
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App, rx: &mut UnboundedReceiver<Message>) -> Result<()> {
    // Mounting counts as gaining focus
    app.on_focus();

    while app.running {
        while let Ok(message) = rx.try_recv() {
            app.handle_message(message);
        }

        terminal.draw(|frame| {
            let area = frame.area();
            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

            components::ReminderListView::render(frame, layout[0], app);

            if app.show_detail {
                if let Some(reminder) = app.selected_reminder() {
                    components::render_detail_popup(frame, area, reminder, &app.date_format);
                }
            }

            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(frame, layout[1], app);
        })?;

        match event::next_input(Duration::from_millis(100))? {
            Some(Input::FocusGained) => app.on_focus(),
            Some(Input::FocusLost) => app.on_blur(),
            Some(Input::Key(key)) => {
                app.status_message = None;

                if app.show_help {
                    if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                        app.show_help = false;
                    }
                    continue;
                }

                if app.show_detail {
                    if key.code == KeyCode::Esc || key.code == KeyCode::Enter {
                        app.show_detail = false;
                    }
                    continue;
                }

                handle_normal_input(app, key.code, key.modifiers);
            }
            None => {}
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let open = app.revealed.is_some();

    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.select_next(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.select_prev(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) | (KeyCode::Char('x'), _) => {
            app.reveal_delete()
        }
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) | (KeyCode::Esc, _) => app.close_reveal(),
        (KeyCode::Enter, _) | (KeyCode::Char('d'), _) if open => app.confirm_delete(),
        (KeyCode::Char('d'), _) => app.reveal_delete(),
        (KeyCode::Enter, _) => app.toggle_detail(),
        (KeyCode::Char('r'), _) => {
            app.refresh();
            app.status_message = Some("Refreshing reminders".to_string());
        }
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let theme = theme::current();

    let popup_w = area.width.clamp(30, 52).min(area.width);
    let popup_h = area.height.clamp(12, 18).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.border);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = theme.tag.add_modifier(Modifier::BOLD);
    let desc_style = Style::default();
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let binding = |keys: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(keys, key_style), Span::styled(desc, desc_style)])
    };

    let lines = vec![
        Line::from(Span::styled("List", section_style)),
        binding("  j/k \u{2191}/\u{2193}   ", "Move selection"),
        binding("  Enter       ", "Show details"),
        binding("  r           ", "Refresh"),
        Line::from(""),
        Line::from(Span::styled("Delete", section_style)),
        binding("  x/h \u{2190}     ", "Swipe row open"),
        binding("  l \u{2192} Esc    ", "Close row"),
        binding("  Enter/d     ", "Delete open row"),
        Line::from(""),
        binding("  q           ", "Quit"),
        binding("  ?/Esc       ", "Close this help"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
