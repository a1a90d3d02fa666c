use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    style::Print,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use flag_quiz::{
    App, AppConfig, Catalog, PreferenceStore, QuizSession, ScreenHost, TerminalPlatform, UiState,
    db, logger, session, ui,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

const TICK: Duration = Duration::from_millis(100);

/// Terminal flag quiz: name the country a flag belongs to.
#[derive(Parser, Debug)]
#[command(name = "flag-quiz", version, about)]
struct Cli {
    /// Config file (default: ~/.config/flag-quiz/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Flag catalog CSV (region,code,label) replacing the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Preference database path
    #[arg(long)]
    db: Option<PathBuf>,

    /// Flags asked per quiz
    #[arg(short, long)]
    questions: Option<usize>,

    /// Seed for a reproducible question order
    #[arg(long)]
    seed: Option<u64>,

    /// Restore default settings before starting
    #[arg(long)]
    reset_preferences: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let level = logger::level_for_verbosity(&config.log_level, cli.verbose);
    let log_path = logger::init(&config.log_path(), &level)?;
    info!("Starting flag quiz");

    let catalog = match cli.catalog.as_ref().or(config.catalog_path.as_ref()) {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::bundled()?,
    };
    info!(flags = catalog.len(), "Catalog loaded");

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| db::get_db_path(&config.data_dir()));
    let mut store = PreferenceStore::open(&db_path)?;
    let defaults = config.preference_defaults();
    if cli.reset_preferences {
        store.reset_to_defaults(&defaults)?;
        info!("Preferences reset to defaults");
    }

    let catalog = Arc::new(catalog);
    let mut quiz = match cli.seed {
        Some(seed) => QuizSession::with_rng(catalog, StdRng::seed_from_u64(seed)),
        None => QuizSession::new(catalog),
    };
    quiz.set_questions_per_quiz(cli.questions.or(config.questions_per_quiz));

    let (cols, rows) = crossterm::terminal::size()?;
    let platform = TerminalPlatform::new(cols, rows, config.toast_duration());
    let mut app = ScreenHost::new(platform, store, quiz, defaults);
    app.initialize()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();
    if let Err(e) = &result {
        error!(error = %e, "Flag quiz stopped");
    }
    println!("Log written to {}", log_path.display());
    result?;
    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> flag_quiz::Result<()> {
    let mut ui_state = UiState::default();
    session::sync_layout(app, &mut ui_state);

    loop {
        let now = Instant::now();
        terminal.draw(|f| ui::draw(f, app, &ui_state, now))?;

        if app.platform_mut().take_bell() {
            execute!(terminal.backend_mut(), Print('\x07'))?;
        }

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if session::handle_input(app, &mut ui_state, key)? {
                        break;
                    }
                }
                Event::Resize(cols, rows) => {
                    app.platform_mut().resize(cols, rows);
                    session::sync_layout(app, &mut ui_state);
                }
                _ => {}
            }
        }

        app.platform_mut().expire(Instant::now());
    }

    info!(score = ?app.quiz().score(), "Quitting");
    Ok(())
}
