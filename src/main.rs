mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keystroke::{
    config::{Config, ConfigStore, FileConfigStore, TestSettings},
    logger::EventLog,
    results,
    runtime::{AppEvent, CrosstermEventSource, Runner},
    session::{Msg, Session},
    word_generator::{WordGenConfig, WordGenerator},
    wordlist::Difficulty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use webbrowser::Browser;

const TICK_RATE_MS: u64 = 1000;

/// terminal typing speed test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing speed test with difficulty-tiered word lists, live per-character feedback, and shareable results. Flags override the saved configuration."
)]
pub struct Cli {
    /// number of seconds to run the test
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// number of target words to generate
    #[clap(short = 'w', long)]
    words: Option<usize>,

    /// difficulty tier of the vocabulary
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,
}

impl Cli {
    fn apply(&self, settings: &mut TestSettings) {
        if let Some(seconds) = self.seconds {
            settings.duration_secs = seconds;
        }
        if let Some(words) = self.words {
            settings.word_count = words;
        }
        if let Some(difficulty) = self.difficulty {
            settings.difficulty = difficulty;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

pub struct App {
    pub session: Session,
    pub state: AppState,
    pub settings: TestSettings,
    pub store: FileConfigStore,
    pub log: EventLog,
}

fn build_session(settings: &TestSettings) -> Session {
    let generator = WordGenerator::new(WordGenConfig {
        number_of_words: settings.word_count,
        difficulty: settings.difficulty,
    });
    Session::new(generator.supply(), settings.duration_secs)
}

impl App {
    pub fn new(settings: TestSettings, store: FileConfigStore) -> Self {
        let mut log = EventLog::new();
        log.info(
            format!(
                "keystroke initialized: {}s, {} words, {}",
                settings.duration_secs,
                settings.word_count,
                settings.difficulty.to_string().to_lowercase()
            ),
            Some("app"),
        );

        Self {
            session: build_session(&settings),
            state: AppState::Typing,
            settings,
            store,
            log,
        }
    }

    /// Same target words, counters zeroed.
    pub fn restart(&mut self) {
        self.session.handle(Msg::Restart);
        self.state = AppState::Typing;
        self.log.info("test restarted", Some("app"));
    }

    /// Fresh words under the current settings.
    pub fn new_test(&mut self) {
        self.session = build_session(&self.settings);
        self.state = AppState::Typing;
        self.log.info("new test generated", Some("app"));
    }

    /// Record the finished session and move to the results screen.
    pub fn finish_test(&mut self) {
        if let Some(summary) = self.session.summary {
            self.log.test_result(&summary);
            if let Err(e) = results::append_history(&summary, &self.settings) {
                self.log
                    .warn(format!("failed to append history: {e}"), Some("results"));
            }
        }
        self.state = AppState::Results;
    }

    pub fn export_results(&mut self) {
        if let Some(summary) = self.session.summary {
            match results::export_json(&summary) {
                Ok(path) => self.log.info(
                    format!("results exported to {}", path.display()),
                    Some("results"),
                ),
                Err(e) => self.log.warn(format!("export failed: {e}"), Some("results")),
            }
        }
    }

    pub fn update_settings(&mut self, change: impl FnOnce(&mut TestSettings)) {
        change(&mut self.settings);
        if let Err(e) = self.store.save(&Config::from(&self.settings)) {
            self.log.warn(format!("failed to save config: {e}"), Some("config"));
        }
        self.log.info(
            format!(
                "settings changed: {}s, {} words, {}",
                self.settings.duration_secs,
                self.settings.word_count,
                self.settings.difficulty.to_string().to_lowercase()
            ),
            Some("config"),
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut settings = TestSettings::from(&store.load());
    cli.apply(&mut settings);
    let _ = store.save(&Config::from(&settings));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings, store);
    let run_result = start_tui(&mut terminal, &mut app);

    // Dump the event log before giving the terminal back.
    let _ = app.log.save_default();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

#[derive(Debug)]
enum ExitType {
    Restart,
    New,
    Quit,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        let mut exit_type = ExitType::Quit;
        terminal.draw(|f| ui(app, f))?;

        loop {
            match runner.step() {
                AppEvent::Tick => {
                    app.session.handle(Msg::Tick);
                    if app.state == AppState::Typing && app.session.has_finished() {
                        app.finish_test();
                    }
                    terminal.draw(|f| ui(app, f))?;
                }
                AppEvent::Resize => {
                    terminal.draw(|f| ui(app, f))?;
                }
                AppEvent::Key(key) => {
                    match key.code {
                        KeyCode::Esc => {
                            break;
                        }
                        KeyCode::Backspace => {
                            if app.state == AppState::Typing && !app.session.has_finished() {
                                let mut value = app.session.input.clone();
                                value.pop();
                                app.session.handle(Msg::Input(value));
                            }
                        }
                        KeyCode::Left => {
                            exit_type = ExitType::Restart;
                            break;
                        }
                        KeyCode::Right => {
                            exit_type = ExitType::New;
                            break;
                        }
                        KeyCode::Char(c) => {
                            if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                                break;
                            }

                            match app.state {
                                AppState::Typing => {
                                    if !app.session.has_finished() {
                                        let starting = !app.session.has_started();
                                        let mut value = app.session.input.clone();
                                        value.push(c);
                                        app.session.handle(Msg::Input(value));

                                        if starting && app.session.has_started() {
                                            let (_, total) = app.session.progress();
                                            let secs = app.session.duration_secs;
                                            app.log.test_started(total, secs);
                                        }
                                        if app.session.has_finished() {
                                            app.finish_test();
                                        }
                                    }
                                }
                                AppState::Results => match c {
                                    'r' => {
                                        exit_type = ExitType::Restart;
                                        break;
                                    }
                                    'n' => {
                                        exit_type = ExitType::New;
                                        break;
                                    }
                                    't' => {
                                        if Browser::is_available() {
                                            if let Some(summary) = app.session.summary {
                                                webbrowser::open(&results::tweet_url(&summary))
                                                    .unwrap_or_default();
                                            }
                                        }
                                    }
                                    'e' => app.export_results(),
                                    '1' => app.update_settings(|s| s.cycle_duration()),
                                    '2' => app.update_settings(|s| s.cycle_difficulty()),
                                    '3' => app.update_settings(|s| s.cycle_word_count()),
                                    _ => {}
                                },
                            }
                        }
                        _ => {}
                    }
                    terminal.draw(|f| ui(app, f))?;
                }
            }
        }

        match exit_type {
            ExitType::Restart => {
                app.restart();
            }
            ExitType::New => {
                app.new_test();
            }
            ExitType::Quit => {
                break;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
