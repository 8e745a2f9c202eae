use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodtunes::browse::{render_results_text, BrowseController, UrlOpener};
use moodtunes::cli_style::{
    self, colors, get_styles, mood_color, print_error, print_info, print_key_value,
    print_list_item, print_section_footer, print_section_header, print_success, print_warning,
};
use moodtunes::client::{
    resolve_route, AuthForm, AuthGate, AuthMode, AuthOutcome, HttpAuthGate, Route,
};
use moodtunes::config::ClientConfig;
use moodtunes::songs::Mood;
use moodtunes::source::{LocalSongSource, RemoteSongSource, SongSource};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// The built-in sample catalog.
    Local,
    /// The backend at MOODTUNES_API_URL.
    Remote,
}

#[derive(Parser, Debug)]
#[command(styles = get_styles())]
struct CliArgs {
    /// Where songs are loaded from.
    #[clap(long, value_enum, default_value_t = SourceKind::Remote)]
    pub source: SourceKind,
}

#[derive(Parser)]
#[command(styles = get_styles(), name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Logs in with a username or email.
    Login { login: String, password: String },

    /// Creates an account and logs in with it.
    Register {
        username: String,
        email: String,
        password: String,
    },

    /// Ends the current session.
    Logout,

    /// Shows the logged in user.
    Whoami,

    /// Lists the moods that can be browsed.
    Moods,

    /// Loads the songs of a mood.
    Mood { mood: String },

    /// Filters the loaded songs. Without a term every song is shown again.
    Search { term: Option<String> },

    /// Opens the song at the given position of the results.
    Open { position: usize },

    /// Checks that the backend is reachable.
    Health,

    /// Close this program.
    Exit,
}

impl InnerCommand {
    fn requires_browse(&self) -> bool {
        matches!(
            self,
            InnerCommand::Moods
                | InnerCommand::Mood { .. }
                | InnerCommand::Search { .. }
                | InnerCommand::Open { .. }
        )
    }
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

/// Prints the URL instead of launching a player.
struct PrintingOpener;

impl UrlOpener for PrintingOpener {
    fn open(&self, url: &str) -> Result<()> {
        println!("  {} {}", "🎵 Listen Now:".with(colors::PINK), url);
        Ok(())
    }
}

struct BrowseCli {
    runtime: tokio::runtime::Runtime,
    gate: HttpAuthGate,
    controller: BrowseController,
    remote: Option<Arc<RemoteSongSource>>,
}

impl BrowseCli {
    fn print_results(&self) {
        let view = self.controller.view();
        let color = view
            .mood
            .as_ref()
            .map(|mood| mood_color(mood.as_str()))
            .unwrap_or(colors::WHITE);
        print!("{}", render_results_text(&view).with(color));
    }

    fn submit(&self, mut form: AuthForm) -> CommandExecutionResult {
        match self.runtime.block_on(form.submit(&self.gate)) {
            AuthOutcome::Navigate(_) => {
                if let Some(user) = self.gate.current_user() {
                    print_success(&format!("Welcome, {}!", user.username));
                }
                CommandExecutionResult::Ok
            }
            AuthOutcome::ShowError(message) => CommandExecutionResult::Error(message),
        }
    }

    fn execute(&mut self, command: InnerCommand) -> CommandExecutionResult {
        if command.requires_browse()
            && resolve_route(Route::Browse, self.gate.is_authenticated()) == Route::Auth
        {
            return CommandExecutionResult::Error(
                "Please login or register to browse songs.".to_string(),
            );
        }

        match command {
            InnerCommand::Login { login, password } => {
                let mut form = AuthForm::new(AuthMode::Login);
                form.login = login;
                form.password = password;
                return self.submit(form);
            }
            InnerCommand::Register {
                username,
                email,
                password,
            } => {
                let mut form = AuthForm::new(AuthMode::Register);
                form.username = username;
                form.email = email;
                form.password = password;
                return self.submit(form);
            }
            InnerCommand::Logout => {
                if !self.gate.is_authenticated() {
                    print_warning("Not logged in.");
                } else {
                    self.runtime.block_on(self.gate.logout());
                    print_success("Logged out.");
                }
            }
            InnerCommand::Whoami => match self.gate.current_user() {
                Some(user) => {
                    print_section_header(&user.username);
                    print_key_value("Id", &user.id.to_string());
                    print_key_value("Email", &user.email);
                    print_key_value("Member since", &user.created_at);
                    print_section_footer();
                }
                None => print_warning("Not logged in."),
            },
            InnerCommand::Moods => match self.runtime.block_on(self.controller.available_moods()) {
                Ok(moods) => {
                    for mood in moods {
                        print_list_item(&mood.label(), mood_color(mood.as_str()));
                    }
                }
                Err(err) => return CommandExecutionResult::Error(err.to_string()),
            },
            InnerCommand::Mood { mood } => {
                let mood = Mood::new(mood);
                if mood.is_empty() {
                    return CommandExecutionResult::Error("Pick a mood first.".to_string());
                }
                self.runtime.block_on(self.controller.select_mood(mood));
                self.print_results();
            }
            InnerCommand::Search { term } => {
                self.controller.set_search_term(term.unwrap_or_default());
                self.print_results();
            }
            InnerCommand::Open { position } => {
                if position == 0 {
                    return CommandExecutionResult::Error("Positions start at 1.".to_string());
                }
                if let Err(err) = self.controller.open_song(position - 1, &PrintingOpener) {
                    return CommandExecutionResult::Error(err.to_string());
                }
            }
            InnerCommand::Health => match &self.remote {
                Some(remote) => {
                    if self.runtime.block_on(remote.check_health()) {
                        print_success("Backend is reachable.");
                    } else {
                        print_warning("Backend is not reachable.");
                    }
                }
                None => print_info("Using the built-in catalog, no backend involved."),
            },
            InnerCommand::Exit => return CommandExecutionResult::Exit,
        }
        CommandExecutionResult::Ok
    }

    fn execute_line(&mut self, line: String) -> CommandExecutionResult {
        if line.is_empty() {
            return CommandExecutionResult::Ok;
        }
        let args = shlex::split(&line)
            .unwrap_or_else(|| line.split_whitespace().map(String::from).collect());
        match InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)))
        {
            Ok(cli) => self.execute(cli.command),
            Err(e) => {
                if e.print().is_err() {
                    println!("{}", e);
                }
                CommandExecutionResult::Ok
            }
        }
    }
}

#[derive(rustyline_derive::Hinter)]
struct CommandHelper {
    commands_names: Vec<String>,
}

impl CommandHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        CommandHelper { commands_names }
    }
}

impl Completer for CommandHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for CommandHelper {}
impl Validator for CommandHelper {}
impl Helper for CommandHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    let client_config = ClientConfig::from_env();

    let (source, remote): (Arc<dyn SongSource>, Option<Arc<RemoteSongSource>>) =
        match cli_args.source {
            SourceKind::Local => {
                let local: Arc<dyn SongSource> = Arc::new(LocalSongSource::sample());
                (local, None)
            }
            SourceKind::Remote => {
                let remote = Arc::new(RemoteSongSource::new(&client_config.api_url));
                // Only logs the outcome, browsing goes ahead either way.
                let _guard = runtime.enter();
                remote.spawn_health_check();
                (remote.clone() as Arc<dyn SongSource>, Some(remote))
            }
        };

    let mut cli = BrowseCli {
        gate: HttpAuthGate::new(&client_config.api_url),
        controller: BrowseController::new(source),
        remote,
        runtime,
    };

    cli_style::print_banner(&format!(
        "Mood song browser ({} songs)",
        cli.controller.source_name()
    ));
    print_info(&format!("Backend: {}", client_config.api_url));
    InnerCli::command().print_long_help()?;

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl = Editor::<CommandHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(CommandHelper::new()));

    loop {
        let context = match resolve_route(Route::Browse, cli.gate.is_authenticated()) {
            Route::Auth => "login".to_string(),
            Route::Browse => match cli.controller.mood() {
                Some(mood) => mood.to_string(),
                None => "moodtunes".to_string(),
            },
        };
        match rl.readline(&cli_style::get_prompt(&context)) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match cli.execute_line(line.trim().to_string()) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => print_error(&err),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                print_error(&format!("{:?}", e));
                break;
            }
        }
    }
    cli.runtime.block_on(cli.gate.logout());
    cli_style::print_goodbye();
    Ok(())
}
