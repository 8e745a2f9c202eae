use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use moodtunes::cli_style::{
    self, colors, get_styles, print_empty_list, print_error, print_key_value, print_list_item,
    print_section_footer, print_section_header, print_success, print_warning, TableBuilder,
};
use moodtunes::user::{
    seed_test_users, SqliteUserStore, TokenLifetimes, User, UserError, UserManager,
    TEST_USERS_PASSWORD,
};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to the user database, usually `<db_dir>/user.db`.
    #[clap(value_parser = parse_path)]
    pub path: PathBuf,
}

#[derive(Parser)]
#[command(styles=get_styles(),name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Creates a user with a password.
    AddUser {
        username: String,
        email: String,
        password: String,
    },

    /// Replaces the password of a user, found by username or email.
    UpdatePassword { login: String, password: String },

    /// Deletes a user with its credentials and tokens.
    DeleteUser { login: String },

    /// Shows a user and its auth tokens.
    Show { login: String },

    /// Verifies the password of a user. It doesn't make any persistent change
    /// besides the last tried timestamp and it doesn't create any token.
    CheckPassword { login: String, password: String },

    /// Lists all users.
    Usernames,

    /// Adds the demo users, all with the same password. Existing ones are skipped.
    SeedTestUsers,

    /// Shows the path of the current user db.
    Where,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

fn find_user(user_manager: &UserManager, login: &str) -> Result<User, String> {
    match user_manager.find_user(login) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(format!("User {} not found.", login)),
        Err(err) => Err(err.to_string()),
    }
}

fn format_time(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn show_user(user_manager: &UserManager, user: &User) {
    print_section_header(&user.username);
    print_key_value("Id", &user.id.to_string());
    print_key_value("Email", &user.email);
    print_key_value("Created", &format_time(user.created));

    match user_manager.get_user_tokens(user.id) {
        Ok(tokens) if tokens.is_empty() => print_empty_list("No auth tokens"),
        Ok(tokens) => {
            let mut table = TableBuilder::new(vec!["Kind", "Created", "Expires", "Last used"]);
            for token in tokens {
                table.add_row(vec![
                    format!("{:?}", token.kind),
                    format_time(token.created),
                    token.expires.map(format_time).unwrap_or_default(),
                    token.last_used.map(format_time).unwrap_or_default(),
                ]);
            }
            table.print();
        }
        Err(err) => print_error(&format!("Failed to get tokens: {}", err)),
    }
    print_section_footer();
}

fn execute_command(
    line: String,
    user_manager: &UserManager,
    db_path: String,
) -> CommandExecutionResult {
    if line.is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => match cli.command {
            InnerCommand::AddUser {
                username,
                email,
                password,
            } => match user_manager.add_user(&username, &email, &password) {
                Ok(user) => print_success(&format!("Created user {} ({})", user.username, user.id)),
                Err(err) => return CommandExecutionResult::Error(err.to_string()),
            },
            InnerCommand::UpdatePassword { login, password } => {
                let user = match find_user(user_manager, &login) {
                    Ok(user) => user,
                    Err(msg) => return CommandExecutionResult::Error(msg),
                };
                if let Err(err) = user_manager.set_password(user.id, &password) {
                    return CommandExecutionResult::Error(err.to_string());
                }
                print_success(&format!("Password of {} updated", user.username));
            }
            InnerCommand::DeleteUser { login } => {
                let user = match find_user(user_manager, &login) {
                    Ok(user) => user,
                    Err(msg) => return CommandExecutionResult::Error(msg),
                };
                if let Err(err) = user_manager.remove_user(user.id) {
                    return CommandExecutionResult::Error(err.to_string());
                }
                print_success(&format!("Deleted user {}", user.username));
            }
            InnerCommand::Show { login } => match find_user(user_manager, &login) {
                Ok(user) => show_user(user_manager, &user),
                Err(msg) => return CommandExecutionResult::Error(msg),
            },
            InnerCommand::CheckPassword { login, password } => {
                match user_manager.check_password(&login, &password) {
                    Ok(_) => print_success("The password provided is correct!"),
                    Err(UserError::InvalidCredentials) => print_warning("Wrong password."),
                    Err(err) => {
                        return CommandExecutionResult::Error(format!(
                            "Could not verify the password, something went wrong: {}",
                            err
                        ))
                    }
                }
            }
            InnerCommand::Usernames => match user_manager.get_all_users() {
                Ok(users) if users.is_empty() => print_empty_list("No users"),
                Ok(users) => {
                    for user in users {
                        print_list_item(
                            &format!("{} <{}>", user.username, user.email),
                            colors::WHITE,
                        );
                    }
                }
                Err(err) => return CommandExecutionResult::Error(err.to_string()),
            },
            InnerCommand::SeedTestUsers => match seed_test_users(user_manager) {
                Ok(report) => {
                    for username in report.added {
                        print_success(&format!("Added: {}", username));
                    }
                    for username in report.skipped {
                        print_warning(&format!("User {} already exists, skipping", username));
                    }
                    cli_style::print_info(&format!(
                        "Login with any username/email and password: {}",
                        TEST_USERS_PASSWORD
                    ));
                }
                Err(err) => return CommandExecutionResult::Error(err.to_string()),
            },
            InnerCommand::Where => {
                println!("{}", db_path);
            }
            InnerCommand::Exit => return CommandExecutionResult::Exit,
        },

        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
        }
    }
    CommandExecutionResult::Ok
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
    let user_store = SqliteUserStore::new(&cli_args.path)?;
    let user_manager = UserManager::new(Arc::new(user_store), TokenLifetimes::default());

    cli_style::print_banner("User management");
    InnerCli::command().print_long_help()?;

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<CommandHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(CommandHelper::new()));

    let prompt = cli_style::get_prompt("users");
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(
                    line.trim().to_string(),
                    &user_manager,
                    cli_args.path.display().to_string(),
                ) {
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
    cli_style::print_goodbye();
    Ok(())
}
