use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::{Path, PathBuf};

use agrid_application::AssistantService;
use agrid_core::{ImageRef, TurnRole};
use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::utils::{build_assistant, image_from_path};

const COMMANDS: &[&str] = &["/image", "/mode", "/history", "/clear", "/exit"];

/// A REPL line, either a slash command or a message for the assistant.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput {
    Message(String),
    AttachImage(PathBuf),
    ShowMode,
    ShowHistory,
    ClearHistory,
    Exit,
    Unknown(String),
}

impl ReplInput {
    /// Returns `None` for blank lines.
    fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !trimmed.starts_with('/') {
            return Some(Self::Message(trimmed.to_string()));
        }

        let (command, argument) = match trimmed.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (trimmed, ""),
        };
        let input = match command {
            "/image" if !argument.is_empty() => Self::AttachImage(PathBuf::from(argument)),
            "/mode" => Self::ShowMode,
            "/history" => Self::ShowHistory,
            "/clear" => Self::ClearHistory,
            "/exit" | "/quit" => Self::Exit,
            _ => Self::Unknown(trimmed.to_string()),
        };
        Some(input)
    }
}

/// Completion, highlighting and hints for slash commands.
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let assistant = build_assistant(config_path)?;
    let status = assistant.status();

    let mut rl: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== AgriDiagnose Assistant ===".bright_green().bold());
    println!(
        "{}",
        format!(
            "Mode: {}. Type a question, /image <path> to attach a photo, or /exit to quit.",
            status.mode
        )
        .bright_black()
    );
    println!();

    let mut pending_images: Vec<ImageRef> = Vec::new();

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /exit to quit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        let Some(input) = ReplInput::parse(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.as_str());

        match input {
            ReplInput::Message(message) => {
                let images = std::mem::take(&mut pending_images);
                print_reply(&assistant, &message, &images).await;
            }
            ReplInput::AttachImage(path) => match image_from_path(&path) {
                Ok(image) => {
                    println!("{}", format!("Attached {image}").green());
                    pending_images.push(image);
                }
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
            ReplInput::ShowMode => {
                let status = assistant.status();
                println!(
                    "{}",
                    format!(
                        "Mode: {} (remote configured: {})",
                        status.mode, status.remote_configured
                    )
                    .bright_black()
                );
            }
            ReplInput::ShowHistory => {
                let history = assistant.history().await;
                if history.is_empty() {
                    println!("{}", "No conversation history.".bright_black());
                }
                for turn in history {
                    match turn.role {
                        TurnRole::User => println!("{}", format!("> {}", turn.content).green()),
                        TurnRole::Assistant => println!("{}", turn.content.bright_blue()),
                    }
                }
            }
            ReplInput::ClearHistory => {
                assistant.clear_history().await;
                println!("{}", "History cleared.".bright_black());
            }
            ReplInput::Exit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            ReplInput::Unknown(command) => {
                println!(
                    "{}",
                    format!("Unknown command: {command}. Available: {}", COMMANDS.join(", "))
                        .bright_black()
                );
            }
        }
    }

    Ok(())
}

async fn print_reply(assistant: &AssistantService, message: &str, images: &[ImageRef]) {
    match assistant.ask(message, images).await {
        Ok(reply) => {
            for line in reply.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
        Err(e) => eprintln!("{}", e.to_string().red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(
            ReplInput::parse("  my tomatoes have blight "),
            Some(ReplInput::Message("my tomatoes have blight".into()))
        );
    }

    #[test]
    fn test_blank_line_is_ignored() {
        assert_eq!(ReplInput::parse("   "), None);
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(
            ReplInput::parse("/image  photos/leaf 1.png"),
            Some(ReplInput::AttachImage(PathBuf::from("photos/leaf 1.png")))
        );
        assert_eq!(ReplInput::parse("/mode"), Some(ReplInput::ShowMode));
        assert_eq!(ReplInput::parse("/history"), Some(ReplInput::ShowHistory));
        assert_eq!(ReplInput::parse("/clear"), Some(ReplInput::ClearHistory));
        assert_eq!(ReplInput::parse("/exit"), Some(ReplInput::Exit));
        assert_eq!(ReplInput::parse("/quit"), Some(ReplInput::Exit));
    }

    #[test]
    fn test_image_without_path_is_unknown() {
        assert_eq!(
            ReplInput::parse("/image"),
            Some(ReplInput::Unknown("/image".into()))
        );
    }
}
