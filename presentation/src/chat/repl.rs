//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ProgressReporter;
use relay_application::{RelayChatInput, RelayChatUseCase};
use relay_domain::SessionId;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

/// Plain words that end the chat, matched case-insensitively.
const EXIT_WORDS: [&str; 3] = ["bye", "exit", "quit"];

/// What the REPL should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Send(String),
    Command(String),
    Exit,
    Skip,
}

fn classify(line: &str) -> Action {
    let line = line.trim();
    if line.is_empty() {
        return Action::Skip;
    }
    if EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
        return Action::Exit;
    }
    if line.starts_with('/') {
        return Action::Command(line.to_string());
    }
    Action::Send(line.to_string())
}

/// Interactive chat REPL
///
/// Keeps one session for the lifetime of the REPL; `/new` starts another.
pub struct ChatRepl {
    use_case: RelayChatUseCase,
    session_id: SessionId,
    show_progress: bool,
    formatter: ConsoleFormatter,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(use_case: RelayChatUseCase) -> Self {
        Self {
            use_case,
            session_id: SessionId::generate(),
            show_progress: true,
            formatter: ConsoleFormatter::new(true),
            history_file: dirs::data_dir().map(|p| p.join("chat-relay").join("history.txt")),
        }
    }

    /// Set whether to show a spinner while waiting
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.formatter = ConsoleFormatter::new(color);
        self
    }

    /// Override the line-editor history location (`None` disables it)
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline("You: ") {
                Ok(line) => match classify(&line) {
                    Action::Skip => continue,
                    Action::Exit => {
                        println!("Bye!");
                        break;
                    }
                    Action::Command(cmd) => {
                        if self.handle_command(&cmd).await {
                            break;
                        }
                    }
                    Action::Send(message) => {
                        let _ = rl.add_history_entry(&message);
                        self.send(message).await;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│             Chat Relay - Chat Mode          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model:   {}", self.use_case.model());
        println!("Session: {}", self.session_id);
        println!();
        println!("Type 'bye', 'exit' or 'quit' to leave, /help for commands.");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /new             - Start a new session");
                println!("  /history         - Show this session's messages");
                println!("  /session         - Show the current session id");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/new" => {
                self.session_id = SessionId::generate();
                println!("Started session {}", self.session_id);
                false
            }
            "/session" => {
                println!("{}", self.session_id);
                false
            }
            "/history" => {
                match self.use_case.history(self.session_id.as_str()).await {
                    Ok(messages) => println!("{}", self.formatter.history(&messages)),
                    Err(e) => eprintln!("{}", self.formatter.error(&e.to_string())),
                }
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn send(&self, message: String) {
        let progress = if self.show_progress {
            ProgressReporter::start(self.use_case.model())
        } else {
            ProgressReporter::hidden()
        };

        let input = RelayChatInput::new(message).with_session_id(self.session_id.as_str());
        match self.use_case.execute(input).await {
            Ok(output) => {
                progress.finish();
                println!("{}", self.formatter.reply(&output.reply));
            }
            Err(e) => {
                progress.fail();
                eprintln!("{}", self.formatter.error(&e.to_string()));
            }
        }
        println!();
    }
}
