//! The interactive shell: read a line, route it, print the result.
//!
//! The loop has exactly two suspension points per iteration: the readline
//! call and the single in-flight completion request. Nothing else runs
//! concurrently, so there is never more than one outstanding request.

pub mod command;
pub mod dispatch;
pub mod spinner;

use anyhow::Result;
use console::style;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io;
use tracing::{info, warn};

use crate::llm::CompletionBackend;
use crate::session::Session;

use command::{Command, CLEAR_KEYWORD};
use dispatch::Dispatcher;

/// Prompt marker shown before each line of input.
const PROMPT: &str = "\n> ";

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Continue,
    Exit,
}

/// Run the interactive loop until the user quits.
pub async fn run<B: CompletionBackend>(session: Session<B>) -> Result<()> {
    let dispatcher = Dispatcher::new(session);
    let mut editor = DefaultEditor::new()?;

    info!("starting interactive shell");
    print_banner();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let input = line.trim();
                if !input.is_empty() {
                    if let Err(e) = editor.add_history_entry(input) {
                        warn!("failed to record history entry: {e}");
                    }
                }
                if run_command(Command::parse(input), &dispatcher).await? == Disposition::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!("session ended");
    Ok(())
}

/// Carry out one classified command.
async fn run_command<B: CompletionBackend>(
    command: Command,
    dispatcher: &Dispatcher<B>,
) -> Result<Disposition> {
    match command {
        Command::Terminate => return Ok(Disposition::Exit),
        Command::ClearScreen => {
            clear_screen()?;
            print_banner();
        }
        Command::Help => println!("{}", help_text()),
        Command::Generate(prompt) => {
            let text = dispatcher.dispatch(&prompt).await?;
            println!("{text}");
        }
    }
    Ok(Disposition::Continue)
}

/// Print the client banner.
fn print_banner() {
    println!("{}", style("gptsh").cyan().bold());
}

/// Clear the visible terminal buffer and home the cursor.
fn clear_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}

/// The fixed help block: one line per recognized command.
fn help_text() -> String {
    format!("  {CLEAR_KEYWORD} - clear screen\n  exit - exit client\n  quit - same as exit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionError, CompletionRequest};
    use crate::session::GenerationParams;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn params() -> GenerationParams {
        GenerationParams {
            model: "gpt-3.5-turbo-instruct".to_string(),
            max_tokens: 64,
            temperature: 0.5,
            top_p: 1.0,
        }
    }

    enum Outcome {
        Reply(&'static str),
        RateLimited,
        Broken,
    }

    struct MockBackend {
        calls: Arc<AtomicUsize>,
        outcome: Outcome,
    }

    #[async_trait]
    impl CompletionBackend for MockBackend {
        async fn complete(
            &self,
            _request: &CompletionRequest<'_>,
        ) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Reply(text) => Ok(text.to_string()),
                Outcome::RateLimited => Err(CompletionError::RateLimited),
                Outcome::Broken => Err(CompletionError::EmptyCompletion),
            }
        }
    }

    fn dispatcher(outcome: Outcome) -> (Dispatcher<MockBackend>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = MockBackend {
            calls: calls.clone(),
            outcome,
        };
        (Dispatcher::new(Session::new(params(), backend)), calls)
    }

    #[tokio::test]
    async fn test_terminate_skips_generation() {
        let (dispatcher, calls) = dispatcher(Outcome::Reply("unused"));
        let disposition = run_command(Command::parse("quit"), &dispatcher)
            .await
            .unwrap();
        assert_eq!(disposition, Disposition::Exit);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_help_keeps_shell_running() {
        let (dispatcher, calls) = dispatcher(Outcome::Reply("unused"));
        let disposition = run_command(Command::parse("help"), &dispatcher)
            .await
            .unwrap();
        assert_eq!(disposition, Disposition::Continue);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prompt_reaches_the_backend() {
        let (dispatcher, calls) = dispatcher(Outcome::Reply("hello"));
        let disposition = run_command(Command::parse("Tell me a joke"), &dispatcher)
            .await
            .unwrap();
        assert_eq!(disposition, Disposition::Continue);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_keeps_shell_running() {
        let (dispatcher, _) = dispatcher(Outcome::RateLimited);
        let disposition = run_command(Command::parse("Tell me a joke"), &dispatcher)
            .await
            .unwrap();
        assert_eq!(disposition, Disposition::Continue);
    }

    #[tokio::test]
    async fn test_unclassified_failure_propagates() {
        let (dispatcher, _) = dispatcher(Outcome::Broken);
        let result = run_command(Command::parse("Tell me a joke"), &dispatcher).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_help_block_has_three_lines() {
        let help = help_text();
        let lines: Vec<&str> = help.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(CLEAR_KEYWORD));
        assert!(lines[0].contains("clear screen"));
        assert!(lines[1].contains("exit"));
        assert!(lines[2].contains("quit"));
    }
}
