//! Interactive shell
//!
//! Reads one command per line and runs it against a single `App`, so the
//! request cache and the favorites store are shared across the whole session.

use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app::App;
use crate::cli::{parse_shell_line, ShellInput};
use crate::render;

const PROMPT: &str = "moviq> ";

const GREETING: &str = "Type `help` for commands, `quit` to leave.\n";

/// Runs the shell until `quit` or end of input
///
/// Errors from individual commands are printed and the session continues;
/// only failures to read input or write output end it early.
pub async fn run<R, W>(app: &mut App, input: R, out: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    write!(out, "{}{}", GREETING, PROMPT)?;
    out.flush()?;

    while let Some(line) = lines.next_line().await? {
        match parse_shell_line(&line) {
            Ok(ShellInput::Empty) => {}
            Ok(ShellInput::Quit) => break,
            Ok(ShellInput::Help(text)) => write!(out, "{}", text)?,
            Ok(ShellInput::Action(action)) => match app.execute(&action).await {
                Ok(text) => write!(out, "{}", text)?,
                Err(e) => writeln!(out, "error: {}", render::error_message(&e))?,
            },
            Err(e) => writeln!(out, "{}", e)?,
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }

    tracing::debug!(cached = app.catalog().cache().len(), "shell session ended");
    Ok(())
}
