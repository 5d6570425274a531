//! Line-oriented interactive search session.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::agent::SearchAgent;
use crate::formatters::format_outcome_markdown;

/// Shown before each query is read.
pub const PROMPT: &str = "query> ";

/// Inputs that end the session, compared case-insensitively.
const EXIT_COMMANDS: [&str; 3] = ["q", "exit", "quit"];

/// What one input line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// End the session.
    Exit,
    /// Nothing to do.
    Blank,
    /// Run a search for the trimmed text.
    Query(&'a str),
}

impl<'a> Line<'a> {
    /// Classify a raw input line.
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            Self::Blank
        } else if EXIT_COMMANDS.iter().any(|c| line.eq_ignore_ascii_case(c)) {
            Self::Exit
        } else {
            Self::Query(line)
        }
    }
}

/// Read queries from `input` until an exit command or end of input, writing
/// each outcome to `output`. Returns the number of queries answered.
///
/// # Errors
///
/// Returns an error if reading or writing fails. Search failures are not
/// errors; they show up as empty results.
pub async fn run_session<R, W>(
    agent: &SearchAgent,
    input: R,
    mut output: W,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut answered = 0;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Line::parse(&line) {
            Line::Exit => break,
            Line::Blank => {}
            Line::Query(query) => {
                let outcome = agent.run(query).await;
                output.write_all(format_outcome_markdown(&outcome).as_bytes()).await?;
                output.write_all(b"\n").await?;
                answered += 1;
            }
        }
    }

    tracing::debug!(answered, "Session ended");
    Ok(answered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands() {
        assert_eq!(Line::parse("q"), Line::Exit);
        assert_eq!(Line::parse("  EXIT \n"), Line::Exit);
        assert_eq!(Line::parse("Quit"), Line::Exit);
        assert_eq!(Line::parse("quit now"), Line::Query("quit now"));
    }

    #[test]
    fn test_blank_lines_skipped() {
        assert_eq!(Line::parse(""), Line::Blank);
        assert_eq!(Line::parse(" \t "), Line::Blank);
    }

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(Line::parse("  Grnite papers  "), Line::Query("Grnite papers"));
    }
}
