// Interactive session: show the estimate once, then answer industry
// descriptions line by line until EOF or "quit".
//
// The suggestion feature is optional here: without an embedding model the
// session still shows the estimate and says why suggestions are off.

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};
use tracing::warn;

use crate::capm::estimate::EstimateReport;
use crate::output::terminal;
use crate::suggest::{IndustryRanker, RankError, RankedSuggestion};

/// What became of one line of user input.
#[derive(Debug)]
pub enum LineOutcome {
    /// The user asked to leave.
    Quit,
    /// Blank input; nothing was ranked.
    Skipped,
    Suggested(Vec<RankedSuggestion>),
    Failed(RankError),
}

/// Interpret one input line against the ranker.
pub async fn handle_line(ranker: &IndustryRanker, line: &str, top_k: usize) -> LineOutcome {
    let query = line.trim();
    if query.eq_ignore_ascii_case("quit") || query.eq_ignore_ascii_case("exit") {
        return LineOutcome::Quit;
    }
    if query.is_empty() {
        return LineOutcome::Skipped;
    }
    match ranker.rank_top(query, top_k).await {
        Ok(suggestions) => LineOutcome::Suggested(suggestions),
        Err(e) => LineOutcome::Failed(e),
    }
}

/// Run the session against `input` (normally stdin).
///
/// `ranker` is None when the embedding model couldn't be loaded; the
/// estimate is still shown.
pub async fn run<R>(
    input: R,
    estimate: &EstimateReport,
    ranker: Option<&IndustryRanker>,
    top_k: usize,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    terminal::display_estimate(estimate);

    let Some(ranker) = ranker else {
        println!(
            "\n{} Industry suggestions are unavailable (embedding model not loaded).",
            "Note:".yellow()
        );
        println!(
            "{}",
            "Run `keystone download-model` to enable them.".dimmed()
        );
        return Ok(());
    };

    println!("\n{}", "=== Industry suggestions ===".bold());
    println!(
        "{}",
        "Describe the company's business in English (e.g. \"company that manufactures toilet soaps\").\n\
         Empty line to skip, \"quit\" to exit."
            .dimmed()
    );

    let mut lines = input.lines();
    loop {
        prompt().await?;
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            println!();
            break;
        };

        match handle_line(ranker, &line, top_k).await {
            LineOutcome::Quit => break,
            LineOutcome::Skipped => {
                println!("{}", "Nothing to rank; type a description.".dimmed());
            }
            LineOutcome::Suggested(suggestions) => {
                terminal::display_suggestions(line.trim(), &suggestions);
            }
            LineOutcome::Failed(e) => {
                warn!(error = %e, "Suggestion failed");
                println!("  {} {}", "Error:".red(), e);
            }
        }
    }

    Ok(())
}

async fn prompt() -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"\n> ")
        .await
        .context("Failed to write prompt")?;
    stdout.flush().await.context("Failed to flush stdout")
}
