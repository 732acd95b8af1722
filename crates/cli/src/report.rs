//! Rendering of the run summary on stdout.

use std::io::{self, Write};

use rollout::{RepositoryOutcome, RolloutSummary};

/// Writes `summary` as one line per repository followed by totals.
pub fn write_text(summary: &RolloutSummary, out: &mut impl Write) -> io::Result<()> {
    let width = summary
        .repositories
        .iter()
        .map(|r| r.repository.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("Repository".len());

    writeln!(out, "{:<width$}  Outcome", "Repository")?;
    for report in &summary.repositories {
        writeln!(
            out,
            "{:<width$}  {}",
            report.repository.as_str(),
            describe(&report.outcome)
        )?;
    }
    if !summary.excluded.is_empty() {
        let excluded: Vec<&str> = summary.excluded.iter().map(|r| r.as_str()).collect();
        writeln!(out, "\nExcluded: {}", excluded.join(", "))?;
    }
    writeln!(
        out,
        "\nCreated: {}  Already present: {}  Would create: {}  Failed: {}",
        summary.created(),
        summary.already_present(),
        summary.would_create(),
        summary.failed()
    )
}

/// Writes `summary` as pretty-printed JSON.
pub fn write_json(summary: &RolloutSummary, out: &mut impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)
}

fn describe(outcome: &RepositoryOutcome) -> String {
    match outcome {
        RepositoryOutcome::Created {
            base_commit,
            pull_request,
        } => {
            let short: String = base_commit.as_str().chars().take(7).collect();
            format!("pull request {pull_request} opened (from {short})")
        }
        RepositoryOutcome::TemplateExists => "template already present".to_string(),
        RepositoryOutcome::WouldCreate => "template missing (dry run)".to_string(),
        RepositoryOutcome::Failed { step, reason } => format!("failed at {step}: {reason}"),
    }
}
