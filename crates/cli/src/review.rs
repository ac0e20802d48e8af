//! The `review` command: one review session from load to (optional) submit.

use crate::render;
use anyhow::{bail, Context, Result};
use kyb_review::{
    ApiClient, Attestation, CommitOutcome, Credentials, EditableField, ReportSnapshot,
    ReviewSession, ATTESTATION_STATEMENT,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

/// One reviewer action from the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewAction {
    Set(EditableField, String),
    Revert(EditableField),
    Cancel(EditableField),
}

/// What to do within a single session. `actions` are applied in order.
#[derive(Debug, Default)]
pub struct ReviewPlan {
    pub report: Option<PathBuf>,
    pub actions: Vec<ReviewAction>,
    pub output: Option<PathBuf>,
    pub submit: bool,
    pub attest: bool,
}

/// Merges actions collected per flag back into command-line order, using the
/// argument index each one was given at.
pub fn in_command_line_order(mut indexed: Vec<(usize, ReviewAction)>) -> Vec<ReviewAction> {
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, action)| action).collect()
}

/// Parses a `--set` argument of the form `path=value`. The value may be empty
/// and may itself contain `=`.
pub fn parse_assignment(s: &str) -> Result<(EditableField, String), String> {
    let (path, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{s}'"))?;
    let field = path.trim().parse::<EditableField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

pub async fn run<F>(
    company_id: &str,
    plan: &ReviewPlan,
    client: &ApiClient,
    mut credentials: F,
) -> Result<()>
where
    F: FnMut() -> Result<Credentials>,
{
    let mut session = ReviewSession::new(company_id);

    match &plan.report {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read report file '{}'", path.display()))?;
            let raw = serde_json::from_str(&content)
                .with_context(|| format!("Report file '{}' is not valid JSON", path.display()))?;
            let snapshot = ReportSnapshot::from_value(raw)?;
            if !snapshot.company_id().is_empty() && snapshot.company_id() != company_id {
                bail!(
                    "Report file '{}' belongs to company {}, not {}",
                    path.display(),
                    snapshot.company_id(),
                    company_id
                );
            }
            session.load_report(snapshot);
            info!("Loaded report for {} from '{}'", company_id, path.display());
        }
        None => {
            println!("Generating KYB report for {company_id}...");
            session.generate(client, &credentials()?).await?;
        }
    }

    for action in &plan.actions {
        match action {
            ReviewAction::Set(field, value) => match session.apply_input(*field, value)? {
                CommitOutcome::Recorded(new_value) => info!("Set {} to {}", field, new_value),
                CommitOutcome::Reverted => info!("{} matches the report value; reverted", field),
            },
            ReviewAction::Revert(field) => session.revert(*field),
            ReviewAction::Cancel(field) => {
                session.cancel_edit(*field)?;
            }
        }
    }

    print!("{}", render::review(&session));

    if let Some(path) = &plan.output {
        let payload = session.payload()?;
        fs::write(path, serde_json::to_string_pretty(&payload)?)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        println!("Submission payload written to {}", path.display());
    }

    if plan.submit {
        let attestation = if plan.attest {
            Attestation::Confirmed
        } else {
            prompt_attestation()?
        };
        let edit_count = session.manual_edits().len();
        session.submit(client, &credentials()?, attestation).await?;
        println!("✅ Review submitted for {company_id} with {edit_count} manual edit(s).");
    }

    Ok(())
}

fn prompt_attestation() -> Result<Attestation> {
    println!();
    println!("{ATTESTATION_STATEMENT}");
    print!("Type 'yes' to confirm: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(Attestation::from(answer.trim().eq_ignore_ascii_case("yes")))
}
