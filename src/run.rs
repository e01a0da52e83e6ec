//! Run a redistribution plan end to end.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::emit::{self, Outputs};
use crate::git::{self, Commit, Git};
use crate::guide;
use crate::plan::{self, Plan};
use crate::redistribute::{self, Assignment, redistribute};
use crate::report::{self, Summary};

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Options that override or extend the plan file.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Output directory, taking precedence over the plan's
    pub out_dir: Option<PathBuf>,

    /// Compute and report, but write nothing
    pub dry_run: bool,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub assignments: Vec<Assignment>,
    pub summary: Summary,
    /// `None` on a dry run
    pub outputs: Option<Outputs>,
}

/// Load the plan at `plan_path` and run it.
pub async fn run(plan_path: &Path, config: &RunConfig) -> Result<Outcome, Error> {
    let plan = Plan::load(plan_path).await?;
    run_plan(&plan, config).await
}

/// Load every source, spread the commits over the plan's days, report, and
/// write the mapping and filter script.
pub async fn run_plan(plan: &Plan, config: &RunConfig) -> Result<Outcome, Error> {
    println!("{RULE}");
    println!("COMMIT REDISTRIBUTION");
    println!("{RULE}");
    println!();

    let offset = plan.offset()?;
    let commits = load_commits(plan).await?;
    println!("\nTotal commits: {}", commits.len());
    warn_duplicates(&commits);

    let days = plan.days();
    println!(
        "Date range: {} → {} ({} days)",
        plan.start,
        plan.end,
        days.len()
    );

    println!("\nRedistributing commits...");
    let assignments = redistribute(&commits, &days, offset)?;
    let summary = Summary::new(&assignments, &days);
    println!("Average commits per day: {:.1}", summary.average_per_day());

    println!("\nSample redistribution (first 10 and last 10):");
    println!("{THIN_RULE}");
    print!("{}", report::sample(&assignments));

    println!("\nVerifying coverage...");
    println!("  {}", summary.coverage_line());
    if !summary.missing.is_empty() {
        warn!(missing = summary.missing.len(), "some days received no commits");
    }
    if let Some(spread) = summary.spread_line() {
        println!("\n{spread}");
    }

    if config.dry_run {
        println!("\nDry run: nothing written.");
        return Ok(Outcome {
            assignments,
            summary,
            outputs: None,
        });
    }

    let dir = config
        .out_dir
        .clone()
        .unwrap_or_else(|| plan.default_output_dir());
    let outputs = emit::write_outputs(&dir, &assignments).await?;
    println!("\nMapping written to: {}", outputs.mapping.display());
    println!("Filter script written to: {}", outputs.filter_script.display());

    println!("\n{RULE}");
    println!("NEXT STEPS");
    println!("{RULE}");
    println!();
    print!("{}", guide::next_steps(plan, &outputs.filter_script));

    Ok(Outcome {
        assignments,
        summary,
        outputs: Some(outputs),
    })
}

/// Read each source's branch, oldest first, concatenated in plan order.
async fn load_commits(plan: &Plan) -> Result<Vec<Commit>, Error> {
    let mut all = Vec::new();
    for source in &plan.sources {
        let name = source.display_name();
        println!("Loading commits from {name} ({})...", source.branch);

        let repo = Git::open(&source.path).await.map_err(|e| Error::Source {
            name: name.clone(),
            source: e,
        })?;
        let commits = repo.log(&source.branch).await.map_err(|e| Error::Source {
            name: name.clone(),
            source: e,
        })?;

        println!("  Found {} commits", commits.len());
        info!(source = %name, root = %repo.root().display(), commits = commits.len(), "loaded");
        all.extend(commits);
    }
    Ok(all)
}

/// The same commit reachable from two sources gets two slots; flag it.
fn warn_duplicates(commits: &[Commit]) {
    let mut seen = HashSet::new();
    for commit in commits {
        if !seen.insert(commit.sha.as_str()) {
            warn!(sha = %commit.sha, "commit appears in more than one source");
        }
    }
}

/// Errors that can occur during a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Plan(#[from] plan::Error),

    #[error("failed to load commits from {name}")]
    Source {
        name: String,
        #[source]
        source: git::Error,
    },

    #[error("failed to redistribute commits")]
    Redistribute(#[from] redistribute::Error),

    #[error("failed to write output")]
    Emit(#[from] emit::Error),
}
