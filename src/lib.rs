//! redate: spread commits from one or more branches evenly across a date range.
//!
//! redate reads the history of each branch named in a plan file, lays the
//! commits out back to back, and assigns each one a new date so that every day
//! in the range receives its share. It writes the resulting mapping and a
//! `git filter-repo` callback that applies it; rewriting history is left to
//! the user.
//!
//! # Architecture
//!
//! - **Plan**: Parse and validate the TOML plan
//! - **Git**: Read commit logs
//! - **Redistribute**: Bucket-fill commits onto days
//! - **Report** / **Emit** / **Guide**: Summaries, output files, next steps
//! - **Num**: Checked addition over integers and floats

pub mod emit;
pub mod git;
mod guide;
pub mod num;
pub mod plan;
pub mod redistribute;
pub mod report;
mod run;

pub use git::Commit;
pub use guide::next_steps;
pub use num::{Number, add};
pub use plan::{Plan, Source, template};
pub use redistribute::Assignment;
pub use report::Summary;
pub use run::{Error, Outcome, RunConfig, run, run_plan};
