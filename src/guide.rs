//! The manual steps printed after a run.
//!
//! redate never rewrites history itself. The guide walks through backing up
//! each source, stitching the sources into one repository and running
//! `git filter-repo` with the generated callback.

use std::fmt::Write as _;
use std::path::Path;

use crate::plan::{Plan, Source};

/// Render the "NEXT STEPS" block for `plan`, pointing at `filter_script`.
pub fn next_steps(plan: &Plan, filter_script: &Path) -> String {
    let mut out = String::new();
    let Some((first, rest)) = plan.sources.split_first() else {
        return out;
    };

    out.push_str("1. BACKUP FIRST:\n");
    let _ = writeln!(out, "   cd {}", first.path.display());
    let _ = writeln!(out, "   git branch backup/{0} {0}", first.branch);
    for source in rest {
        out.push('\n');
        let _ = writeln!(out, "   cd {}", source.path.display());
        let _ = writeln!(
            out,
            "   git bundle create ~/{}-backup.bundle --all",
            remote_name(source)
        );
    }

    out.push_str("\n2. CREATE UNIFIED REPO:\n");
    // Next to the first source, never inside a source's work tree.
    if let Some(parent) = first.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let _ = writeln!(out, "   cd {}", parent.display());
    }
    out.push_str("   mkdir unified-repo && cd unified-repo\n");
    out.push_str("   git init\n\n");
    let first_remote = remote_name(first);
    let _ = writeln!(out, "   git remote add {first_remote} {}", first.path.display());
    let _ = writeln!(out, "   git fetch {first_remote}");
    let _ = writeln!(out, "   git checkout -b main {first_remote}/{}", first.branch);

    for source in rest {
        let remote = remote_name(source);
        let tip = format!("{remote}/{}", source.branch);
        out.push('\n');
        let _ = writeln!(out, "   git remote add {remote} {}", source.path.display());
        let _ = writeln!(out, "   git fetch {remote}");
        out.push_str("   # Graft onto the current history, then replay its commits\n");
        let _ = writeln!(out, "   ROOT=$(git rev-list --max-parents=0 {tip})");
        out.push_str("   git replace --graft $ROOT HEAD\n");
        let _ = writeln!(out, "   git cherry-pick $ROOT..{tip}");
    }

    out.push_str("\n3. REWRITE DATES:\n");
    out.push_str("   pip install git-filter-repo\n");
    out.push_str("   git filter-repo --commit-callback \"\n");
    let _ = writeln!(out, "   exec(open('{}').read())", filter_script.display());
    out.push_str("   process(commit)\n");
    out.push_str("   \"\n");

    out.push_str("\n4. VERIFY:\n");
    out.push_str("   git log --format=\"%ad %s\" --date=short | head -50\n");
    out.push_str("   git log --format=\"%ad\" --date=short | sort | uniq -c\n");
    out
}

/// A git remote name derived from the source's display name.
fn remote_name(source: &Source) -> String {
    let name: String = source
        .display_name()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if name.is_empty() {
        "source".to_string()
    } else {
        name
    }
}
