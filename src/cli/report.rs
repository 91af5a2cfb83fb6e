use crate::core::node::Edge;
use crate::core::staleness::{VerdictStatus, VersionVerdict};
use crate::graph::distance::{DistanceMap, UNREACHED};
use crate::manifest::ReconciliationResult;
use crate::util::output::{bad, good, header};

pub fn render_distances(title: &str, distances: &DistanceMap) -> String {
    let mut out = String::new();
    out.push_str(&header(title));
    out.push('\n');
    let mut rows = distances.entries();
    rows.sort_by(|a, b| {
        let rank = |d: i64| if d == UNREACHED { i64::MAX } else { d };
        rank(a.distance)
            .cmp(&rank(b.distance))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    if rows.is_empty() {
        out.push_str("  None\n");
    }
    for row in rows {
        let distance = if row.distance == UNREACHED {
            "unreached".to_string()
        } else {
            row.distance.to_string()
        };
        out.push_str(&format!("  {:>9}  {} {}\n", distance, row.name, row.version));
    }
    out
}

pub fn render_links(package: &str, ancestors: &[&Edge], descendants: &[&Edge]) -> String {
    let mut out = String::new();
    for (title, edges) in [("Ancestor links", ancestors), ("Descendant links", descendants)] {
        out.push_str(&header(&format!("{title} of {package}:")));
        out.push('\n');
        if edges.is_empty() {
            out.push_str("  None\n");
        }
        for edge in edges {
            out.push_str(&format!("  {} -> {}\n", edge.from_node(), edge.to_node()));
        }
    }
    out
}

pub fn render_verdict(package: &str, version: Option<&str>, verdict: &VersionVerdict) -> String {
    let version = version.unwrap_or("(none)");
    let mut out = header(&format!("Analysing {package} {version}"));
    out.push('\n');

    match verdict.status {
        VerdictStatus::LookupFailed => {
            out.push_str("  Version lookup failed, rerun with -vv for details\n");
        }
        VerdictStatus::UpToDate => {
            out.push_str(&format!("  {}\n", good("Up to date.")));
        }
        VerdictStatus::BeyondLatest => {
            out.push_str(&format!(
                "  {version} is BEYOND the latest index version {}\n",
                verdict.minor.latest.as_deref().unwrap_or(version)
            ));
        }
        VerdictStatus::Outdated => {
            if verdict.major.outdated == Some(true) {
                out.push_str(&format!(
                    "  {}\n",
                    bad(&format!(
                        "Major version outdated {} > {version}",
                        verdict.major.latest.as_deref().unwrap_or("?")
                    ))
                ));
            }
            if verdict.minor.outdated == Some(true) {
                out.push_str(&format!(
                    "  {}\n",
                    bad(&format!(
                        "Minor version outdated {} > {version}",
                        verdict.minor.latest.as_deref().unwrap_or("?")
                    ))
                ));
            }
        }
    }
    out
}

pub fn render_reconciliation(result: &ReconciliationResult) -> String {
    let mut out = String::new();
    let mut section = |title: &str, lines: Vec<String>| {
        out.push_str(&header(title));
        out.push('\n');
        if lines.is_empty() {
            out.push_str("  None\n");
        }
        for line in lines {
            out.push_str(&format!("  {line}\n"));
        }
    };

    section(
        "Only in manifest:",
        result.manifest_only.iter().map(|key| key.to_string()).collect(),
    );
    section(
        "Only in environment:",
        result
            .environment_only
            .iter()
            .map(|key| key.to_string())
            .collect(),
    );
    section(
        "Same in manifest and environment:",
        result
            .same
            .iter()
            .map(|entry| format!("{} {}", entry.package, entry.version))
            .collect(),
    );
    section(
        "Versions differ (package, manifest, environment):",
        result
            .version_diff
            .iter()
            .map(|diff| format!("{} {} {}", diff.package, diff.manifest, diff.environment))
            .collect(),
    );
    out
}
