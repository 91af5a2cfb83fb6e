use serde::Serialize;
use tracing::debug;

use crate::core::staleness::{classify, VersionVerdict};
use crate::index::PackageIndex;
use crate::manifest::ManifestEntry;
use crate::util::parallel::run_in_parallel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestVerdict {
    pub package: String,
    pub version: String,
    pub verdict: VersionVerdict,
}

pub fn check_outdated_manifest(
    entries: &[ManifestEntry],
    index: &dyn PackageIndex,
    jobs: Option<usize>,
) -> Vec<ManifestVerdict> {
    let targets: Vec<(&ManifestEntry, &str)> = entries
        .iter()
        .filter_map(|entry| match entry.constraints.last() {
            Some(constraint) => Some((entry, constraint.version.as_str())),
            None => {
                debug!(package = %entry.name, "no version information in manifest");
                None
            }
        })
        .collect();

    run_in_parallel(targets, jobs, |(entry, version)| ManifestVerdict {
        package: entry.key.to_string(),
        version: version.to_string(),
        verdict: classify(index, entry.key.as_str(), Some(version)),
    })
}

#[cfg(test)]
mod tests {
    use crate::core::staleness::VerdictStatus;
    use crate::index::FixedIndex;
    use crate::manifest::check::check_outdated_manifest;
    use crate::manifest::parse_manifest;

    #[test]
    fn checks_constrained_entries_only() {
        let entries = parse_manifest("Flask==1.0.0\nclick>=8.1.0\nrich\n").expect("parse");
        let index = FixedIndex::new()
            .with_package("flask", &["1.0.0", "2.0.0"])
            .with_package("click", &["8.1.0"]);

        let verdicts = check_outdated_manifest(&entries, &index, Some(2));
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].package, "flask");
        assert_eq!(verdicts[0].verdict.status, VerdictStatus::Outdated);
        assert_eq!(verdicts[1].package, "click");
        assert_eq!(verdicts[1].version, "8.1.0");
        assert_eq!(verdicts[1].verdict.status, VerdictStatus::UpToDate);
    }
}
