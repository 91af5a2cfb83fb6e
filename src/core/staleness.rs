use std::cmp::Ordering;

use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::core::version::{compare_versions, major_minor};
use crate::index::{sorted_versions, PackageIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStatus {
    LookupFailed,
    UpToDate,
    Outdated,
    BeyondLatest,
}

impl VerdictStatus {
    pub fn code(self) -> i32 {
        match self {
            VerdictStatus::LookupFailed => -1,
            VerdictStatus::UpToDate => 0,
            VerdictStatus::Outdated => 1,
            VerdictStatus::BeyondLatest => 999,
        }
    }
}

impl Serialize for VerdictStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Staleness {
    pub outdated: Option<bool>,
    pub latest: Option<String>,
}

impl Staleness {
    fn known(outdated: bool, latest: impl Into<String>) -> Self {
        Self {
            outdated: Some(outdated),
            latest: Some(latest.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionVerdict {
    pub status: VerdictStatus,
    pub major: Staleness,
    pub minor: Staleness,
}

impl VersionVerdict {
    pub fn lookup_failed() -> Self {
        Self {
            status: VerdictStatus::LookupFailed,
            major: Staleness::default(),
            minor: Staleness::default(),
        }
    }
}

pub fn classify(index: &dyn PackageIndex, package: &str, installed: Option<&str>) -> VersionVerdict {
    match sorted_versions(index, package) {
        Ok(versions) => classify_against(package, installed, &versions),
        Err(err) => {
            debug!(package, error = %err, "version lookup failed");
            VersionVerdict::lookup_failed()
        }
    }
}

pub fn classify_against(package: &str, installed: Option<&str>, versions: &[String]) -> VersionVerdict {
    let Some(latest) = versions.last() else {
        return VersionVerdict::lookup_failed();
    };

    let Some(installed) = installed else {
        return VersionVerdict {
            status: VerdictStatus::UpToDate,
            major: Staleness::known(true, latest.as_str()),
            minor: Staleness::known(true, latest.as_str()),
        };
    };

    if compare_versions(installed, latest) == Ordering::Greater {
        info!(package, installed, latest = %latest, "installed version is beyond the index");
        return VersionVerdict {
            status: VerdictStatus::BeyondLatest,
            major: Staleness::known(false, installed),
            minor: Staleness::known(false, installed),
        };
    }

    let major_outdated = compare_versions(installed, latest) == Ordering::Less;
    if !major_outdated {
        debug!(package, installed, "up to date");
        return VersionVerdict {
            status: VerdictStatus::UpToDate,
            major: Staleness::known(false, latest.as_str()),
            minor: Staleness::known(false, latest.as_str()),
        };
    }

    info!(package, installed, latest = %latest, "major version outdated");
    let line = major_minor(installed);
    let minor = match versions.iter().rev().find(|v| major_minor(v) == line) {
        Some(latest_minor) => {
            let outdated = compare_versions(installed, latest_minor) == Ordering::Less;
            if outdated {
                info!(package, installed, latest = %latest_minor, "minor version outdated");
            }
            Staleness::known(outdated, latest_minor.as_str())
        }
        None => {
            info!(package, installed, "no releases share the installed minor line");
            Staleness::default()
        }
    };

    VersionVerdict {
        status: VerdictStatus::Outdated,
        major: Staleness::known(true, latest.as_str()),
        minor,
    }
}

#[cfg(test)]
mod tests {
    use crate::core::staleness::{classify, Staleness, VerdictStatus, VersionVerdict};
    use crate::index::FixedIndex;

    fn index() -> FixedIndex {
        FixedIndex::new()
            .with_package("pkg", &["2.0.0", "1.0.0", "1.5.0"])
            .with_package("patched", &["1.0.0", "1.0.5", "1.5.0", "2.0.0"])
    }

    #[test]
    fn current_release_is_up_to_date() {
        let verdict = classify(&index(), "pkg", Some("2.0.0"));
        assert_eq!(verdict.status, VerdictStatus::UpToDate);
        assert_eq!(verdict.status.code(), 0);
        assert_eq!(verdict.major, Staleness::known(false, "2.0.0"));
        assert_eq!(verdict.minor, Staleness::known(false, "2.0.0"));
    }

    #[test]
    fn old_major_without_newer_sibling() {
        let verdict = classify(&index(), "pkg", Some("1.0.0"));
        assert_eq!(verdict.status.code(), 1);
        assert_eq!(verdict.major, Staleness::known(true, "2.0.0"));
        assert_eq!(verdict.minor, Staleness::known(false, "1.0.0"));
    }

    #[test]
    fn old_major_with_newer_sibling_on_same_line() {
        let verdict = classify(&index(), "patched", Some("1.0.0"));
        assert_eq!(verdict.status, VerdictStatus::Outdated);
        assert_eq!(verdict.minor, Staleness::known(true, "1.0.5"));
    }

    #[test]
    fn unknown_minor_line_is_reported_as_unknown() {
        let verdict = classify(&index(), "pkg", Some("1.2.0"));
        assert_eq!(verdict.status, VerdictStatus::Outdated);
        assert_eq!(verdict.minor, Staleness::default());
    }

    #[test]
    fn beyond_latest_reports_installed_as_latest() {
        let verdict = classify(&index(), "pkg", Some("3.0.0"));
        assert_eq!(verdict.status.code(), 999);
        assert_eq!(verdict.major, Staleness::known(false, "3.0.0"));
        assert_eq!(verdict.minor, Staleness::known(false, "3.0.0"));
    }

    #[test]
    fn missing_installed_version_is_treated_as_stale() {
        let verdict = classify(&index(), "pkg", None);
        assert_eq!(verdict.major, Staleness::known(true, "2.0.0"));
        assert_eq!(verdict.minor, Staleness::known(true, "2.0.0"));
    }

    #[test]
    fn lookup_failures_degrade_to_unknown() {
        assert_eq!(
            classify(&index(), "ghost", Some("1.0")),
            VersionVerdict::lookup_failed()
        );
        let hollow = FixedIndex::new().with_package("hollow", &[]);
        assert_eq!(classify(&hollow, "hollow", Some("1.0")).status.code(), -1);
    }

    #[test]
    fn verdict_serializes_status_as_code() {
        let verdict = classify(&index(), "pkg", Some("3.0.0"));
        let json = serde_json::to_value(&verdict).expect("serialize");
        assert_eq!(json["status"], 999);
        assert_eq!(json["major"]["latest"], "3.0.0");
    }
}
