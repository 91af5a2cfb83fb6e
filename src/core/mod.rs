pub mod environment;
pub mod node;
pub mod package;
pub mod staleness;
pub mod version;

pub use environment::Environment;
pub use node::{Edge, Node, NodeKey, ROOT_NAME, ROOT_VERSION};
pub use package::{check_outdated_packages, Package, PackageVerdict};
pub use staleness::{classify, Staleness, VerdictStatus, VersionVerdict};
pub use version::{compare_versions, LooseVersion};
