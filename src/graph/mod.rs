pub mod distance;
pub mod lineage;
pub mod ops;
pub mod snapshot;

pub use distance::{
    compute_distances, DistanceMap, DistanceOptions, NodeDistance, OutputShape, UNREACHED,
};
pub use lineage::trace_lineage;
pub use ops::{direct_links, LinkIndex};
pub use snapshot::GraphSnapshot;
