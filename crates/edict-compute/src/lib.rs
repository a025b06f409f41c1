//! Advisory compute sizing: estimate resource needs from comment-set size
//! and route processing from current system load.

pub mod router;

pub use router::{assess_requirements, route, ComputeRequirements, ComputeTarget, SystemLoad};
