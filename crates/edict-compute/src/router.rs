//! Advisory compute sizing and routing.
//!
//! Estimates resource needs from comment-set size and picks a processing
//! target from current system load. Reporting only; nothing here affects
//! the correctness of extraction, fusion, or amendment generation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a processing job should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeTarget {
    /// Everything on this machine.
    Local,
    /// Local preprocessing, remote heavy lifting.
    Hybrid,
    /// Fully remote.
    Cloud,
}

impl fmt::Display for ComputeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeTarget::Local => write!(f, "local"),
            ComputeTarget::Hybrid => write!(f, "hybrid"),
            ComputeTarget::Cloud => write!(f, "cloud"),
        }
    }
}

/// Estimated resource needs for a comment set.
///
/// # Examples
///
/// ```
/// use edict_compute::router::{assess_requirements, ComputeTarget};
///
/// let req = assess_requirements(500);
/// assert_eq!(req.compute_type, ComputeTarget::Local);
/// assert_eq!(req.memory_required, "512MB");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequirements {
    /// Size of the comment set.
    pub num_comments: usize,
    /// Recommended processing target.
    pub compute_type: ComputeTarget,
    /// Rough memory estimate.
    pub memory_required: String,
    /// Rough wall-clock estimate.
    pub processing_time: String,
    /// Human-readable recommendation.
    pub recommended_action: String,
}

/// Estimate resource needs from comment count.
///
/// Four fixed size bands: under 1k, under 10k, under 100k, and everything
/// above.
///
/// # Examples
///
/// ```
/// use edict_compute::router::{assess_requirements, ComputeTarget};
///
/// assert_eq!(assess_requirements(50_000).compute_type, ComputeTarget::Hybrid);
/// assert_eq!(assess_requirements(500_000).compute_type, ComputeTarget::Cloud);
/// ```
pub fn assess_requirements(num_comments: usize) -> ComputeRequirements {
    let (compute_type, memory_required, processing_time) = if num_comments < 1_000 {
        (ComputeTarget::Local, "512MB", "1-2 minutes")
    } else if num_comments < 10_000 {
        (ComputeTarget::Local, "1GB", "5-10 minutes")
    } else if num_comments < 100_000 {
        (ComputeTarget::Hybrid, "2GB", "30-60 minutes")
    } else {
        (ComputeTarget::Cloud, "4GB+", "2-4 hours")
    };

    ComputeRequirements {
        num_comments,
        compute_type,
        memory_required: memory_required.into(),
        processing_time: processing_time.into(),
        recommended_action: format!("Process {compute_type}"),
    }
}

/// A snapshot of system memory utilisation.
///
/// # Examples
///
/// ```
/// use edict_compute::router::SystemLoad;
///
/// let load = SystemLoad { memory_percent: Some(42.0) };
/// assert!(load.memory_percent.unwrap() < 80.0);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLoad {
    /// Used memory as a percentage of total, `None` when unreadable.
    pub memory_percent: Option<f64>,
}

impl SystemLoad {
    /// Sample current memory utilisation.
    ///
    /// Reads `/proc/meminfo` on Linux; on other platforms, or when the
    /// read fails, returns `memory_percent: None` and routing falls back
    /// to the recommendation alone.
    pub fn sample() -> Self {
        Self {
            memory_percent: read_memory_percent(),
        }
    }
}

#[cfg(target_os = "linux")]
fn read_memory_percent() -> Option<f64> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    let mut total_kb = None;
    let mut available_kb = None;
    for line in meminfo.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total_kb = parse_kb(rest);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available_kb = parse_kb(rest);
        }
    }
    let total = total_kb?;
    let available = available_kb?;
    if total == 0.0 {
        return None;
    }
    Some((total - available) / total * 100.0)
}

#[cfg(target_os = "linux")]
fn parse_kb(rest: &str) -> Option<f64> {
    rest.trim()
        .split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
}

#[cfg(not(target_os = "linux"))]
fn read_memory_percent() -> Option<f64> {
    None
}

/// Pick a processing target from the recommendation and current load.
///
/// A local recommendation stays local while used memory is under 80%;
/// hybrid stays hybrid; everything else goes to the cloud.
///
/// # Examples
///
/// ```
/// use edict_compute::router::{assess_requirements, route, ComputeTarget, SystemLoad};
///
/// let req = assess_requirements(100);
/// let load = SystemLoad { memory_percent: Some(50.0) };
/// assert_eq!(route(&req, &load), ComputeTarget::Local);
/// ```
pub fn route(requirements: &ComputeRequirements, load: &SystemLoad) -> ComputeTarget {
    match requirements.compute_type {
        ComputeTarget::Local => match load.memory_percent {
            Some(pct) if pct < 80.0 => ComputeTarget::Local,
            None => ComputeTarget::Local,
            _ => ComputeTarget::Cloud,
        },
        ComputeTarget::Hybrid => ComputeTarget::Hybrid,
        ComputeTarget::Cloud => ComputeTarget::Cloud,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_bands_are_exclusive_at_boundaries() {
        assert_eq!(assess_requirements(999).compute_type, ComputeTarget::Local);
        assert_eq!(assess_requirements(999).memory_required, "512MB");
        assert_eq!(assess_requirements(1_000).memory_required, "1GB");
        assert_eq!(
            assess_requirements(9_999).compute_type,
            ComputeTarget::Local
        );
        assert_eq!(
            assess_requirements(10_000).compute_type,
            ComputeTarget::Hybrid
        );
        assert_eq!(
            assess_requirements(99_999).compute_type,
            ComputeTarget::Hybrid
        );
        assert_eq!(
            assess_requirements(100_000).compute_type,
            ComputeTarget::Cloud
        );
    }

    #[test]
    fn recommended_action_names_the_target() {
        let req = assess_requirements(200_000);
        assert_eq!(req.recommended_action, "Process cloud");
    }

    #[test]
    fn local_routes_local_under_memory_pressure_threshold() {
        let req = assess_requirements(100);
        let load = SystemLoad {
            memory_percent: Some(79.9),
        };
        assert_eq!(route(&req, &load), ComputeTarget::Local);
    }

    #[test]
    fn local_routes_cloud_when_memory_is_tight() {
        let req = assess_requirements(100);
        let load = SystemLoad {
            memory_percent: Some(91.0),
        };
        assert_eq!(route(&req, &load), ComputeTarget::Cloud);
    }

    #[test]
    fn unknown_load_keeps_local_recommendation() {
        let req = assess_requirements(100);
        let load = SystemLoad {
            memory_percent: None,
        };
        assert_eq!(route(&req, &load), ComputeTarget::Local);
    }

    #[test]
    fn hybrid_and_cloud_pass_through() {
        let load = SystemLoad {
            memory_percent: Some(10.0),
        };
        assert_eq!(
            route(&assess_requirements(50_000), &load),
            ComputeTarget::Hybrid
        );
        assert_eq!(
            route(&assess_requirements(500_000), &load),
            ComputeTarget::Cloud
        );
    }

    #[test]
    fn requirements_serialize_camel_case() {
        let req = assess_requirements(5);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("numComments").is_some());
        assert!(json.get("num_comments").is_none());
        assert_eq!(json["computeType"], "local");
    }
}
