mod centroid;
mod distance;
mod greedy;
mod path;
mod types;

#[cfg(test)]
mod tests;

pub use distance::euclidean;
pub use greedy::cluster_samples;
pub use path::order_clusters;
pub use types::{Bounds, Cluster, OrderedPath, Point3};

use crate::error::{Error, Result};
use crate::telemetry::RawSample;

/// Default merge tolerance, in feed coordinate units
pub const DEFAULT_CLUSTER_RADIUS: f64 = 10.0;

/// Rebuilds a circuit polyline from unordered location samples
#[derive(Debug, Clone, Copy)]
pub struct CircuitReconstructor {
    cluster_radius: f64,
}

impl CircuitReconstructor {
    /// Fails with `InvalidParameter` unless the radius is finite and positive
    pub fn new(cluster_radius: f64) -> Result<Self> {
        if !cluster_radius.is_finite() || cluster_radius <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "cluster radius must be positive, got {}",
                cluster_radius
            )));
        }
        Ok(Self { cluster_radius })
    }

    pub fn cluster_radius(&self) -> f64 {
        self.cluster_radius
    }

    pub fn reconstruct(&self, samples: &[RawSample]) -> OrderedPath {
        let clusters = cluster_samples(samples, self.cluster_radius);
        tracing::debug!(
            samples = samples.len(),
            clusters = clusters.len(),
            radius = self.cluster_radius,
            "clustered samples"
        );
        OrderedPath::from(order_clusters(clusters))
    }
}

impl Default for CircuitReconstructor {
    fn default() -> Self {
        Self {
            cluster_radius: DEFAULT_CLUSTER_RADIUS,
        }
    }
}

/// Cluster `samples` and chain the centroids into a circuit path
pub fn reconstruct(samples: &[RawSample], cluster_radius: f64) -> Result<OrderedPath> {
    Ok(CircuitReconstructor::new(cluster_radius)?.reconstruct(samples))
}
