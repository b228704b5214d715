use std::collections::BTreeSet;

use super::{
    centroid::running_mean,
    distance::within_radius,
    types::{Cluster, Point3},
};
use crate::telemetry::RawSample;

/// First-fit clustering in input order.
///
/// Each sample joins the earliest-created cluster whose centroid lies within
/// `radius` on both x and y; otherwise it starts a new cluster. There is no
/// second pass, so the result depends on sample order.
pub fn cluster_samples(samples: &[RawSample], radius: f64) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();

    for sample in samples {
        let existing = clusters
            .iter_mut()
            .find(|c| within_radius(&c.centroid, sample.x, sample.y, radius));

        match existing {
            Some(cluster) => {
                cluster.centroid = running_mean(
                    &cluster.centroid,
                    cluster.member_count,
                    sample.x,
                    sample.y,
                    sample.z,
                );
                cluster.member_count += 1;
                cluster.source_ids.insert(sample.source_id);
            }
            None => clusters.push(Cluster {
                centroid: Point3::new(sample.x, sample.y, sample.z),
                member_count: 1,
                source_ids: BTreeSet::from([sample.source_id]),
            }),
        }
    }

    clusters
}
