use super::*;
use chrono::{TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

fn at(x: f64, y: f64, z: f64) -> RawSample {
    from_driver(1, x, y, z)
}

fn from_driver(source_id: u32, x: f64, y: f64, z: f64) -> RawSample {
    RawSample {
        source_id,
        timestamp: Utc.timestamp_opt(1_733_662_800, 0).unwrap(),
        x,
        y,
        z,
    }
}

fn xy(path: &OrderedPath) -> Vec<(f64, f64)> {
    path.points().iter().map(|p| (p.x, p.y)).collect()
}

/// Three drivers lapping a circle of 24 corners, a few noisy readings per corner
fn noisy_ring(seed: u64) -> Vec<RawSample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut samples = Vec::new();

    for lap in 0..4 {
        for driver in [1, 44, 81] {
            for corner in 0..24 {
                let angle = 2.0 * PI * corner as f64 / 24.0;
                samples.push(from_driver(
                    driver,
                    1000.0 * angle.cos() + rng.gen_range(-3.0..3.0),
                    1000.0 * angle.sin() + rng.gen_range(-3.0..3.0),
                    lap as f64 + rng.gen_range(-1.0..1.0),
                ));
            }
        }
    }

    samples
}

#[test]
fn test_two_clusters_scenario() {
    let samples = vec![at(0.0, 0.0, 0.0), at(0.1, 0.1, 0.0), at(10.0, 10.0, 0.0)];

    let clusters = cluster_samples(&samples, 1.0);
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].member_count, 2);
    assert!((clusters[0].centroid.x - 0.05).abs() < 1e-12);
    assert!((clusters[0].centroid.y - 0.05).abs() < 1e-12);

    let path = reconstruct(&samples, 1.0).unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(xy(&path)[1], (10.0, 10.0));
}

#[test]
fn test_empty_input_gives_empty_path() {
    let path = reconstruct(&[], 5.0).unwrap();
    assert!(path.is_empty());
    assert_eq!(path.total_length(), 0.0);
    assert!(path.bounds().is_none());
}

#[test]
fn test_invalid_radius_rejected() {
    for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = reconstruct(&[at(0.0, 0.0, 0.0)], radius);
        assert!(
            matches!(result, Err(Error::InvalidParameter(_))),
            "radius {} should be rejected",
            radius
        );
    }
}

#[test]
fn test_identical_samples_collapse() {
    let samples = vec![at(3.0, 4.0, 5.0); 50];
    let clusters = cluster_samples(&samples, 0.5);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].member_count, 50);
    assert_eq!(clusters[0].centroid, Point3::new(3.0, 4.0, 5.0));

    let path = reconstruct(&samples, 0.5).unwrap();
    assert_eq!(path.len(), 1);
    assert_eq!(path.closed_length(), 0.0);
}

#[test]
fn test_merge_is_per_axis_not_euclidean() {
    // Euclidean distance is ~1.27, but each axis is within 1.0
    let clusters = cluster_samples(&[at(0.0, 0.0, 0.0), at(0.9, 0.9, 0.0)], 1.0);
    assert_eq!(clusters.len(), 1);

    // One axis out of range is enough to split
    let clusters = cluster_samples(&[at(0.0, 0.0, 0.0), at(0.2, 1.2, 0.0)], 1.0);
    assert_eq!(clusters.len(), 2);
}

#[test]
fn test_z_does_not_gate_merging() {
    let clusters = cluster_samples(&[at(0.0, 0.0, 0.0), at(0.0, 0.0, 100.0)], 1.0);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].centroid.z, 50.0);
}

#[test]
fn test_first_fit_wins() {
    // The third sample is within range of both clusters and joins the older one
    let samples = vec![at(0.0, 0.0, 0.0), at(1.5, 0.0, 0.0), at(0.8, 0.0, 0.0)];
    let clusters = cluster_samples(&samples, 1.0);

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].member_count, 2);
    assert!((clusters[0].centroid.x - 0.4).abs() < 1e-12);
    assert_eq!(clusters[1].member_count, 1);
}

#[test]
fn test_running_mean_weights_prior_members() {
    let samples = vec![at(0.0, 0.0, 0.0), at(0.0, 0.0, 0.0), at(0.0, 0.0, 0.0), at(0.8, 0.4, 4.0)];
    let clusters = cluster_samples(&samples, 1.0);

    assert_eq!(clusters[0].member_count, 4);
    assert!((clusters[0].centroid.x - 0.2).abs() < 1e-12);
    assert!((clusters[0].centroid.y - 0.1).abs() < 1e-12);
    assert!((clusters[0].centroid.z - 1.0).abs() < 1e-12);
}

#[test]
fn test_source_ids_are_unique() {
    let samples = vec![
        from_driver(81, 0.0, 0.0, 0.0),
        from_driver(81, 0.1, 0.0, 0.0),
        from_driver(4, 0.0, 0.1, 0.0),
    ];
    let clusters = cluster_samples(&samples, 1.0);

    assert_eq!(clusters[0].source_ids.iter().copied().collect::<Vec<_>>(), vec![4, 81]);
}

#[test]
fn test_path_starts_leftmost_and_chains_nearest() {
    let samples = vec![
        at(5.0, 0.0, 0.0),
        at(0.0, 0.0, 0.0),
        at(10.0, 0.0, 0.0),
        at(1.0, 0.0, 0.0),
    ];

    let path = reconstruct(&samples, 0.5).unwrap();
    assert_eq!(
        xy(&path),
        vec![(0.0, 0.0), (1.0, 0.0), (5.0, 0.0), (10.0, 0.0)]
    );
    assert_eq!(path.total_length(), 10.0);
    assert_eq!(path.closed_length(), 20.0);
}

#[test]
fn test_distance_ties_go_to_older_cluster() {
    let path = reconstruct(&[at(1.0, 2.0, 0.0), at(0.0, 0.0, 0.0), at(1.0, -2.0, 0.0)], 0.5)
        .unwrap();
    assert_eq!(xy(&path), vec![(0.0, 0.0), (1.0, 2.0), (1.0, -2.0)]);

    let path = reconstruct(&[at(1.0, -2.0, 0.0), at(0.0, 0.0, 0.0), at(1.0, 2.0, 0.0)], 0.5)
        .unwrap();
    assert_eq!(xy(&path), vec![(0.0, 0.0), (1.0, -2.0), (1.0, 2.0)]);
}

#[test]
fn test_leftmost_tie_goes_to_older_cluster() {
    let path = reconstruct(&[at(0.0, 5.0, 0.0), at(0.0, -5.0, 0.0), at(3.0, 0.0, 0.0)], 0.5)
        .unwrap();
    assert_eq!(xy(&path)[0], (0.0, 5.0));
}

#[test]
fn test_path_uses_3d_distance() {
    // Planar distances would favour the second cluster; elevation flips it
    let samples = vec![at(0.0, 0.0, 0.0), at(1.0, 0.0, 50.0), at(2.0, 0.0, 0.0)];
    let path = reconstruct(&samples, 0.5).unwrap();
    assert_eq!(xy(&path), vec![(0.0, 0.0), (2.0, 0.0), (1.0, 0.0)]);
}

#[test]
fn test_noisy_ring_reconstructs_circuit() {
    let samples = noisy_ring(42);
    let path = reconstruct(&samples, DEFAULT_CLUSTER_RADIUS).unwrap();

    assert!(!path.is_empty());
    assert!(path.len() <= samples.len());
    assert_eq!(path.len(), 24);

    // Each hop goes to an adjacent corner, never across the circle
    for pair in path.points().windows(2) {
        assert!(euclidean(&pair[0], &pair[1]) < 300.0);
    }

    let expected = 24.0 * 2.0 * 1000.0 * (PI / 24.0).sin();
    assert!((path.closed_length() - expected).abs() < 100.0);

    let clusters = cluster_samples(&samples, DEFAULT_CLUSTER_RADIUS);
    for cluster in &clusters {
        assert_eq!(cluster.member_count, 12);
        assert_eq!(cluster.source_ids.len(), 3);
    }
}

#[test]
fn test_reconstruction_is_deterministic() {
    let samples = noisy_ring(7);
    let reconstructor = CircuitReconstructor::new(DEFAULT_CLUSTER_RADIUS).unwrap();

    let first = reconstructor.reconstruct(&samples);
    let second = reconstructor.reconstruct(&samples);
    assert_eq!(first, second);
}

#[test]
fn test_centroids_do_not_merge_again() {
    let path = reconstruct(&noisy_ring(3), DEFAULT_CLUSTER_RADIUS).unwrap();
    let centroids: Vec<RawSample> = path
        .points()
        .iter()
        .map(|p| at(p.x, p.y, p.z))
        .collect();

    let again = cluster_samples(&centroids, DEFAULT_CLUSTER_RADIUS);
    assert_eq!(again.len(), path.len());
}

#[test]
fn test_bounds_and_padding() {
    let path = reconstruct(
        &[at(-5.0, 2.0, 0.0), at(10.0, -3.0, 0.0), at(4.0, 8.0, 0.0)],
        0.5,
    )
    .unwrap();

    let bounds = path.bounds().unwrap();
    assert_eq!(bounds.min_x, -5.0);
    assert_eq!(bounds.max_x, 10.0);
    assert_eq!(bounds.min_y, -3.0);
    assert_eq!(bounds.max_y, 8.0);
    assert_eq!(bounds.width(), 15.0);
    assert_eq!(bounds.height(), 11.0);

    let padded = bounds.padded(10.0);
    assert_eq!(padded.width(), 35.0);
    assert_eq!(padded.min_y, -13.0);
}

#[test]
fn test_default_reconstructor_radius() {
    assert_eq!(
        CircuitReconstructor::default().cluster_radius(),
        DEFAULT_CLUSTER_RADIUS
    );
}
