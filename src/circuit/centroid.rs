use super::types::Point3;

/// Fold one more member into a running mean of `count` members
pub fn running_mean(mean: &Point3, count: usize, x: f64, y: f64, z: f64) -> Point3 {
    let n = count as f64;
    let next = n + 1.0;

    Point3 {
        x: (mean.x * n + x) / next,
        y: (mean.y * n + y) / next,
        z: (mean.z * n + z) / next,
    }
}
