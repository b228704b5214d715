use super::types::Point3;

pub fn euclidean(a: &Point3, b: &Point3) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Per-axis tolerance check on x and y only; z never gates a merge
pub fn within_radius(centroid: &Point3, x: f64, y: f64, radius: f64) -> bool {
    (centroid.x - x).abs() <= radius && (centroid.y - y).abs() <= radius
}
