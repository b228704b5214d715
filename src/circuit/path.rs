use super::{distance::euclidean, types::Cluster};

/// Greedy nearest-neighbour chain over cluster centroids.
///
/// Starts at the cluster with the smallest x and repeatedly moves to the
/// closest unvisited centroid (3D distance). Ties go to the cluster created
/// first. O(C^2) in the number of clusters.
pub fn order_clusters(clusters: Vec<Cluster>) -> Vec<Cluster> {
    let mut remaining = clusters;
    let mut ordered = Vec::with_capacity(remaining.len());

    let Some(start) = leftmost(&remaining) else {
        return ordered;
    };
    ordered.push(remaining.remove(start));

    while !remaining.is_empty() {
        let last = &ordered[ordered.len() - 1].centroid;

        let mut best = 0;
        let mut best_distance = euclidean(last, &remaining[0].centroid);
        for (i, candidate) in remaining.iter().enumerate().skip(1) {
            let d = euclidean(last, &candidate.centroid);
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }

        // Vec::remove keeps creation order for the tie-break on later steps
        ordered.push(remaining.remove(best));
    }

    ordered
}

fn leftmost(clusters: &[Cluster]) -> Option<usize> {
    let mut iter = clusters.iter().enumerate();
    let (mut best, first) = iter.next()?;
    let mut min_x = first.centroid.x;

    for (i, c) in iter {
        if c.centroid.x < min_x {
            best = i;
            min_x = c.centroid.x;
        }
    }

    Some(best)
}
