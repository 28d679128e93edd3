use crate::{Attributes, Primitive};

#[inline]
fn same_schema<T>(a: &Attributes<T>, b: &Attributes<T>) -> bool {
    a.len() == b.len() && a.keys().eq(b.keys())
}

/// Euclidean distance between two attribute mappings.
///
/// Mappings over different attribute sets are infinitely far apart. This never fails.
pub fn euclidean_distance<T: Primitive>(a: &Attributes<T>, b: &Attributes<T>) -> T {
    squared_euclidean_distance(a, b).sqrt()
}

/// Same as [`euclidean_distance`], without the final square root.
pub fn squared_euclidean_distance<T: Primitive>(a: &Attributes<T>, b: &Attributes<T>) -> T {
    if !same_schema(a, b) {
        return T::infinity();
    }
    a.values().zip(b.values())
        .map(|(&av, &bv)| av - bv)
        .map(|v| v * v)
        .sum()
}

/// Index of the centroid closest to `point`. The lowest index wins ties.
pub(crate) fn nearest_centroid<T: Primitive>(point: &Attributes<T>, centroids: &[Attributes<T>]) -> usize {
    centroids.iter()
        .map(|c| squared_euclidean_distance(point, c))
        .enumerate()
        .fold((0, T::infinity()), |(best_idx, best_dist), (idx, dist)| {
            if dist < best_dist { (idx, dist) } else { (best_idx, best_dist) }
        })
        .0
}
