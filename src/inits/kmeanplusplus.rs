use crate::{Attributes, DataSet, KMeansConfig, Primitive};
use log::debug;
use std::ops::DerefMut;

#[inline(always)]
pub fn calculate<T: Primitive>(data: &mut DataSet<T>, k: usize, config: &KMeansConfig<'_, T>) -> Vec<Attributes<T>> {
    let mut rnd = config.rnd.borrow_mut();
    data.reset_seeding();

    let mut centroids = Vec::with_capacity(k);
    // First centroid is drawn uniformly, every following one weighted by its distance to the picks so far
    centroids.extend(data.random_from_dataset(rnd.deref_mut()));
    while centroids.len() < k {
        match data.calculate_weighed_centroid(rnd.deref_mut()) {
            Some(centroid) => centroids.push(centroid),
            None => break,
        }
    }
    debug!("k-means++ picked records {:?}", data.indices_of_centroids());
    centroids
}

#[cfg(test)]
mod tests {
    use crate::helpers::testing::*;
    use crate::{KMeans, KMeansConfig};
    use rand::prelude::*;

    #[test]
    fn seeds_are_records_in_pick_order() {
        let mut data = dataset(&["x", "y"], &[[0.0, 0.0], [1.0, 0.0], [50.0, 50.0], [51.0, 50.0], [-40.0, 10.0]]);
        let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(1337)).build();
        let centroids = KMeans::init_kmeanplusplus(&mut data, 3, &conf);

        assert_eq!(centroids.len(), 3);
        assert_eq!(data.indices_of_centroids().len(), 3);
        for (centroid, &idx) in centroids.iter().zip(data.indices_of_centroids()) {
            assert_eq!(centroid, data.records()[idx].attributes());
        }
    }

    #[test]
    fn reseeding_starts_over() {
        let mut data = black_and_white();
        let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(9)).build();
        KMeans::init_kmeanplusplus(&mut data, 4, &conf);
        assert_eq!(data.indices_of_centroids().len(), 4);
        KMeans::init_kmeanplusplus(&mut data, 2, &conf);
        assert_eq!(data.indices_of_centroids().len(), 2);
    }

    #[test]
    fn second_seed_comes_from_the_other_side() {
        // Records sitting on the first seed carry no weight.
        for seed in 0..20 {
            let mut data = dataset(&["x"], &[[0.0], [100.0], [0.0], [100.0]]);
            let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(seed)).build();
            let centroids = KMeans::init_kmeanplusplus(&mut data, 2, &conf);
            let (a, b) = (centroids[0]["x"], centroids[1]["x"]);
            assert!((a < 50.0) != (b < 50.0), "seed {}: {} / {}", seed, a, b);
        }
    }
}
