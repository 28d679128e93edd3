use crate::{distance, Attributes, DataSet, KMeans, KMeansConfig, KMeansError, KMeansState, Outcome, Primitive};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::time::Instant;

pub(crate) struct Lloyd;
impl Lloyd {
    /// Label every record with the index of its nearest centroid.
    fn update_cluster_assignments<T: Primitive>(data: &mut DataSet<T>, centroids: &[Attributes<T>]) {
        data.records_mut().par_iter_mut()
            .for_each(|record| {
                let cluster_no = distance::nearest_centroid(record.attributes(), centroids);
                record.set_cluster_no(cluster_no);
            });
    }

    fn update_centroid_frequency<T: Primitive>(data: &DataSet<T>, state: &mut KMeansState<T>) {
        state.centroid_frequency = vec![0; state.k];
        state.assignments = data.records().iter()
            .map(|r| r.cluster_no().unwrap_or_default())
            .collect();
        for &cluster_no in &state.assignments {
            state.centroid_frequency[cluster_no] += 1;
        }
    }

    #[inline(always)] pub fn calculate<'a, T, F>(data: &mut DataSet<T>, k: usize, max_iter: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>, KMeansError>
                where T: Primitive, for<'c> F: FnOnce(&mut DataSet<T>, usize, &KMeansConfig<'c, T>) -> Vec<Attributes<T>> {
        KMeans::validate_k(data, k)?;
        if max_iter == 0 {
            return Err(KMeansError::InvalidIterationLimit);
        }

        let mut state = KMeansState::new(k);

        // Initialize clusters and notify subscriber
        state.centroids = init(data, k, config);
        if state.centroids.len() != k {
            return Err(KMeansError::CentroidCount { expected: k, found: state.centroids.len() });
        }
        (config.init_done)(&state.centroids);

        let mut abort_strategy = config.abort_strategy.create_logic();
        let started = Instant::now();
        for i in 1..=max_iter {
            Self::update_cluster_assignments(data, &state.centroids);
            state.centroids = data.recompute_centroids(&state.centroids);
            let new_sse = data.calculate_total_sse(&state.centroids);
            state.iterations = i;
            debug!("iteration {}: sse {:e} -> {:e} (improvement {:e})", i, state.sse, new_sse, state.sse - new_sse);

            // Notify subscriber about finished iteration
            (config.iteration_done)(&state, i, new_sse);
            let keep_going = abort_strategy.next(new_sse);
            state.sse = new_sse;
            if !keep_going {
                state.outcome = Outcome::Converged;
                break;
            }
            if config.deadline.is_some_and(|deadline| started.elapsed() >= deadline) {
                state.outcome = Outcome::DeadlineReached;
                break;
            }
        }

        match state.outcome {
            Outcome::Converged => {},
            Outcome::MaxIterationsReached => warn!("stopped after {} iterations without converging", state.iterations),
            Outcome::DeadlineReached => warn!("deadline passed after {} iterations without converging", state.iterations),
        }
        Self::update_centroid_frequency(data, &mut state);
        info!("k-means finished: k = {}, {:?} after {} iterations, sse = {}", k, state.outcome, state.iterations, state.sse);
        Ok(state)
    }
}


#[cfg(test)]
mod tests {
    use crate::helpers::testing::*;
    use crate::*;
    use rand::prelude::*;
    use std::cell::Cell;
    use std::time::Duration;

    fn seeded<'a>(seed: u64) -> KMeansConfig<'a, f64> {
        KMeansConfig::build().random_generator(StdRng::seed_from_u64(seed)).build()
    }

    #[test]
    fn black_and_white_palette() {
        for seed in 0..25 {
            let mut kmean = KMeans::new(black_and_white());
            let res = kmean.kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &seeded(seed)).unwrap();
            assert!(same_partition(&res.assignments, &[0, 1, 0, 1]), "seed {}: {:?}", seed, res.assignments);
            assert_eq!(res.centroid_frequency, vec![2, 2]);
            assert!(res.outcome.is_converged());
            assert_eq!(kmean.data().cluster_labels(), res.assignments.iter().copied().map(Some).collect::<Vec<_>>());

            let dark = res.assignments[0];
            assert_approx_eq!(res.centroids[dark]["Red"], 0.5);
            assert_approx_eq!(res.centroids[1 - dark]["Blue"], 254.5);
            assert_approx_eq!(res.centroids[dark]["Alpha"], 255.0);
            // Four records, each 0.5 away from its centroid on three channels.
            assert_approx_eq!(res.sse, 3.0);
        }
    }

    #[test]
    fn k_equal_to_record_count_gives_singletons() {
        let rows = [[1.0, 2.0], [3.0, -4.0], [0.5, 0.5], [10.0, 7.0], [-2.0, 0.0]];
        for seed in 0..5 {
            let mut kmean = KMeans::new(dataset(&["x", "y"], &rows));
            let res = kmean.kmeans_lloyd(rows.len(), 100, KMeans::init_kmeanplusplus, &seeded(seed)).unwrap();
            assert_eq!(res.sse, 0.0);
            assert_eq!(res.centroid_frequency, vec![1; rows.len()]);
            assert_eq!(res.iterations, 2);
            let mut labels = res.assignments.clone();
            labels.sort_unstable();
            assert_eq!(labels, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn single_cluster_is_the_mean() {
        let mut kmean = KMeans::new(dataset(&["x", "y"], &[[0.0, 0.0], [2.0, 0.0], [0.0, 4.0], [2.0, 4.0]]));
        let res = kmean.kmeans_lloyd(1, 10, KMeans::init_kmeanplusplus, &seeded(0)).unwrap();
        assert_eq!(res.centroids, vec![point(&[("x", 1.0), ("y", 2.0)])]);
        assert_eq!(res.assignments, vec![0; 4]);
        assert_approx_eq!(res.sse, 20.0);
    }

    #[test]
    fn sse_never_grows() {
        let mut rnd = StdRng::seed_from_u64(1337);
        let rows: Vec<[f64; 2]> = (0..400).map(|_| [rnd.gen_range(0.0..100.0), rnd.gen_range(-5.0..5.0)]).collect();
        let observed = Cell::new(0usize);
        let check = |state: &KMeansState<f64>, nr: usize, new_sse: f64| {
            assert!(new_sse <= state.sse + 1e-9, "iteration {}: {} -> {}", nr, state.sse, new_sse);
            observed.set(nr);
        };
        let conf = KMeansConfig::build()
            .random_generator(StdRng::seed_from_u64(5))
            .iteration_done(&check)
            .build();

        let mut kmean = KMeans::new(dataset(&["x", "y"], &rows));
        let res = kmean.kmeans_lloyd(5, 500, KMeans::init_kmeanplusplus, &conf).unwrap();
        assert!(res.outcome.is_converged());
        assert_eq!(observed.get(), res.iterations);
        assert!(res.assignments.iter().all(|&c| c < 5));
        assert_eq!(res.centroid_frequency.iter().sum::<usize>(), 400);
    }

    #[test]
    fn callbacks_see_initial_centroids_and_every_iteration() {
        let seeds = Cell::new(0usize);
        let iterations = Cell::new(0usize);
        let init_done = |centroids: &[Attributes<f64>]| seeds.set(centroids.len());
        let iteration_done = |_: &KMeansState<f64>, nr: usize, _: f64| {
            assert_eq!(nr, iterations.get() + 1);
            iterations.set(nr);
        };
        let conf = KMeansConfig::build()
            .random_generator(StdRng::seed_from_u64(3))
            .init_done(&init_done)
            .iteration_done(&iteration_done)
            .build();
        let mut kmean = KMeans::new(black_and_white());
        let res = kmean.kmeans_lloyd(3, 100, KMeans::init_kmeanplusplus, &conf).unwrap();
        assert_eq!(seeds.get(), 3);
        assert_eq!(iterations.get(), res.iterations);
    }

    #[test]
    fn iteration_cap_is_not_convergence() {
        let mut kmean = KMeans::new(black_and_white());
        let res = kmean.kmeans_lloyd(2, 1, KMeans::init_kmeanplusplus, &seeded(1)).unwrap();
        assert_eq!(res.outcome, Outcome::MaxIterationsReached);
        assert!(!res.outcome.is_converged());
        assert_eq!(res.iterations, 1);
        assert!(kmean.data().records().iter().all(|r| r.cluster_no().is_some()));
    }

    #[test]
    fn deadline_stops_the_loop() {
        let conf = KMeansConfig::build()
            .random_generator(StdRng::seed_from_u64(1))
            .deadline(Duration::ZERO)
            .build();
        let mut kmean = KMeans::new(black_and_white());
        let res = kmean.kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &conf).unwrap();
        assert_eq!(res.outcome, Outcome::DeadlineReached);
        assert_eq!(res.iterations, 1);
    }

    #[test]
    fn patience_strategy_runs_extra_iterations() {
        let conf = KMeansConfig::build()
            .random_generator(StdRng::seed_from_u64(1))
            .abort_strategy(AbortStrategy::NoImprovementForXIterations { x: 3, threshold: 0.0, abort_on_negative: false })
            .build();
        let mut kmean = KMeans::new(dataset(&["x"], &[[0.0], [0.0], [10.0], [10.0]]));
        let res = kmean.kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &conf).unwrap();
        assert!(res.outcome.is_converged());
        // One improving iteration, then three without improvement.
        assert_eq!(res.iterations, 4);
        assert_eq!(res.sse, 0.0);
    }

    #[test]
    fn huge_finite_values_do_not_abort_the_run() {
        let data = DataSet::from_points(["x"], vec![vec![-1e200], vec![1e200], vec![0.0]]).unwrap();
        for seed in 0..10 {
            let mut kmean = KMeans::new(data.clone());
            let res = kmean.kmeans_lloyd(2, 10, KMeans::init_kmeanplusplus, &seeded(seed)).unwrap();
            assert_eq!(res.assignments.len(), 3);
            assert!(res.assignments.iter().all(|&c| c < 2));
            assert_eq!(res.centroid_frequency.iter().sum::<usize>(), 3);
        }
        let mut kmean = KMeans::new(data);
        assert!(kmean.kmeans_lloyd(3, 10, KMeans::init_random_points, &seeded(4)).is_ok());
    }

    #[test]
    fn f32_palette() {
        let data = DataSet::<f32>::from_colors(&[
            Rgba::new(0, 0, 0, 255), Rgba::new(250, 250, 250, 255),
            Rgba::new(4, 2, 0, 255), Rgba::new(255, 255, 245, 255),
            Rgba::new(128, 0, 0, 255),
        ]);
        let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(8)).build();
        let mut kmean = KMeans::new(data);
        let res = kmean.kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &conf).unwrap();
        assert_eq!(res.assignments[0], res.assignments[2]);
        assert_eq!(res.assignments[1], res.assignments[3]);
        assert_ne!(res.assignments[0], res.assignments[1]);
    }
}
