use crate::{AbortStrategy, Attributes, DataSet, KMeansError, Primitive};
use std::cell::RefCell;
use std::time::Duration;
use rand::prelude::*;

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&[Attributes<T>]);
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>, usize, T);

/// This is a structure holding various configuration options for a k-means calculation, such as
/// the random number generator to use, when to stop iterating, or a couple of callbacks that can be set to get
/// status information from a running k-means calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **centroids**: The initial centroids, one per cluster
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the iteration
    /// - **iteration_id**: Number of the current iteration, starting at 1
    /// - **sse**: New total SSE (**state** contains the SSE of the previous iteration)
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// The abort-strategy to use for the running calculation
    pub(crate) abort_strategy: AbortStrategy<T>,
    /// Wall-clock budget for the iteration phase
    pub(crate) deadline: Option<Duration>,
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_,_,_| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            abort_strategy: AbortStrategy::default(),
            deadline: None,
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("abort_strategy", &self.abort_strategy)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running k-means calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that should be used in the k-means calculation.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Set the abort-strategy to use during a running k-means calculation. For more information,
    /// see documentation of [`AbortStrategy`].
    /// ## Default
    /// [`AbortStrategy::NoImprovement`] `{ threshold: 0 }`
    pub fn abort_strategy(mut self, abort_strategy: AbortStrategy<T>) -> Self {
        self.config.abort_strategy = abort_strategy; self
    }
    /// Shorthand for [`AbortStrategy::NoImprovement`] with the given precision.
    pub fn precision(self, threshold: T) -> Self {
        self.abort_strategy(AbortStrategy::NoImprovement { threshold })
    }
    /// Stop iterating once the iteration phase has run for longer than **deadline**. The check happens
    /// between iterations, so one started iteration always completes.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = Some(deadline); self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// Why the iteration phase of a k-means calculation stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The abort-strategy reported convergence.
    Converged,
    /// `max_iter` iterations ran without convergence.
    MaxIterationsReached,
    /// The configured deadline passed without convergence.
    DeadlineReached,
}
impl Outcome {
    pub fn is_converged(self) -> bool { self == Outcome::Converged }
}

/// State during calculation, as well as the final result, as returned by the API.
/// The cluster labels themselves live on the records of the [`DataSet`]; **assignments** is a copy of them.
///
/// ## Fields
/// - **k**: The amount of clusters that were requested when calculating this k-means result
/// - **sse**: Total sum of squared distances from all records to their cluster's centroid
/// - **centroids**: Cluster centers, index i belongs to cluster i
/// - **centroid_frequency**: Amount of records in each cluster
/// - **assignments**: Cluster of each record, in record order
/// - **iterations**: Amount of iterations that ran
/// - **outcome**: Why the calculation stopped
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub sse: T,
    pub centroids: Vec<Attributes<T>>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub outcome: Outcome,
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(k: usize) -> Self {
        Self {
            k,
            sse: T::infinity(),
            centroids: Vec::with_capacity(k),
            centroid_frequency: vec![0usize; k],
            assignments: Vec::new(),
            iterations: 0,
            outcome: Outcome::MaxIterationsReached,
        }
    }
}


/// Entrypoint of this crate's clustering API.
///
/// Create an instance of this struct, handing over the [`DataSet`] you want to cluster. The data set is owned by
/// the instance for as long as it lives, and calculations mutate its records' cluster labels in place, so
/// runs over one data set are serialized by the borrow checker.
///
/// ## Supported variants
/// - k-Means clustering (Lloyd) [`KMeans::kmeans_lloyd`]
///
/// ## Supported initialization methods
/// - K-Mean++ [`KMeans::init_kmeanplusplus`]
/// - Random points within the data's bounding box [`KMeans::init_random_points`]
/// - Precomputed centroids [`KMeans::init_precomputed`]
#[derive(Clone, Debug)]
pub struct KMeans<T: Primitive = f64> {
    data: DataSet<T>,
}
impl<T: Primitive> KMeans<T> {
    pub fn new(data: DataSet<T>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &DataSet<T> { &self.data }

    pub fn into_data(self) -> DataSet<T> { self.data }

    pub(crate) fn validate_k(data: &DataSet<T>, k: usize) -> Result<(), KMeansError> {
        if data.is_empty() {
            return Err(KMeansError::EmptyDataSet);
        }
        if k == 0 || k > data.len() {
            return Err(KMeansError::InvalidK { k, records: data.len() });
        }
        Ok(())
    }

    /// Normal K-Means algorithm implementation (Lloyd).
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for, `1..=records`
    /// - **max_iter**: Limit the maximum amount of iterations, at least 1
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result). Hitting **max_iter** or the deadline
    /// is not an error; it is reported through [`KMeansState::outcome`].
    ///
    /// ## Example
    /// ```rust
    /// use palette_kmeans::*;
    /// use rand::prelude::*;
    ///
    /// let data = DataSet::from_points(["x", "y"], vec![
    ///     vec![0.0, 0.0], vec![0.5, 0.0], vec![10.0, 10.0], vec![10.5, 10.0],
    /// ]).unwrap();
    /// let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(42)).build();
    ///
    /// let mut kmean = KMeans::new(data);
    /// let result = kmean.kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &conf).unwrap();
    ///
    /// assert!(result.outcome.is_converged());
    /// assert_eq!(result.assignments[0], result.assignments[1]);
    /// assert_ne!(result.assignments[0], result.assignments[2]);
    /// ```
    pub fn kmeans_lloyd<'a, F>(&mut self, k: usize, max_iter: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>, KMeansError>
                where for<'c> F: FnOnce(&mut DataSet<T>, usize, &KMeansConfig<'c, T>) -> Vec<Attributes<T>> {
        crate::variants::Lloyd::calculate(&mut self.data, k, max_iter, init, config)
    }

    /// Run only the k-means++ seeding and return the **k** initial centroids.
    pub fn kmeanspp(&mut self, k: usize, config: &KMeansConfig<'_, T>) -> Result<Vec<Attributes<T>>, KMeansError> {
        Self::validate_k(&self.data, k)?;
        Ok(Self::init_kmeanplusplus(&mut self.data, k, config))
    }

    /// K-Mean++ initialization method
    ///
    /// ## Description
    /// This initialization method starts by uniformly selecting one record as first centroid.
    /// Proceeding from there, each further centroid is drawn among the remaining records, with a probability
    /// proportional to the record's distance from the nearest centroid picked so far.
    /// See [`DataSet::calculate_weighed_centroid`].
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_kmeanplusplus(data: &mut DataSet<T>, k: usize, config: &KMeansConfig<'_, T>) -> Vec<Attributes<T>> {
        crate::inits::kmeanplusplus::calculate(data, k, config)
    }

    /// Random-Point initialization method
    ///
    /// ## Description
    /// Synthesizes **k** centroids uniformly within the per-attribute bounds of the data set.
    /// Unlike k-means++, the centroids are generally not records of the data set.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_random_points(data: &mut DataSet<T>, k: usize, config: &KMeansConfig<'_, T>) -> Vec<Attributes<T>> {
        crate::inits::randompoint::calculate(data, k, config)
    }

    /// Precomputed initialization method
    ///
    /// ## Description
    /// Uses the given centroids as they are. Their amount has to match **k**.
    pub fn init_precomputed(centroids: Vec<Attributes<T>>) -> impl FnOnce(&mut DataSet<T>, usize, &KMeansConfig<'_, T>) -> Vec<Attributes<T>> {
        move |data, k, config| crate::inits::precomputed::calculate(data, k, config, centroids)
    }
}
