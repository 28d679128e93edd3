//! # palette-kmeans - API documentation
//!
//! palette-kmeans is a small rust library for k-means clustering of records with named numeric attributes,
//! seeded with k-means++. Its main use is splitting the palette of an image into color layers.
//!
//! ## Design target
//! Records are kept as attribute-name to value mappings rather than raw vectors, so input tables can be
//! read and written with their column names intact. Distances between mappings over different attribute sets
//! are +infinity instead of an error, and every numeric edge case during a run has a defined outcome:
//! once a [`DataSet`] was built successfully, clustering it with a valid `k` does not fail.
//!
//! ## Supported centroid initializations
//! The outcome of each K-Means run depends on the initialization of its clusters. The initialization method
//! is a plain function handed to the clustering call. For a list of implemented initialization methods,
//! see [`KMeans`].
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`] (default)
//!
//! ## Example
//! ```rust
//! use palette_kmeans::*;
//! use std::io::Cursor;
//!
//! let input = "Red,Green,Blue,Alpha\n0,0,0,255\n255,255,255,255\n1,1,1,255\n254,254,254,255\n";
//! let data = DataSet::<f64>::from_reader(Cursor::new(input)).unwrap();
//!
//! let mut kmean = KMeans::new(data);
//! let result = kmean.kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &KMeansConfig::default()).unwrap();
//!
//! println!("Centroids: {:?}", result.centroids);
//! println!("Cluster-Assignments: {:?}", result.assignments);
//! println!("Error: {}", result.sse);
//!
//! let mut out = Vec::new();
//! kmean.data().write_csv(&mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("Red,Green,Blue,Alpha,ClusterId\n"));
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use palette_kmeans::*;
//! use rand::prelude::*;
//!
//! let mut rnd = StdRng::seed_from_u64(1337);
//! let points: Vec<Vec<f64>> = (0..500).map(|_| vec![rnd.gen(), rnd.gen()]).collect();
//! let data = DataSet::from_points(["x", "y"], points).unwrap();
//!
//! let conf = KMeansConfig::<f64>::build()
//!     .random_generator(StdRng::seed_from_u64(42))
//!     .init_done(&|_| println!("Initialization completed."))
//!     .iteration_done(&|s, nr, new_sse|
//!         println!("Iteration {} - Error: {:.2} -> {:.2} | Improvement: {:.2}",
//!             nr, s.sse, new_sse, s.sse - new_sse))
//!     .build();
//!
//! let mut kmean = KMeans::new(data);
//! let result = kmean.kmeans_lloyd(4, 250, KMeans::init_kmeanplusplus, &conf).unwrap();
//! println!("{:?} after {} iterations", result.outcome, result.iterations);
//! ```
//!
//! ## Short API-Overview / Description
//! A [`DataSet`] is an ordered collection of [`Record`]s sharing one schema. It is built from a delimited table
//! ([`DataSet::from_reader`]), from plain vectors ([`DataSet::from_points`]) or from image colors
//! ([`ColorMap::to_dataset`]), and it tracks the per-attribute bounds of its records.
//!
//! Entry-point of the clustering is the [`KMeans`] struct, which takes over the data set into its ownership.
//! A clustering call writes each record's cluster label in place and returns a [`KMeansState`] holding the
//! centroids, the error and the reason the iteration stopped. Afterwards, the labeled data set can be written
//! back as a table ([`DataSet::write_csv`]), or, for palettes, split into layers ([`ColorMap::layers`]).
//!
//! Logging goes through the `log` facade. The crate does not install a logger.

#[macro_use] mod helpers;
mod primitive;
mod error;
mod record;
mod distance;
mod dataset;
mod table;
mod color;
mod api;
mod variants;
mod inits;
mod abort_strategy;

pub use abort_strategy::AbortStrategy;
pub use api::{InitDoneCallbackFn, IterationDoneCallbackFn, KMeans, KMeansConfig, KMeansConfigBuilder, KMeansState, Outcome};
pub use color::{ColorMap, PaletteLayer, Pixel, Position, Rgba, COLOR_ATTRIBUTES};
pub use dataset::DataSet;
pub use distance::{euclidean_distance, squared_euclidean_distance};
pub use error::{DataSetError, KMeansError};
pub use primitive::Primitive;
pub use record::{Attributes, Record};
pub use table::{CLUSTER_ID_COLUMN, DEFAULT_DELIMITER};
