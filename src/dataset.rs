use crate::{distance, primitive::from_usize, Attributes, DataSetError, Primitive, Record};
use log::{debug, info};
use rand::{distributions::WeightedIndex, prelude::*};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};

/// Ordered collection of [`Record`]s that share one attribute schema.
///
/// The data set owns per-attribute minimum and maximum statistics, which are maintained while records
/// are added, and all of the centroid, distance and error math the clustering driver needs.
/// Record order is stable: a record's index is its identity during a clustering run.
///
/// ## Generics
/// - **T**: Underlying primitive type the attribute values are stored in
///
/// ## Fields
/// - **attr_names**: The schema, in insertion order
/// - **records**: The data points, in insertion order
/// - **indices_of_centroids**: Records already picked as seeds by k-means++, reset per clustering run
/// - **minimums** / **maximums**: Running bounds per attribute
#[derive(Clone, Debug, Default)]
pub struct DataSet<T: Primitive = f64> {
    attr_names: Vec<String>,
    records: Vec<Record<T>>,
    indices_of_centroids: Vec<usize>,
    minimums: BTreeMap<String, T>,
    maximums: BTreeMap<String, T>,
}
impl<T: Primitive> DataSet<T> {
    /// Create an empty data set with the given schema.
    ///
    /// Attribute names must be non-empty and unique.
    pub fn new<I, S>(attr_names: I) -> Result<Self, DataSetError>
                where I: IntoIterator<Item = S>, S: Into<String> {
        let mut data = Self::default();
        let mut seen = HashSet::new();
        for (column, name) in attr_names.into_iter().enumerate() {
            let name = name.into();
            if name.is_empty() {
                return Err(DataSetError::EmptyAttributeName(column + 1));
            }
            if !seen.insert(name.clone()) {
                return Err(DataSetError::DuplicateAttribute(name));
            }
            data.attr_names.push(name);
        }
        if data.attr_names.is_empty() {
            return Err(DataSetError::MissingHeader);
        }
        Ok(data)
    }

    /// Create a data set from externally produced numeric vectors. Each vector becomes one record, its values
    /// paired with **attr_names** by position.
    pub fn from_points<I, S, P>(attr_names: I, points: P) -> Result<Self, DataSetError>
                where I: IntoIterator<Item = S>, S: Into<String>, P: IntoIterator<Item = Vec<T>> {
        let mut data = Self::new(attr_names)?;
        for (idx, values) in points.into_iter().enumerate() {
            data.push_row(idx + 1, values)?;
        }
        info!("Recorded {} records.", data.records.len());
        Ok(data)
    }

    /// Install a schema the caller knows to be valid, on a data set without records.
    pub(crate) fn set_schema(&mut self, attr_names: Vec<String>) {
        debug_assert!(self.records.is_empty());
        self.attr_names = attr_names;
    }

    /// Validate and append one row. **row** is the 1-based position used in error reports.
    pub(crate) fn push_row(&mut self, row: usize, values: Vec<T>) -> Result<(), DataSetError> {
        if values.len() != self.attr_names.len() {
            return Err(DataSetError::SchemaMismatch { row, expected: self.attr_names.len(), found: values.len() });
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(DataSetError::NonFiniteValue { row, attribute: self.attr_names[pos].clone() });
        }
        self.push_unchecked(values);
        Ok(())
    }

    /// Append a row whose arity and finiteness the caller already guarantees.
    pub(crate) fn push_unchecked(&mut self, values: Vec<T>) {
        let mut attributes = Attributes::new();
        for (name, val) in self.attr_names.iter().zip(values) {
            Self::update_bound(&mut self.minimums, name, val, |new, cur| new < cur);
            Self::update_bound(&mut self.maximums, name, val, |new, cur| new > cur);
            attributes.insert(name.clone(), val);
        }
        self.records.push(Record::new(attributes));
    }

    fn update_bound(bounds: &mut BTreeMap<String, T>, name: &str, val: T, replaces: impl Fn(T, T) -> bool) {
        match bounds.get_mut(name) {
            Some(cur) => if replaces(val, *cur) { *cur = val; },
            None => { bounds.insert(name.to_string(), val); }
        }
    }

    pub fn attr_names(&self) -> &[String] { &self.attr_names }
    pub fn records(&self) -> &[Record<T>] { &self.records }
    pub(crate) fn records_mut(&mut self) -> &mut [Record<T>] { &mut self.records }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn min(&self, attr_name: &str) -> Option<T> { self.minimums.get(attr_name).copied() }
    pub fn max(&self, attr_name: &str) -> Option<T> { self.maximums.get(attr_name).copied() }

    /// Records picked as seeds by the current k-means++ run, in pick order.
    pub fn indices_of_centroids(&self) -> &[usize] { &self.indices_of_centroids }

    /// Forget all seeds picked so far. Called at the start of every clustering run.
    pub fn reset_seeding(&mut self) {
        self.indices_of_centroids.clear();
    }

    /// Current cluster label of every record, in record order.
    pub fn cluster_labels(&self) -> Vec<Option<usize>> {
        self.records.iter().map(Record::cluster_no).collect()
    }

    /// See [`distance::euclidean_distance`].
    pub fn euclidean_distance(a: &Attributes<T>, b: &Attributes<T>) -> T {
        distance::euclidean_distance(a, b)
    }

    /// Mean of every attribute over the records currently labeled **cluster_no**.
    ///
    /// Returns `None` if no record carries that label.
    pub fn calculate_centroid(&self, cluster_no: usize) -> Option<Attributes<T>> {
        let members: Vec<&Record<T>> = self.records.iter()
            .filter(|r| r.cluster_no() == Some(cluster_no))
            .collect();
        if members.is_empty() {
            return None;
        }
        let count = from_usize::<T>(members.len());
        Some(self.attr_names.iter()
            .map(|name| {
                let sum: T = members.iter().filter_map(|r| r.get(name)).sum();
                (name.clone(), sum / count)
            })
            .collect())
    }

    /// Recompute one centroid per cluster from the current assignments, where `previous.len()` is the
    /// amount of clusters. Index i of the result is cluster i's centroid.
    ///
    /// A cluster that lost all of its records keeps its entry from **previous**.
    pub fn recompute_centroids(&self, previous: &[Attributes<T>]) -> Vec<Attributes<T>> {
        (0..previous.len()).into_par_iter()
            .map(|cluster_no| match self.calculate_centroid(cluster_no) {
                Some(centroid) => centroid,
                None => {
                    debug!("cluster {} is empty, keeping its previous centroid", cluster_no);
                    previous[cluster_no].clone()
                }
            })
            .collect()
    }

    /// Sum of squared distances from all records labeled **cluster_no** to **centroid**.
    pub fn calculate_cluster_sse(&self, centroid: &Attributes<T>, cluster_no: usize) -> T {
        self.records.iter()
            .filter(|r| r.cluster_no() == Some(cluster_no))
            .map(|r| distance::squared_euclidean_distance(centroid, r.attributes()))
            .sum()
    }

    /// Sum of the per-cluster errors, where centroid i belongs to cluster i.
    pub fn calculate_total_sse(&self, centroids: &[Attributes<T>]) -> T {
        centroids.iter().enumerate()
            .map(|(cluster_no, centroid)| self.calculate_cluster_sse(centroid, cluster_no))
            .sum()
    }

    /// Uniformly pick one record as seed. Its index is remembered as chosen.
    ///
    /// Returns `None` for an empty data set.
    pub fn random_from_dataset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Attributes<T>> {
        if self.records.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.records.len());
        self.indices_of_centroids.push(idx);
        Some(self.records[idx].attributes().clone())
    }

    /// Synthesize a point uniformly within the per-attribute min/max bounding box.
    ///
    /// Bounds whose span overflows are interpolated instead of offset, so any finite bounds work.
    pub fn random_data_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Attributes<T> {
        self.attr_names.iter()
            .filter_map(|name| {
                let (min, max) = (self.min(name)?, self.max(name)?);
                let u: T = rng.gen_range(T::zero()..=T::one());
                let span = max - min;
                let val = if span.is_finite() {
                    min + span * u
                } else {
                    min * (T::one() - u) + max * u
                };
                Some((name.clone(), val.max(min).min(max)))
            })
            .collect()
    }

    /// K-Means++ sampling step: pick the next seed among the records that are not seeds yet.
    ///
    /// ## Description
    /// Every candidate is weighted with its distance to the nearest record already picked. A candidate is then drawn
    /// with probability proportional to that weight, so samples far away from all current seeds are preferred.
    /// The drawn index is remembered as chosen and a copy of its attributes is returned.
    /// If all candidates coincide with picked seeds (total weight zero), one of them is drawn uniformly instead.
    ///
    /// ## Returns
    /// `None` if no seed was picked yet (use [`DataSet::random_from_dataset`] first), or if every record already is a seed.
    pub fn calculate_weighed_centroid<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Attributes<T>> {
        if self.indices_of_centroids.is_empty() {
            return None;
        }
        let chosen: HashSet<usize> = self.indices_of_centroids.iter().copied().collect();
        let candidates: Vec<(usize, T)> = self.records.iter().enumerate()
            .filter(|(idx, _)| !chosen.contains(idx))
            .map(|(idx, r)| (idx, self.distance_to_nearest_seed(r)))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let picked = Self::draw_weighted(&candidates, rng);
        self.indices_of_centroids.push(picked);
        Some(self.records[picked].attributes().clone())
    }

    /// Draw one index from `(index, weight)` pairs, proportional to weight.
    ///
    /// Infinite weights dominate everything finite, so they are drawn among uniformly. A finite set of weights whose
    /// sum overflows is rescaled by its largest weight first.
    fn draw_weighted<R: Rng + ?Sized>(candidates: &[(usize, T)], rng: &mut R) -> usize {
        let infinite: Vec<usize> = candidates.iter()
            .filter(|(_, d)| d.is_infinite())
            .map(|&(idx, _)| idx)
            .collect();
        if !infinite.is_empty() {
            return infinite[rng.gen_range(0..infinite.len())];
        }

        let total: T = candidates.iter().map(|&(_, d)| d).sum();
        let scale = if total.is_finite() {
            T::one()
        } else {
            candidates.iter().map(|&(_, d)| d).fold(T::zero(), T::max)
        };
        match WeightedIndex::new(candidates.iter().map(|&(_, d)| d / scale)) {
            Ok(weights) => candidates[weights.sample(rng)].0,
            Err(err) => {
                debug!("k-means++ weights unusable ({}), drawing uniformly", err);
                candidates[rng.gen_range(0..candidates.len())].0
            }
        }
    }

    fn distance_to_nearest_seed(&self, record: &Record<T>) -> T {
        self.indices_of_centroids.iter()
            .map(|&seed| distance::euclidean_distance(record.attributes(), self.records[seed].attributes()))
            .fold(T::infinity(), T::min)
    }

    /// Drop an attribute from the schema, from every record and from the bounds. Returns whether it existed.
    pub fn remove_attr(&mut self, attr_name: &str) -> bool {
        let Some(pos) = self.attr_names.iter().position(|n| n == attr_name) else {
            return false;
        };
        self.attr_names.remove(pos);
        self.records.iter_mut().for_each(|r| { r.remove_attr(attr_name); });
        self.minimums.remove(attr_name);
        self.maximums.remove(attr_name);
        true
    }

    /// Group external labels by the cluster their record ended up in.
    ///
    /// **labels** must yield exactly one label per record, in the order the records were created.
    /// Records without a cluster are left out.
    pub fn group_by_cluster<L, I>(&self, labels: I) -> BTreeMap<usize, Vec<L>>
                where I: IntoIterator<Item = L>, I::IntoIter: ExactSizeIterator {
        let labels = labels.into_iter();
        debug_assert_eq!(labels.len(), self.records.len(), "one label per record expected");
        let mut groups: BTreeMap<usize, Vec<L>> = BTreeMap::new();
        for (record, label) in self.records.iter().zip(labels) {
            if let Some(cluster_no) = record.cluster_no() {
                groups.entry(cluster_no).or_default().push(label);
            }
        }
        groups
    }
}
