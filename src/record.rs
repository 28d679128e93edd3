use crate::Primitive;
use std::collections::BTreeMap;

/// Mapping from attribute name to value. Used for records as well as for centroids.
///
/// Keys are kept sorted, so two mappings over the same schema iterate their values in lockstep.
pub type Attributes<T> = BTreeMap<String, T>;

/// One data point of a [`DataSet`](crate::DataSet): its attribute values plus the cluster it is currently assigned to.
///
/// Schema conformance is checked by the owning data set, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct Record<T: Primitive = f64> {
    attributes: Attributes<T>,
    cluster_no: Option<usize>,
}
impl<T: Primitive> Record<T> {
    pub fn new(attributes: Attributes<T>) -> Self {
        Self { attributes, cluster_no: None }
    }

    pub fn attributes(&self) -> &Attributes<T> { &self.attributes }

    pub fn get(&self, attr_name: &str) -> Option<T> {
        self.attributes.get(attr_name).copied()
    }

    /// Cluster the record was last assigned to, `None` before the first assignment step.
    pub fn cluster_no(&self) -> Option<usize> { self.cluster_no }

    pub fn set_cluster_no(&mut self, cluster_no: usize) {
        self.cluster_no = Some(cluster_no);
    }

    pub(crate) fn remove_attr(&mut self, attr_name: &str) -> Option<T> {
        self.attributes.remove(attr_name)
    }
}
