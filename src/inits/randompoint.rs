use crate::{Attributes, DataSet, KMeansConfig, Primitive};
use std::ops::DerefMut;

#[inline(always)]
pub fn calculate<T: Primitive>(data: &mut DataSet<T>, k: usize, config: &KMeansConfig<'_, T>) -> Vec<Attributes<T>> {
    let mut rnd = config.rnd.borrow_mut();
    data.reset_seeding();
    (0..k).map(|_| data.random_data_point(rnd.deref_mut())).collect()
}
