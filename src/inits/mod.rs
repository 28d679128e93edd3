pub(crate) mod kmeanplusplus;
pub(crate) mod precomputed;
pub(crate) mod randompoint;
