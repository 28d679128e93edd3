use num::{Float, NumCast, Zero};
use rand::distributions::uniform::SampleUniform;
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

/// Floating point type that records, centroids and errors are computed in.
pub trait Primitive: Add + AddAssign + Sum + Sub + SubAssign + Zero + Float + NumCast + SampleUniform
                + PartialOrd + Copy + Default + Display + Debug + FromStr + Sync + Send + LowerExp + 'static
                + for<'a> AddAssign<&'a Self> + for<'a> Sub<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}

/// Lossless for every count a record set can hold in practice; saturates to infinity otherwise.
#[inline]
pub(crate) fn from_usize<T: Primitive>(value: usize) -> T {
    <T as NumCast>::from(value).unwrap_or_else(T::infinity)
}

#[inline]
pub(crate) fn from_u8<T: Primitive>(value: u8) -> T {
    <T as NumCast>::from(value).unwrap_or_else(T::zero)
}
