use crate::Primitive;

/// Enum with possible abort strategies.
/// These strategies decide, after every iteration, whether the change of the total SSE still warrants another one.
/// An iteration whose improvement (`previous SSE - new SSE`) is not larger than the threshold counts as
/// "no improvement".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbortStrategy<T: Primitive> {
	/// Converged as soon as one iteration fails to improve the SSE by more than **threshold**.
	/// With a threshold of zero this stops on the first iteration that does not lower the SSE at all.
	/// ## Fields:
	/// - **threshold**: The precision; an improvement has to be strictly larger than this
    NoImprovement { threshold: T },
	/// Converged after **x** consecutive iterations without improvement.
	/// ## Fields:
	/// - **x**: The amount of consecutive iterations without improvement that are tolerated
	/// - **threshold**: The precision; an improvement has to be strictly larger than this
	/// - **abort_on_negative**: Stop at once when the SSE grows (**true**), or treat growth like any
	/// other missing improvement (**false**)
	NoImprovementForXIterations { x: usize, threshold: T, abort_on_negative: bool }
}
impl<T: Primitive> Default for AbortStrategy<T> {
	fn default() -> Self {
		AbortStrategy::NoImprovement { threshold: T::zero() }
	}
}
impl<T: Primitive> AbortStrategy<T> {
	pub(crate) fn create_logic(&self) -> Box<dyn AbortStrategyLogic<T>> {
		match *self {
			AbortStrategy::NoImprovementForXIterations{x,threshold,abort_on_negative} => Box::new(NoImprovementForXIterationsLogic {
				x, threshold, abort_on_negative,
				prev_sse: T::infinity(),
				no_improvement_counter: 0
			}),
			AbortStrategy::NoImprovement{threshold} => Box::new(NoImprovementLogic {
				threshold,
				prev_sse: T::infinity()
			})
		}
	}
}

pub(crate) trait AbortStrategyLogic<T: Primitive> {
	/// Feed the total SSE of the iteration that just finished.
	/// ## Returns
	/// - **true** if another iteration should run
	/// - **false** if the calculation has converged
	fn next(&mut self, sse: T) -> bool;
}


pub(crate) struct NoImprovementLogic<T: Primitive> {
	threshold: T,
	prev_sse: T
}
impl<T: Primitive> AbortStrategyLogic<T> for NoImprovementLogic<T> {
	fn next(&mut self, sse: T) -> bool {
		let improvement = self.prev_sse - sse;
		self.prev_sse = sse;
		improvement > self.threshold
	}
}


pub(crate) struct NoImprovementForXIterationsLogic<T: Primitive> {
	x: usize,
	threshold: T,
	abort_on_negative: bool,
	prev_sse: T,
	no_improvement_counter: usize
}
impl<T: Primitive> AbortStrategyLogic<T> for NoImprovementForXIterationsLogic<T> {
	fn next(&mut self, sse: T) -> bool {
		let improvement = self.prev_sse - sse;
		self.prev_sse = sse;
		if self.abort_on_negative && improvement < T::zero() {
			return false;
		}
		if improvement > self.threshold {
			self.no_improvement_counter = 0;
		} else {
			self.no_improvement_counter += 1;
		}
		self.no_improvement_counter < self.x
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	/// Feed **sse_trace** into a fresh logic, return what it answered after each value.
	fn replay<T: Primitive>(strategy: AbortStrategy<T>, sse_trace: &[f64]) -> Vec<bool> {
		let mut logic = strategy.create_logic();
		sse_trace.iter().map(|&sse| logic.next(T::from(sse).unwrap())).collect()
	}

	#[test] fn precision_zero_f32() { precision_zero::<f32>(); }
	#[test] fn precision_zero_f64() { precision_zero::<f64>(); }

	fn precision_zero<T: Primitive>() {
		let strategy = AbortStrategy::<T>::default();
		assert_eq!(strategy, AbortStrategy::NoImprovement { threshold: T::zero() });
		// The first SSE always improves on the initial +infinity.
		assert_eq!(replay(strategy, &[0.0]), vec![true]);
		assert_eq!(replay(strategy, &[812.5, 812.5]), vec![true, false]);
		assert_eq!(replay(strategy, &[812.5, 400.0, 399.0, 399.5]), vec![true, true, true, false]);
		assert_eq!(replay(strategy, &[0.0, 0.0]), vec![true, false]);
	}

	#[test] fn precision_threshold_f32() { precision_threshold::<f32>(); }
	#[test] fn precision_threshold_f64() { precision_threshold::<f64>(); }

	fn precision_threshold<T: Primitive>() {
		let strategy = AbortStrategy::NoImprovement { threshold: T::from(0.5).unwrap() };
		assert_eq!(replay(strategy, &[100.0, 99.5]), vec![true, false]);
		assert_eq!(replay(strategy, &[100.0, 99.25]), vec![true, true]);
		assert_eq!(replay(strategy, &[100.0, 90.0, 89.75]), vec![true, true, false]);
	}

	#[test] fn patience_f32() { patience::<f32>(); }
	#[test] fn patience_f64() { patience::<f64>(); }

	fn patience<T: Primitive>() {
		let threshold = T::from(0.5).unwrap();
		let tolerant = AbortStrategy::NoImprovementForXIterations { x: 2, threshold, abort_on_negative: false };
		assert_eq!(replay(tolerant, &[100.0, 100.0, 100.0]), vec![true, true, false]);
		// An improvement resets the counter.
		assert_eq!(replay(tolerant, &[100.0, 100.0, 80.0, 80.0, 80.0]), vec![true, true, true, true, false]);
		// Growth is just another missing improvement.
		assert_eq!(replay(tolerant, &[100.0, 101.0, 90.0]), vec![true, true, true]);

		let strict = AbortStrategy::NoImprovementForXIterations { x: 2, threshold, abort_on_negative: true };
		assert_eq!(replay(strict, &[100.0, 100.0, 100.0]), vec![true, true, false]);
		assert_eq!(replay(strict, &[100.0, 100.25]), vec![true, false]);
		assert_eq!(replay(strict, &[100.0, 80.0, 80.0, 95.0]), vec![true, true, true, false]);

		let single = AbortStrategy::NoImprovementForXIterations { x: 1, threshold, abort_on_negative: false };
		assert_eq!(replay(single, &[100.0, 99.75]), vec![true, false]);
	}
}
