//! Validated dispatch handles.

use crate::error::{DispatchError, DispatchResult};
use crate::isa::{current_isa, Isa, LaneShape};
use crate::runner::{self, Operands};
use prism_core::Lanes;
use prism_kernels::{DrawSource, Element, Kernel};
use tracing::debug;

/// Runs kernels on one ISA the running CPU is known to support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dispatcher {
    isa: Isa,
}

impl Dispatcher {
    /// A dispatcher for `isa`, if the CPU supports it.
    pub fn new(isa: Isa) -> DispatchResult<Self> {
        if isa.is_available() {
            Ok(Self { isa })
        } else {
            Err(DispatchError::UnsupportedIsa { isa })
        }
    }

    /// The process-wide selected target.
    #[must_use]
    pub fn current() -> Self {
        Self { isa: current_isa() }
    }

    /// Portable code only.
    #[must_use]
    pub const fn scalar() -> Self {
        Self { isa: Isa::Scalar }
    }

    /// Every dispatcher the running CPU supports.
    pub fn available() -> impl Iterator<Item = Dispatcher> {
        Isa::ALL
            .into_iter()
            .filter(|isa| isa.is_available())
            .map(|isa| Self { isa })
    }

    /// The target this dispatcher runs on.
    #[must_use]
    pub const fn isa(&self) -> Isa {
        self.isa
    }

    /// Apply `K` element-wise over `inputs`, writing into `out`.
    ///
    /// `inputs` holds one slice per operand. Lengths may differ: the
    /// common prefix of the inputs and `out` is processed and its length
    /// returned.
    pub fn apply_array<T: Element, K: Kernel, D: DrawSource>(
        &self,
        inputs: &[&[T]],
        out: &mut [T],
        draws: &mut D,
    ) -> DispatchResult<usize> {
        let arity = K::OP.arity();
        if inputs.len() != arity {
            return Err(DispatchError::Arity {
                op: K::OP,
                expected: arity,
                got: inputs.len(),
            });
        }
        let first = inputs[0];
        let args = [
            first,
            inputs.get(1).copied().unwrap_or(first),
            inputs.get(2).copied().unwrap_or(first),
        ];
        Ok(self.run_array::<T, K, D>(args, out, draws))
    }

    pub(crate) fn run_array<T: Element, K: Kernel, D: DrawSource>(
        &self,
        args: Operands<'_, T>,
        out: &mut [T],
        draws: &mut D,
    ) -> usize {
        // SAFETY: a `Dispatcher` only exists for available targets.
        unsafe { runner::run_array::<T, K, D>(self.isa, args, out, draws) }
    }

    /// Apply `K` to one `N`-lane vector.
    ///
    /// Vectors wider than one native register are split into native
    /// chunks.
    pub fn apply_vector<T: Element, K: Kernel, const N: usize, D: DrawSource>(
        &self,
        args: [Lanes<T, N>; 3],
        draws: &mut D,
    ) -> Lanes<T, N> {
        if LaneShape::new(T::KIND, N).fits(self.isa) {
            // SAFETY: a `Dispatcher` only exists for available targets.
            return unsafe { runner::run_vector::<T, K, N, D>(self.isa, args, draws) };
        }
        let [a, b, c] = args;
        let mut out = Lanes::splat(T::ZERO);
        self.run_array::<T, K, D>(
            [a.as_slice(), b.as_slice(), c.as_slice()],
            out.as_mut_slice(),
            draws,
        );
        out
    }
}

/// How a static vector entry point runs, decided at its first call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// One native vector of this target holds the shape.
    Native(Dispatcher),
    /// Wider than native: go through [`Dispatcher::apply_vector`] on the
    /// current target.
    Dynamic,
}

impl Binding {
    /// Bind `shape` against the current target.
    #[must_use]
    pub fn for_shape(shape: LaneShape) -> Self {
        let dispatcher = Dispatcher::current();
        let binding = if shape.fits(dispatcher.isa()) {
            Binding::Native(dispatcher)
        } else {
            Binding::Dynamic
        };
        debug!(%shape, isa = %dispatcher.isa(), ?binding, "bound static entry point");
        binding
    }

    /// Apply `K` through this binding.
    #[inline]
    pub fn apply<T: Element, K: Kernel, const N: usize, D: DrawSource>(
        self,
        args: [Lanes<T, N>; 3],
        draws: &mut D,
    ) -> Lanes<T, N> {
        match self {
            // SAFETY: the dispatcher was validated when it was created.
            Binding::Native(dispatcher) => unsafe {
                runner::run_vector::<T, K, N, D>(dispatcher.isa(), args, draws)
            },
            Binding::Dynamic => Dispatcher::current().apply_vector::<T, K, N, D>(args, draws),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::FloatKind;
    use prism_kernels::ops::sr;
    use prism_kernels::{Op, ReplayDraws};

    #[test]
    fn test_scalar_always_available() {
        assert_eq!(Dispatcher::new(Isa::Scalar), Ok(Dispatcher::scalar()));
        assert!(Dispatcher::available().any(|d| d.isa() == Isa::Scalar));
    }

    #[test]
    fn test_unavailable_isa_is_rejected() {
        // No CPU has both NEON and SSE4.2.
        let missing = if Isa::Neon.is_available() { Isa::Sse4 } else { Isa::Neon };
        assert_eq!(
            Dispatcher::new(missing),
            Err(DispatchError::UnsupportedIsa { isa: missing })
        );
    }

    #[test]
    fn test_apply_array_checks_arity() {
        let a = [1.0f32; 4];
        let mut out = [0.0f32; 4];
        let mut draws = ReplayDraws::constant(0);
        let err = Dispatcher::scalar()
            .apply_array::<f32, sr::Fma, _>(&[&a, &a], &mut out, &mut draws)
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Arity {
                op: Op::Fma,
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_apply_array_processes_common_prefix() {
        let a = [4.0f64, 9.0, 16.0, 25.0, 36.0];
        let mut out = [0.0f64; 3];
        let mut draws = ReplayDraws::constant(0);
        for dispatcher in Dispatcher::available() {
            let len = dispatcher
                .apply_array::<f64, sr::Sqrt, _>(&[&a], &mut out, &mut draws)
                .unwrap();
            assert_eq!(len, 3);
            assert_eq!(out, [2.0, 3.0, 4.0]);
        }
    }

    #[test]
    fn test_wide_vector_splits_into_native_chunks() {
        let a = Lanes::<f32, 16>::from_array(std::array::from_fn(|i| i as f32 + 1.0));
        let b = Lanes::splat(0.25f32);
        let mut draws = ReplayDraws::constant(0);
        let r = Dispatcher::scalar().apply_vector::<f32, sr::Mul, 16, _>([a, b, a], &mut draws);
        assert_eq!(r.to_array(), std::array::from_fn(|i| (i as f32 + 1.0) * 0.25));
        // Scalar runs the sixteen lanes one at a time.
        assert_eq!(draws.draw_count(), 16);
    }

    #[test]
    fn test_binding_for_shape() {
        assert_eq!(
            Binding::for_shape(LaneShape::new(FloatKind::F64, 1)),
            Binding::Native(Dispatcher::current())
        );
        let native = current_isa().native_lanes(FloatKind::F32);
        if native < 16 {
            assert_eq!(Binding::for_shape(LaneShape::new(FloatKind::F32, 16)), Binding::Dynamic);
        }
    }
}
