//! Public entry points.
//!
//! Every entry point draws from the calling thread's
//! [`RoundingContext`](prism_rng::RoundingContext) and runs on the
//! process-wide target. Paths follow
//! `<mode>::<shape>::<op><kind>[x<lanes>][_static|_dynamic]`:
//!
//! ```
//! use prism_core::Lanes;
//! use prism_dispatch::{sr, ud};
//!
//! let x = sr::scalar::addf32(1.0, 2.0);
//! assert_eq!(x, 3.0);
//!
//! let v = sr::vector::mulf64x4_static(Lanes::splat(3.0), Lanes::splat(0.5));
//! assert_eq!(v.to_array(), [1.5; 4]);
//!
//! let mut out = Lanes::splat(0.0);
//! ud::vector::sqrtf32x8_dynamic(Lanes::splat(4.0), &mut out);
//! assert!(out.to_array().iter().all(|&r| r != 2.0 && (r - 2.0).abs() < 1e-6));
//!
//! let a = [1.0f64, 2.0, 3.0];
//! let mut sums = [0.0f64; 3];
//! assert_eq!(sr::array::addf64(&a, &a, &mut sums), 3);
//! assert_eq!(sums, [2.0, 4.0, 6.0]);
//! ```

use crate::dispatcher::{Binding, Dispatcher};
use crate::isa::LaneShape;
use crate::runner::Operands;
use prism_core::Lanes;
use prism_kernels::{Element, Kernel};
use prism_rng::with_thread_context;
use std::sync::OnceLock;

#[inline]
pub(crate) fn scalar<T: Element, K: Kernel>(args: [T; 3]) -> T {
    with_thread_context(|context| K::apply::<T, 1, _>(args.map(Lanes::splat), context).get(0))
}

#[inline]
pub(crate) fn vector_static<T: Element, K: Kernel, const N: usize>(
    slot: &OnceLock<Binding>,
    args: [Lanes<T, N>; 3],
) -> Lanes<T, N> {
    let binding = *slot.get_or_init(|| Binding::for_shape(LaneShape::new(T::KIND, N)));
    with_thread_context(|context| binding.apply::<T, K, N, _>(args, context))
}

#[inline]
pub(crate) fn vector_dynamic<T: Element, K: Kernel, const N: usize>(
    args: [Lanes<T, N>; 3],
    out: &mut Lanes<T, N>,
) {
    *out = with_thread_context(|context| {
        Dispatcher::current().apply_vector::<T, K, N, _>(args, context)
    });
}

#[inline]
pub(crate) fn array<T: Element, K: Kernel>(args: Operands<'_, T>, out: &mut [T]) -> usize {
    with_thread_context(|context| Dispatcher::current().run_array::<T, K, _>(args, out, context))
}

macro_rules! scalar_entry_points {
    (@unary $mode:ident $name:ident $Kernel:ident $ty:ident) => {
        #[doc = concat!("`", stringify!($mode), "::", stringify!($Kernel), "` on one `", stringify!($ty), "`.")]
        #[inline]
        #[must_use]
        pub fn $name(a: $ty) -> $ty {
            crate::entry::scalar::<$ty, ::prism_kernels::ops::$mode::$Kernel>([a, a, a])
        }
    };
    (@binary $mode:ident $name:ident $Kernel:ident $ty:ident) => {
        #[doc = concat!("`", stringify!($mode), "::", stringify!($Kernel), "` on one `", stringify!($ty), "`.")]
        #[inline]
        #[must_use]
        pub fn $name(a: $ty, b: $ty) -> $ty {
            crate::entry::scalar::<$ty, ::prism_kernels::ops::$mode::$Kernel>([a, b, a])
        }
    };
    (@ternary $mode:ident $name:ident $Kernel:ident $ty:ident) => {
        #[doc = concat!("`", stringify!($mode), "::", stringify!($Kernel), "` on one `", stringify!($ty), "`.")]
        #[inline]
        #[must_use]
        pub fn $name(a: $ty, b: $ty, c: $ty) -> $ty {
            crate::entry::scalar::<$ty, ::prism_kernels::ops::$mode::$Kernel>([a, b, c])
        }
    };
    ($mode:ident; $($arity:ident $name:ident $Kernel:ident $ty:ident;)*) => {
        $(scalar_entry_points!(@$arity $mode $name $Kernel $ty);)*
    };
}

macro_rules! vector_entry_points {
    (@$arity:ident $mode:ident $Kernel:ident $ty:ident $n:literal $bound:ident $dispatched:ident
        ($($arg:ident),+) [$a:ident, $b:ident, $c:ident]) => {
        #[doc = concat!("`", stringify!($mode), "::", stringify!($Kernel), "` on `", stringify!($ty), "x", stringify!($n), "`, bound to a target at first call.")]
        #[inline]
        #[must_use]
        pub fn $bound($($arg: ::prism_core::Lanes<$ty, $n>),+) -> ::prism_core::Lanes<$ty, $n> {
            static BINDING: ::std::sync::OnceLock<crate::Binding> = ::std::sync::OnceLock::new();
            crate::entry::vector_static::<$ty, ::prism_kernels::ops::$mode::$Kernel, $n>(
                &BINDING,
                [$a, $b, $c],
            )
        }

        #[doc = concat!("`", stringify!($mode), "::", stringify!($Kernel), "` on `", stringify!($ty), "x", stringify!($n), "`, dispatched on every call.")]
        #[inline]
        pub fn $dispatched(
            $($arg: ::prism_core::Lanes<$ty, $n>,)+
            out: &mut ::prism_core::Lanes<$ty, $n>,
        ) {
            crate::entry::vector_dynamic::<$ty, ::prism_kernels::ops::$mode::$Kernel, $n>(
                [$a, $b, $c],
                out,
            );
        }
    };
    ($mode:ident; $($arity:ident $Kernel:ident $ty:ident $n:literal $bound:ident $dispatched:ident;)*) => {
        $(vector_entry_points!(@$arity $mode $Kernel $ty $n $bound $dispatched);)*
    };
    (@unary $mode:ident $Kernel:ident $ty:ident $n:literal $bound:ident $dispatched:ident) => {
        vector_entry_points!(@unary $mode $Kernel $ty $n $bound $dispatched (a) [a, a, a]);
    };
    (@binary $mode:ident $Kernel:ident $ty:ident $n:literal $bound:ident $dispatched:ident) => {
        vector_entry_points!(@binary $mode $Kernel $ty $n $bound $dispatched (a, b) [a, b, a]);
    };
    (@ternary $mode:ident $Kernel:ident $ty:ident $n:literal $bound:ident $dispatched:ident) => {
        vector_entry_points!(@ternary $mode $Kernel $ty $n $bound $dispatched (a, b, c) [a, b, c]);
    };
}

macro_rules! array_entry_points {
    (@$arity:ident $mode:ident $name:ident $Kernel:ident $ty:ident
        ($($arg:ident),+) [$a:ident, $b:ident, $c:ident]) => {
        #[doc = concat!("`", stringify!($mode), "::", stringify!($Kernel), "` element-wise over `", stringify!($ty), "` slices.")]
        ///
        /// Processes the common prefix of the inputs and `out`; returns
        /// its length.
        #[inline]
        pub fn $name($($arg: &[$ty],)+ out: &mut [$ty]) -> usize {
            crate::entry::array::<$ty, ::prism_kernels::ops::$mode::$Kernel>([$a, $b, $c], out)
        }
    };
    ($mode:ident; $($arity:ident $name:ident $Kernel:ident $ty:ident;)*) => {
        $(array_entry_points!(@$arity $mode $name $Kernel $ty);)*
    };
    (@unary $mode:ident $name:ident $Kernel:ident $ty:ident) => {
        array_entry_points!(@unary $mode $name $Kernel $ty (a) [a, a, a]);
    };
    (@binary $mode:ident $name:ident $Kernel:ident $ty:ident) => {
        array_entry_points!(@binary $mode $name $Kernel $ty (a, b) [a, b, a]);
    };
    (@ternary $mode:ident $name:ident $Kernel:ident $ty:ident) => {
        array_entry_points!(@ternary $mode $name $Kernel $ty (a, b, c) [a, b, c]);
    };
}

macro_rules! mode_entry_points {
    ($mode:ident, $doc:literal) => {
        #[doc = $doc]
        pub mod $mode {
            /// One value per call, drawn from the thread's scalar stream.
            pub mod scalar {
                for_each_scalar_op!(scalar_entry_points! { $mode; });
            }

            /// Fixed-width vectors of 1, 2, 4, 8 or 16 lanes.
            pub mod vector {
                for_each_vector_op!(vector_entry_points! { $mode; });
            }

            /// Slices of any length, processed in native-width chunks.
            pub mod array {
                for_each_scalar_op!(array_entry_points! { $mode; });
            }
        }
    };
}

mode_entry_points!(sr, "Stochastically rounded arithmetic.");
mode_entry_points!(ud, "Up-down rounded arithmetic.");
