//! C ABI for PRISM rounded arithmetic.
//!
//! Every Rust entry point `prism_dispatch::<mode>::<shape>::<name>` is
//! exported as the C symbol `prism_<mode>_<shape>_<name>`:
//!
//! ```text
//! float      prism_sr_scalar_addf32(float a, float b);
//! prism_f64x8 prism_sr_vector_mulf64x8_static(prism_f64x8 a, prism_f64x8 b);
//! void       prism_sr_vector_mulf64x8_dynamic(prism_f64x8 a, prism_f64x8 b, prism_f64x8 *out);
//! size_t     prism_ud_array_sqrtf32(const float *a, float *out, size_t len);
//! ```
//!
//! Vectors cross the ABI as `#[repr(C)]` structs holding one array of
//! lanes. Array forms take raw pointers and a length; null pointers are
//! treated as empty slices, and the output must not overlap the inputs.

use std::os::raw::c_char;
use std::slice;
use tracing::debug;

/// View `len` elements at `ptr`, or nothing for a null pointer.
///
/// # Safety
///
/// A non-null `ptr` must be valid for reading `len` elements.
unsafe fn input<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, len)
    }
}

/// Mutably view `len` elements at `ptr`, or nothing for a null pointer.
///
/// # Safety
///
/// A non-null `ptr` must be valid for writing `len` elements and must not
/// overlap any other live view.
unsafe fn output<'a, T>(ptr: *mut T, len: usize) -> &'a mut [T] {
    if ptr.is_null() || len == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(ptr, len)
    }
}

macro_rules! scalar_exports {
    (@unary $mode:ident $name:ident $Kernel:ident $ty:ident) => {
        #[doc = concat!("C export of `", stringify!($mode), "::scalar::", stringify!($name), "`.")]
        #[export_name = concat!("prism_", stringify!($mode), "_scalar_", stringify!($name))]
        pub extern "C" fn $name(a: $ty) -> $ty {
            prism_dispatch::$mode::scalar::$name(a)
        }
    };
    (@binary $mode:ident $name:ident $Kernel:ident $ty:ident) => {
        #[doc = concat!("C export of `", stringify!($mode), "::scalar::", stringify!($name), "`.")]
        #[export_name = concat!("prism_", stringify!($mode), "_scalar_", stringify!($name))]
        pub extern "C" fn $name(a: $ty, b: $ty) -> $ty {
            prism_dispatch::$mode::scalar::$name(a, b)
        }
    };
    (@ternary $mode:ident $name:ident $Kernel:ident $ty:ident) => {
        #[doc = concat!("C export of `", stringify!($mode), "::scalar::", stringify!($name), "`.")]
        #[export_name = concat!("prism_", stringify!($mode), "_scalar_", stringify!($name))]
        pub extern "C" fn $name(a: $ty, b: $ty, c: $ty) -> $ty {
            prism_dispatch::$mode::scalar::$name(a, b, c)
        }
    };
    ($mode:ident; $($arity:ident $name:ident $Kernel:ident $ty:ident;)*) => {
        $(scalar_exports!(@$arity $mode $name $Kernel $ty);)*
    };
}

macro_rules! vector_exports {
    (@$arity:ident $mode:ident $ty:ident $n:literal $bound:ident $dispatched:ident ($($arg:ident),+)) => {
        #[doc = concat!("C export of `", stringify!($mode), "::vector::", stringify!($bound), "`.")]
        #[export_name = concat!("prism_", stringify!($mode), "_vector_", stringify!($bound))]
        pub extern "C" fn $bound($($arg: Lanes<$ty, $n>),+) -> Lanes<$ty, $n> {
            prism_dispatch::$mode::vector::$bound($($arg),+)
        }

        #[doc = concat!("C export of `", stringify!($mode), "::vector::", stringify!($dispatched), "`.")]
        ///
        /// Does nothing when `out` is null.
        ///
        /// # Safety
        ///
        /// A non-null `out` must be valid for writing one vector.
        #[export_name = concat!("prism_", stringify!($mode), "_vector_", stringify!($dispatched))]
        pub unsafe extern "C" fn $dispatched($($arg: Lanes<$ty, $n>,)+ out: *mut Lanes<$ty, $n>) {
            if let Some(out) = out.as_mut() {
                prism_dispatch::$mode::vector::$dispatched($($arg,)+ out);
            }
        }
    };
    ($mode:ident; $($arity:ident $Kernel:ident $ty:ident $n:literal $bound:ident $dispatched:ident;)*) => {
        $(vector_exports!(@$arity $mode $ty $n $bound $dispatched);)*
    };
    (@unary $mode:ident $ty:ident $n:literal $bound:ident $dispatched:ident) => {
        vector_exports!(@unary $mode $ty $n $bound $dispatched (a));
    };
    (@binary $mode:ident $ty:ident $n:literal $bound:ident $dispatched:ident) => {
        vector_exports!(@binary $mode $ty $n $bound $dispatched (a, b));
    };
    (@ternary $mode:ident $ty:ident $n:literal $bound:ident $dispatched:ident) => {
        vector_exports!(@ternary $mode $ty $n $bound $dispatched (a, b, c));
    };
}

macro_rules! array_exports {
    (@$arity:ident $mode:ident $name:ident $ty:ident ($($arg:ident),+)) => {
        #[doc = concat!("C export of `", stringify!($mode), "::array::", stringify!($name), "`.")]
        ///
        /// Processes `len` elements and returns the number written: `len`,
        /// or 0 if any pointer is null.
        ///
        /// # Safety
        ///
        /// Every non-null input must be valid for reading `len` elements,
        /// and a non-null `out` for writing `len` elements without
        /// overlapping the inputs.
        #[export_name = concat!("prism_", stringify!($mode), "_array_", stringify!($name))]
        pub unsafe extern "C" fn $name($($arg: *const $ty,)+ out: *mut $ty, len: usize) -> usize {
            prism_dispatch::$mode::array::$name($(input($arg, len),)+ output(out, len))
        }
    };
    ($mode:ident; $($arity:ident $name:ident $Kernel:ident $ty:ident;)*) => {
        $(array_exports!(@$arity $mode $name $ty);)*
    };
    (@unary $mode:ident $name:ident $ty:ident) => {
        array_exports!(@unary $mode $name $ty (a));
    };
    (@binary $mode:ident $name:ident $ty:ident) => {
        array_exports!(@binary $mode $name $ty (a, b));
    };
    (@ternary $mode:ident $name:ident $ty:ident) => {
        array_exports!(@ternary $mode $name $ty (a, b, c));
    };
}

macro_rules! mode_exports {
    ($mode:ident, $doc:literal) => {
        #[doc = $doc]
        pub mod $mode {
            /// Scalar exports.
            pub mod scalar {
                prism_dispatch::for_each_scalar_op!(scalar_exports! { $mode; });
            }

            /// Vector exports.
            pub mod vector {
                use prism_core::Lanes;

                prism_dispatch::for_each_vector_op!(vector_exports! { $mode; });
            }

            /// Array exports.
            pub mod array {
                use crate::{input, output};

                prism_dispatch::for_each_scalar_op!(array_exports! { $mode; });
            }
        }
    };
}

mode_exports!(sr, "Stochastic-rounding exports.");
mode_exports!(ud, "Up-down rounding exports.");

/// Restart the calling thread's streams from `seed`.
#[no_mangle]
pub extern "C" fn prism_reseed(seed: u64) {
    debug!(seed, "reseed requested over the C ABI");
    prism_rng::reseed_thread_context(seed);
}

/// Name of the selected dispatch target, as a static NUL-terminated string.
#[no_mangle]
pub extern "C" fn prism_isa_name() -> *const c_char {
    let name = match prism_dispatch::current_isa() {
        prism_dispatch::Isa::Scalar => c"scalar",
        prism_dispatch::Isa::Sse4 => c"sse4",
        prism_dispatch::Isa::Avx2 => c"avx2",
        prism_dispatch::Isa::Avx512 => c"avx512",
        prism_dispatch::Isa::Neon => c"neon",
    };
    name.as_ptr()
}
