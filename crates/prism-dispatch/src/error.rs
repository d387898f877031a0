//! Dispatch errors.

use crate::isa::Isa;
use prism_kernels::Op;
use thiserror::Error;

/// Errors raised when choosing or driving a dispatch target.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The name matches no known ISA.
    #[error("unknown ISA {name:?} (expected scalar, sse4, avx2, avx512 or neon)")]
    UnknownIsa {
        /// The rejected name.
        name: String,
    },

    /// The ISA is known but the running CPU lacks it.
    #[error("ISA {isa} is not supported by this CPU")]
    UnsupportedIsa {
        /// The requested ISA.
        isa: Isa,
    },

    /// An array call received the wrong number of operand slices.
    #[error("{op} takes {expected} operands, got {got}")]
    Arity {
        /// The operation.
        op: Op,
        /// Operands the operation takes.
        expected: usize,
        /// Operands supplied.
        got: usize,
    },
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
