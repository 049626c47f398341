//! Error types

use thiserror::Error;

/// Errors returned by the reduction and elementwise entry points
///
/// Unsupported instruction sets, empty sums and ragged tails are not errors;
/// they are handled by the fallback chain and the scalar tail loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReduceError {
    /// Minimum requested over an empty buffer
    #[error("cannot take the minimum of an empty buffer")]
    EmptyInput,

    /// The two input buffers of an elementwise operation differ in length
    #[error("input buffers differ in length: left has {left} elements, right has {right}")]
    LengthMismatch {
        /// Length of the left operand
        left: usize,
        /// Length of the right operand
        right: usize,
    },

    /// The output buffer does not match the input length
    #[error("output buffer holds {actual} elements, expected {expected}")]
    OutputLengthMismatch {
        /// Length of the inputs
        expected: usize,
        /// Length of the output buffer
        actual: usize,
    },
}

/// Result alias for this crate
pub type Result<T, E = ReduceError> = std::result::Result<T, E>;
