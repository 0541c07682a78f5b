use thiserror::Error;

/// The error type for model construction and forward passes.
///
/// Shape and configuration problems are reported here instead of surfacing as
/// panics deep inside a tensor operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UNetError {
    /// Error for when an invalid model configuration is provided.
    #[error("Invalid model configuration: {reason}")]
    InvalidConfiguration {
        /// The reason why the configuration is invalid.
        reason: String,
    },

    /// Error for when the input does not have the channel depth the model was built for.
    #[error("Input has {actual} channels, expected {expected}")]
    ChannelMismatch {
        /// Channel depth the first encoder stage consumes.
        expected: usize,
        /// Channel depth of the offending input.
        actual: usize,
    },

    /// Error for when the input cannot survive every pooling stage.
    #[error("Input spatial size {height}x{width} is below the minimum of {minimum}x{minimum}")]
    InputTooSmall {
        /// Input height.
        height: usize,
        /// Input width.
        width: usize,
        /// Smallest admissible side length, `2^N` for a schedule of length `N`.
        minimum: usize,
    },

    /// Error for when a decoder is handed a different number of skip connections
    /// than it has stages.
    #[error("Decoder expects {expected} skip connections, got {actual}")]
    SkipCountMismatch {
        /// Number of decoder stages.
        expected: usize,
        /// Number of skip connections supplied.
        actual: usize,
    },
}

/// A specialized `Result` type for model operations.
pub type UNetResult<T> = Result<T, UNetError>;
