use std::io;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be decoded as text.
    #[error("input must be text: {reason}")]
    InvalidInput { reason: String },

    /// A structured field was assigned on a line that does not hold a key-value pair.
    #[error("cannot set {field} on a non-pair line")]
    InvalidOperation { field: &'static str },

    #[error("failed to read data")]
    ReadFailure {
        #[from]
        source: io::Error,
    },
}
