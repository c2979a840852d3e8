//! Error type

use crate::types::Plane;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The trace ended before a declared field or child could be read.
    #[error("trace ended before all declared data could be read")]
    TruncatedInput,

    /// A coefficient set carried a number of values that does not match the
    /// block size of its plane.
    #[error("coefficient set for {plane:?} has {length} values")]
    MalformedCoefficientBlock { plane: Plane, length: i64 },

    /// The trace named a plane that is not part of the plane enumeration.
    #[error("unknown plane identifier {0:#04x}")]
    UnknownPlane(u8),

    /// The trace framing is not consistent, usually because of a bad count.
    ///
    /// Once this happens the read cursor can no longer be trusted to sit on a
    /// field boundary.
    #[error("corrupt trace framing: {0}")]
    CorruptFraming(&'static str),

    /// A coefficient list handed to the unpacker has the wrong length for its
    /// plane.
    #[error("expected {expected} coefficients, got {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("unhandled I/O error: {0}")]
    UnhandledIoError(io::Error),
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            Error::TruncatedInput
        } else {
            Error::UnhandledIoError(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
