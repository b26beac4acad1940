// SPDX-License-Identifier: MIT
//
// Output errors.
//
// Every failure while writing a dump is fatal to that dump. There is no
// transient/permanent distinction: a short write or a destination error
// means the disk is full or the pipe is gone, and retrying won't change that.

use thiserror::Error;

/// Failure while appending to or flushing an [`OutputBuffer`].
///
/// [`OutputBuffer`]: crate::output::OutputBuffer
#[derive(Debug, Error)]
pub enum Error {
    /// The destination accepted fewer bytes than were handed to it.
    #[error("short write: {written} of {expected} bytes accepted")]
    ShortWrite {
        /// Bytes the flush tried to write.
        expected: usize,
        /// Bytes the destination actually took.
        written: usize,
    },

    /// The destination returned an error (a closed pipe, a full disk).
    #[error("write failed after {written} of {expected} bytes: {source}")]
    Destination {
        /// Bytes the flush tried to write.
        expected: usize,
        /// Bytes the destination took before failing.
        written: usize,
        /// The error the destination reported.
        #[source]
        source: std::io::Error,
    },

    /// An earlier write failed; the buffer refuses further output.
    #[error("output buffer poisoned by an earlier write failure")]
    Poisoned,

    /// The destination reported an error outside a byte-count check.
    #[error("IO error: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    /// Unwraps an [`Error`] that travelled through `io::Write` as an
    /// `io::Error`; wraps anything else as [`Error::Io`].
    fn from(err: std::io::Error) -> Self {
        if !err.get_ref().is_some_and(|inner| inner.is::<Self>()) {
            return Self::Io(err);
        }
        match err.into_inner().map(|inner| inner.downcast::<Self>()) {
            Some(Ok(inner)) => *inner,
            Some(Err(other)) => Self::Io(std::io::Error::other(other)),
            None => Self::Poisoned,
        }
    }
}

/// Result alias for output operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_write_message() {
        let err = Error::ShortWrite {
            expected: 10,
            written: 4,
        };
        assert_eq!(err.to_string(), "short write: 4 of 10 bytes accepted");
    }

    #[test]
    fn destination_message_names_os_error() {
        let err = Error::Destination {
            expected: 8,
            written: 2,
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe"),
        };
        assert_eq!(err.to_string(), "write failed after 2 of 8 bytes: broken pipe");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::other("boom");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn wrapped_error_is_recovered() {
        let io = std::io::Error::other(Error::ShortWrite {
            expected: 3,
            written: 1,
        });
        let err: Error = io.into();
        assert!(matches!(
            err,
            Error::ShortWrite {
                expected: 3,
                written: 1
            }
        ));
    }
}
