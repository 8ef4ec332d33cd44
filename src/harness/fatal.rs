use std::fmt;

use thiserror::Error;

use crate::error::Error;

/// The guarded engine call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AcquireScratch,
    OpenWriter,
    /// Replaying the operation at this position of the normalized sequence.
    Replay(usize),
    Finish,
    OpenReader,
    VerifyChecksum,
    VerifyNumEntries,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::AcquireScratch => write!(f, "acquire scratch directory"),
            Stage::OpenWriter => write!(f, "open writer"),
            Stage::Replay(idx) => write!(f, "replay operation {idx}"),
            Stage::Finish => write!(f, "finish writer"),
            Stage::OpenReader => write!(f, "open reader"),
            Stage::VerifyChecksum => write!(f, "verify checksum"),
            Stage::VerifyNumEntries => write!(f, "verify entry count"),
        }
    }
}

/// An engine call reported failure. The iteration is over and the input
/// must be reported as crashing.
///
/// Kept apart from [`Error`] so nothing can recover from it by accident:
/// the only thing to do with one is hand it to [`abort_on_fatal`].
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct FatalError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

/// Tag an engine result with the stage it came from.
pub trait OrFatal<T> {
    fn or_fatal(self, stage: Stage) -> Result<T, FatalError>;
}

impl<T> OrFatal<T> for Result<T, Error> {
    fn or_fatal(self, stage: Stage) -> Result<T, FatalError> {
        self.map_err(|source| FatalError { stage, source })
    }
}

impl<T> OrFatal<T> for std::io::Result<T> {
    fn or_fatal(self, stage: Stage) -> Result<T, FatalError> {
        self.map_err(|e| FatalError {
            stage,
            source: Error::Io(e),
        })
    }
}

/// Write the diagnostic to stderr and abort the process.
///
/// No unwinding and no further cleanup: the fuzz engine sees the abort
/// and keeps the input as a crash reproducer.
pub fn abort_on_fatal(err: FatalError) -> ! {
    eprintln!("{err}");
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_names_stage_and_cause() {
        let err = Err::<(), _>(Error::invalid_argument("end key comes before start key"))
            .or_fatal(Stage::Replay(3))
            .unwrap_err();
        assert_eq!(err.stage, Stage::Replay(3));
        assert_eq!(
            err.to_string(),
            "replay operation 3 failed: Invalid argument: end key comes before start key"
        );
    }

    #[test]
    fn io_errors_are_wrapped() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Err::<(), _>(io).or_fatal(Stage::AcquireScratch).unwrap_err();
        assert!(matches!(err.source, Error::Io(_)));
        assert!(err.to_string().starts_with("acquire scratch directory failed"));
    }
}
