//! The closed set of faults the demonstrator knows how to trigger and catch.

use std::fmt;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One of the eleven fault categories, in demonstration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    IoFailure,
    FileNotFound,
    EndOfStream,
    DatabaseFailure,
    ClassNotFound,
    Arithmetic,
    NullReference,
    IndexOutOfBounds,
    InvalidCast,
    IllegalArgument,
    NumberFormat,
}

impl FaultKind {
    #[cfg(test)]
    pub(crate) const ALL: [FaultKind; 11] = [
        FaultKind::IoFailure,
        FaultKind::FileNotFound,
        FaultKind::EndOfStream,
        FaultKind::DatabaseFailure,
        FaultKind::ClassNotFound,
        FaultKind::Arithmetic,
        FaultKind::NullReference,
        FaultKind::IndexOutOfBounds,
        FaultKind::InvalidCast,
        FaultKind::IllegalArgument,
        FaultKind::NumberFormat,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FaultKind::IoFailure => "IoFailure",
            FaultKind::FileNotFound => "FileNotFound",
            FaultKind::EndOfStream => "EndOfStream",
            FaultKind::DatabaseFailure => "DatabaseFailure",
            FaultKind::ClassNotFound => "ClassNotFound",
            FaultKind::Arithmetic => "Arithmetic",
            FaultKind::NullReference => "NullReference",
            FaultKind::IndexOutOfBounds => "IndexOutOfBounds",
            FaultKind::InvalidCast => "InvalidCast",
            FaultKind::IllegalArgument => "IllegalArgument",
            FaultKind::NumberFormat => "NumberFormat",
        }
    }

    /// Whether a fault of this kind is caught by a handler for `other`.
    ///
    /// Missing files and truncated streams are specialised I/O failures, so an
    /// `IoFailure` handler catches them too. Handlers must therefore be listed
    /// most specific first.
    pub fn is_a(self, other: FaultKind) -> bool {
        self == other
            || matches!(
                (self, other),
                (FaultKind::FileNotFound, FaultKind::IoFailure)
                    | (FaultKind::EndOfStream, FaultKind::IoFailure)
            )
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug)]
pub enum Fault {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    EndOfStream {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite already names the file in its open errors.
    #[error("{source}")]
    Database {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{name}")]
    ClassNotFound { name: String },

    #[error("attempt to divide by zero")]
    DivideByZero,

    #[error("cannot invoke `{method}` because `{binding}` is absent")]
    NullReference {
        method: &'static str,
        binding: &'static str,
    },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("{from} cannot be cast to {to}")]
    InvalidCast {
        from: &'static str,
        to: &'static str,
    },

    #[error("negative length: {0}")]
    NegativeLength(i64),

    #[error("{source}: {input:?}")]
    NumberFormat {
        input: String,
        #[source]
        source: ParseIntError,
    },
}

impl Fault {
    /// Classify an I/O error raised while working on `path`.
    pub fn from_io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Fault::FileNotFound { path, source },
            io::ErrorKind::UnexpectedEof => Fault::EndOfStream { path, source },
            _ => Fault::Io { path, source },
        }
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::Io { .. } => FaultKind::IoFailure,
            Fault::FileNotFound { .. } => FaultKind::FileNotFound,
            Fault::EndOfStream { .. } => FaultKind::EndOfStream,
            Fault::Database { .. } => FaultKind::DatabaseFailure,
            Fault::ClassNotFound { .. } => FaultKind::ClassNotFound,
            Fault::DivideByZero => FaultKind::Arithmetic,
            Fault::NullReference { .. } => FaultKind::NullReference,
            Fault::IndexOutOfBounds { .. } => FaultKind::IndexOutOfBounds,
            Fault::InvalidCast { .. } => FaultKind::InvalidCast,
            Fault::NegativeLength(_) => FaultKind::IllegalArgument,
            Fault::NumberFormat { .. } => FaultKind::NumberFormat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_in_demonstration_order() {
        assert_eq!(FaultKind::ALL.len(), 11);
        assert_eq!(FaultKind::ALL[0], FaultKind::IoFailure);
        assert_eq!(FaultKind::ALL[10], FaultKind::NumberFormat);
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<_> = FaultKind::ALL.iter().map(|k| k.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 11);
    }

    #[test]
    fn test_specialised_io_kinds() {
        assert!(FaultKind::FileNotFound.is_a(FaultKind::IoFailure));
        assert!(FaultKind::EndOfStream.is_a(FaultKind::IoFailure));
        assert!(!FaultKind::IoFailure.is_a(FaultKind::FileNotFound));
        assert!(!FaultKind::DatabaseFailure.is_a(FaultKind::IoFailure));
    }

    #[test]
    fn test_every_kind_is_itself_only() {
        for kind in FaultKind::ALL {
            assert!(kind.is_a(kind));
            let others = FaultKind::ALL
                .iter()
                .filter(|other| **other != kind && kind.is_a(**other))
                .count();
            let expected = match kind {
                FaultKind::FileNotFound | FaultKind::EndOfStream => 1,
                _ => 0,
            };
            assert_eq!(others, expected, "{kind}");
        }
    }

    #[test]
    fn test_from_io_classification() {
        let nf = Fault::from_io("a", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(nf.kind(), FaultKind::FileNotFound);

        let eof = Fault::from_io("a", io::Error::from(io::ErrorKind::UnexpectedEof));
        assert_eq!(eof.kind(), FaultKind::EndOfStream);

        let denied = Fault::from_io("a", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.kind(), FaultKind::IoFailure);
    }

    #[test]
    fn test_io_message_includes_path() {
        let fault = Fault::from_io(
            "/root/restricted/test.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        );
        let display = fault.to_string();
        assert!(display.starts_with("/root/restricted/test.txt: "));
        assert!(display.contains("Permission denied"));
    }

    #[test]
    fn test_number_format_message_quotes_input() {
        let source = "abc".parse::<i32>().unwrap_err();
        let fault = Fault::NumberFormat {
            input: "abc".to_string(),
            source,
        };
        assert_eq!(fault.to_string(), "invalid digit found in string: \"abc\"");
    }

    #[test]
    fn test_simple_messages() {
        assert_eq!(Fault::DivideByZero.to_string(), "attempt to divide by zero");
        assert_eq!(
            Fault::IndexOutOfBounds { index: 5, len: 5 }.to_string(),
            "index 5 out of bounds for length 5"
        );
        assert_eq!(Fault::NegativeLength(-1).to_string(), "negative length: -1");
    }

    #[test]
    fn test_fault_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Fault>();
        assert_sync::<Fault>();
    }
}
