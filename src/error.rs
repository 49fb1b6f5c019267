use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the search core.
///
/// Everything except [`FinderError::InvalidQuery`] is scoped to a single
/// candidate (or a single method) and never aborts a search.
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive entry {name} is too large ({size} bytes, limit {limit})")]
    EntryTooLarge { name: String, size: u64, limit: u64 },

    #[error("not a class file (magic 0x{0:08X})")]
    BadMagic(u32),

    #[error("class file truncated at offset {0}")]
    Truncated(usize),

    #[error("unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag { tag: u8, index: u16 },

    #[error("invalid constant pool reference #{index}: expected {expected}")]
    BadConstantRef { index: u16, expected: &'static str },

    #[error("invalid descriptor {descriptor:?}: {reason}")]
    BadDescriptor { descriptor: String, reason: String },

    #[error("invalid generic signature {signature:?}: {reason}")]
    BadSignature { signature: String, reason: String },

    #[error("java parser failure: {0}")]
    Parser(String),

    #[error("syntax error in source at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("directory \"{}\" does not exist", .0.display())]
    MissingDirectory(PathBuf),
}

pub type Result<T> = std::result::Result<T, FinderError>;
