use alloc::string::String;
use core::error::Error;
use core::fmt::{Debug, Display, Formatter};

/// Error type for block-layer scheduling operations
#[derive(Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Backing storage for an elevator's private data could not be obtained
    OutOfMemory,
    /// No elevator is registered under the requested name
    UnknownElevator(String),
    /// An elevator with the same name is already registered
    DuplicateElevator(&'static str),
    /// A configuration option had a malformed value
    InvalidConfig(String),
    /// A diagnostic line did not match the trace format
    InvalidTrace(String),
}

impl Debug for BlockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            BlockError::OutOfMemory => write!(f, "OutOfMemory"),
            BlockError::UnknownElevator(name) => write!(f, "UnknownElevator({name:?})"),
            BlockError::DuplicateElevator(name) => write!(f, "DuplicateElevator({name:?})"),
            BlockError::InvalidConfig(option) => write!(f, "InvalidConfig({option:?})"),
            BlockError::InvalidTrace(line) => write!(f, "InvalidTrace({line:?})"),
        }
    }
}

impl Display for BlockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            BlockError::OutOfMemory => write!(f, "out of memory allocating elevator data"),
            BlockError::UnknownElevator(name) => write!(f, "elevator \"{name}\" not found"),
            BlockError::DuplicateElevator(name) => {
                write!(f, "elevator \"{name}\" already registered")
            }
            BlockError::InvalidConfig(option) => write!(f, "invalid option \"{option}\""),
            BlockError::InvalidTrace(line) => write!(f, "invalid trace line \"{line}\""),
        }
    }
}

impl Error for BlockError {}
