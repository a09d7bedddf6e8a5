//! Destination implementations

pub mod file;
pub mod writer;

pub use file::FileDestination;
pub use writer::WriterDestination;

pub use crate::core::Destination;
