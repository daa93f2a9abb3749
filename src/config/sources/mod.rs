//! Config sources layered onto a builder.

pub mod environment;
pub mod file;
