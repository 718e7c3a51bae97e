//! Core types

pub mod record;

pub use record::{DocumentRecord, SourceKind};
