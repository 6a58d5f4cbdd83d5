//! Shared infrastructure that does not belong to any one subsystem.

pub mod interner;
