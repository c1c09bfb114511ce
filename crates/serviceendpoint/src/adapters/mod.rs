//! Adapter implementations of the service endpoint port that need no I/O.

pub mod memory;
