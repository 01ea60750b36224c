//! Listings document boundary
//!
//! The filter core works on an in-memory record graph: a channel set and a
//! programme sequence, plus an encoding marker and an opaque credits block
//! that pass through unchanged. This module owns that data model and the
//! reader/writer that moves it in and out of the process; the core never
//! inspects the serialized form.

pub mod entities;
pub mod io;

pub use entities::{Channel, ClumpIdx, FieldValue, Listings, Programme};
pub use io::{DocumentError, read_listings, write_listings};
