#![warn(missing_docs)]

//! Host adapter for capsync.
//!
//! Connects the pure conversion functions of `capsync-convert` to a host
//! scene: reading native capsule components into parameter records,
//! converting them, and attaching the converted components back.
//!
//! # Features
//!
//! - [`CenterAccessor`] capability for the non-public center field, with
//!   chained strategies and a zero-vector fallback
//! - [`SingleConverter`] for one object, replacing its colliders
//! - [`BatchConverter`] for a whole scene, with [`Placement`] options and a
//!   [`BatchReport`]
//!
//! # Example
//!
//! ```ignore
//! use capsync_host::{BatchConverter, BatchOptions, CandidateFields, HostAdapter, NativeSchema};
//!
//! let adapter = HostAdapter::new(
//!     NativeSchema::default(),
//!     CandidateFields::default(),
//!     Converter::default(),
//! );
//! let options = BatchOptions { target: System::B, placement: Placement::Replace };
//! let report = BatchConverter::new(adapter, options).convert_scene(&mut scene);
//! println!("{report}");
//! ```

mod accessor;
mod adapter;
mod batch;
mod error;
mod schema;
mod single;

pub use accessor::{read_center_or_zero, CandidateFields, CenterAccessor, Fallback, FieldAccessor};
pub use adapter::{HostAdapter, Placement};
pub use batch::{BatchConverter, BatchOptions, BatchReport, EntryStatus, ReportEntry};
pub use error::{AccessError, HostError, Result};
pub use schema::{Detection, NativeSchema};
pub use single::{ObjectOutcome, SingleConverter};
