//! # chartkit-core — Chart Descriptor Types
//!
//! Leaf crate of the chartkit workspace. Defines the in-memory form of a
//! `Chart.yaml` descriptor and the error value used to report broken
//! chart rules.
//!
//! - **Metadata** ([`metadata`]): [`Metadata`] and its nested
//!   [`Maintainer`] and [`Dependency`] records, serialized with the
//!   camelCase keys used on disk, plus semantic validation.
//!
//! - **ValidationError** ([`error`]): a message wrapper whose display is
//!   always `validation: <message>`. Build one with [`validation_errorf!`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `chartkit-*` crates.
//! - No filesystem access. Reading and writing `Chart.yaml` lives in
//!   `chartkit-util`.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod metadata;

pub use error::ValidationError;
pub use metadata::{ChartType, Dependency, ImportValue, Maintainer, Metadata};
