//! # chartkit-util — Chart File I/O
//!
//! Reads, writes, and recognizes the `Chart.yaml` descriptor of a chart
//! directory.
//!
//! - **Chart files** ([`chartfile`]): [`load_chartfile`] (lenient),
//!   [`strict_load_chartfile`] (rejects unknown keys), [`save_chartfile`],
//!   and the [`is_chart_dir`] check.
//!
//! - **Codec** ([`codec`]): the single YAML decode path shared by the
//!   loaders and the directory check, switched by [`DecodeMode`].
//!
//! - **Errors** ([`error`]): [`ChartError`] keeps I/O, decode, and chart
//!   rule failures apart.
//!
//! ## Logging
//!
//! Operations emit `tracing` events at `debug` (and `warn` for strict
//! decode rejections). The crate never installs a subscriber.

pub mod chartfile;
pub mod codec;
pub mod error;

pub use chartfile::{
    is_chart_dir, load_chartfile, load_with_mode, save_chartfile, strict_load_chartfile,
    CHARTFILE_MODE, CHARTFILE_NAME,
};
pub use codec::{decode_metadata, encode_metadata, DecodeMode};
pub use error::{ChartError, ChartResult};
