//! # Chart File I/O
//!
//! Loading, saving, and recognizing `Chart.yaml`.
//!
//! The loaders and the saver pass filesystem and YAML errors through
//! unchanged. [`is_chart_dir`] is the one place that replaces a read
//! failure with a fixed message, keeping the original error as the
//! `source()`.
//!
//! Nothing here locks or caches: concurrent calls on the same path race at
//! the filesystem level, and callers that need atomic replacement must
//! coordinate themselves.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use chartkit_core::Metadata;

use crate::codec::{decode_metadata, encode_metadata, DecodeMode};
use crate::error::{ChartError, ChartResult};

/// Base name of the metadata file inside a chart directory.
pub const CHARTFILE_NAME: &str = "Chart.yaml";

/// Permission bits for a newly created `Chart.yaml` (before umask).
pub const CHARTFILE_MODE: u32 = 0o644;

/// Load a `Chart.yaml` file, ignoring keys the schema does not know.
///
/// An empty file or a `null` document yields a zero-valued [`Metadata`].
pub fn load_chartfile(path: &Path) -> ChartResult<Metadata> {
    load_with_mode(path, DecodeMode::Lenient)
}

/// Load a `Chart.yaml` file, rejecting keys the schema does not know.
pub fn strict_load_chartfile(path: &Path) -> ChartResult<Metadata> {
    load_with_mode(path, DecodeMode::Strict)
}

/// Load a `Chart.yaml` file with an explicit decode mode.
pub fn load_with_mode(path: &Path, mode: DecodeMode) -> ChartResult<Metadata> {
    let bytes = fs::read(path)?;
    let metadata = decode_metadata(&bytes, mode)?.unwrap_or_default();
    tracing::debug!(path = %path.display(), ?mode, name = %metadata.name, "loaded chart file");
    Ok(metadata)
}

/// Save metadata as a `Chart.yaml` file.
///
/// `path` is the complete file path (`mychart/Chart.yaml`), not the chart
/// directory. The file is created or truncated. A failed write may leave a
/// truncated file behind.
pub fn save_chartfile(path: &Path, metadata: &Metadata) -> ChartResult<()> {
    let out = encode_metadata(metadata)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CHARTFILE_MODE);
    }

    let mut file = options.open(path)?;
    file.write_all(&out)?;
    tracing::debug!(path = %path.display(), bytes = out.len(), "saved chart file");
    Ok(())
}

/// Check that `dir` is a chart directory with a usable `Chart.yaml`.
///
/// Checks run in order and the first failure is returned: the path must
/// exist and be a directory, contain `Chart.yaml`, that file must be
/// readable and decode (leniently) to non-null metadata, and the metadata
/// must carry a name. Never returns `Ok(false)`.
pub fn is_chart_dir(dir: &Path) -> ChartResult<bool> {
    let info = fs::metadata(dir)?;
    if !info.is_dir() {
        return Err(ChartError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let chart_yaml = dir.join(CHARTFILE_NAME);
    if let Err(e) = fs::metadata(&chart_yaml) {
        if e.kind() == ErrorKind::NotFound {
            return Err(ChartError::ChartfileMissing {
                dir: dir.to_path_buf(),
            });
        }
    }

    let content = fs::read(&chart_yaml).map_err(|source| ChartError::Unreadable {
        dir: dir.to_path_buf(),
        source,
    })?;

    let metadata =
        decode_metadata(&content, DecodeMode::Lenient)?.ok_or(ChartError::MetadataMissing)?;
    if metadata.name.is_empty() {
        return Err(ChartError::EmptyName);
    }

    tracing::debug!(dir = %dir.display(), name = %metadata.name, "chart directory recognized");
    Ok(true)
}
