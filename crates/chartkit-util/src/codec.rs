//! YAML encoding and decoding of chart metadata.
//!
//! One decode path serves both loaders and the directory check; the only
//! difference between lenient and strict loading is the [`DecodeMode`]
//! passed in.

use chartkit_core::Metadata;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// How unknown keys are treated when decoding `Chart.yaml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    /// Unknown keys are ignored. Used when reading charts that may have
    /// been written against a newer schema.
    #[default]
    Lenient,
    /// Unknown keys are errors. Used when authoring or linting charts.
    Strict,
}

/// Decode `Chart.yaml` bytes.
///
/// Returns `Ok(None)` when the content is empty or a YAML `null` document:
/// the decode succeeded but produced no metadata. Only the first document
/// of a multi-document stream is read. Type mismatches and duplicate keys
/// are errors in both modes.
pub fn decode_metadata(bytes: &[u8], mode: DecodeMode) -> ChartResult<Option<Metadata>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let Some(de) = serde_yaml::Deserializer::from_slice(bytes).next() else {
        return Ok(None);
    };
    match mode {
        DecodeMode::Lenient => Ok(Option::<Metadata>::deserialize(de)?),
        DecodeMode::Strict => {
            let mut unknown: Option<String> = None;
            let metadata: Option<Metadata> = serde_ignored::deserialize(de, |path| {
                if unknown.is_none() {
                    unknown = Some(path.to_string());
                }
            })?;
            if let Some(path) = unknown {
                tracing::warn!(field = %path, "strict decode rejected unknown field");
                return Err(ChartError::UnknownField { path });
            }
            Ok(metadata)
        }
    }
}

/// Encode metadata as `Chart.yaml` bytes.
pub fn encode_metadata(metadata: &Metadata) -> ChartResult<Vec<u8>> {
    Ok(serde_yaml::to_string(metadata)?.into_bytes())
}
