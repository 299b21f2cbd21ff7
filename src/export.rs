//! Payload export: encodes a surface as a portable image and defines the
//! persistence bridge types.
//!
//! The engine never talks to the backend. On every stroke completion, undo,
//! and clear it hands its consumer an [`ExportUpdate`] through the
//! [`ExportFn`] callback; the consumer stages the payload into its own
//! answer/note model and persists it however it likes. This seam is what
//! lets one engine serve both the quiz flow and the notebook flow.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::surface::Surface;

/// Opaque logical key identifying one engine instance, e.g. `drawing-p3`.
pub type EngineKey = String;

/// Payload generation failure.
///
/// Surfaced through the bridge as [`ExportUpdate::Failed`] so a transient
/// encode error cannot take down the hosting screen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// The raster could not be encoded as PNG.
    #[error("png encode failed: {0}")]
    PngEncode(String),
}

/// One update delivered over the persistence bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportUpdate {
    /// The surface raster as a `data:image/png;base64,…` URI.
    Image(String),
    /// The surface was cleared; the persisted field becomes the "no answer
    /// drawn" sentinel.
    Cleared,
    /// Payload generation failed; the consumer keeps its last good payload.
    Failed(ExportError),
}

impl ExportUpdate {
    /// The data URI carried by this update, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Image(uri) => Some(uri),
            Self::Cleared | Self::Failed(_) => None,
        }
    }
}

/// Consumer-supplied callback, invoked with the engine's key and the update.
pub type ExportFn = Box<dyn FnMut(&EngineKey, &ExportUpdate)>;

/// Encode the surface's current raster as a PNG data URI.
///
/// # Errors
///
/// Returns [`ExportError::PngEncode`] when the PNG encoder rejects the
/// buffer.
pub fn encode_png_data_uri(surface: &Surface) -> Result<String, ExportError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(
            surface.pixels(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ExportError::PngEncode(e.to_string()))?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
    Ok(format!("data:image/png;base64,{b64}"))
}
