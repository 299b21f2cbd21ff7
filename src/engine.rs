//! The stroke canvas engine: surface, renderer, history, and the export
//! bridge behind one per-instance API.
//!
//! [`EngineCore`] holds all logic and no browser types, so the full
//! input → paint → snapshot → export path runs in native tests. [`Engine`]
//! wraps a core around a live `<canvas>` element: it reads the element's
//! bounding rectangle for coordinate mapping and blits the pixel buffer back
//! after every mutation. It is the only type here that touches `web-sys`.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::{Deserialize, Serialize};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::consts::{NOTE_HISTORY_CAP, PEN_WIDTH, PEN_WIDTH_LEGACY, TAP_DOT_RADIUS};
use crate::export::{self, EngineKey, ExportError, ExportFn, ExportUpdate};
use crate::history::{History, HistoryPolicy};
use crate::input::{DrawState, PointerInput};
use crate::render;
use crate::surface::{Rgba, Surface};
use crate::viewport::{self, Point, ViewRect};

/// Engine creation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// No surface element exists for the key (not attached to the document).
    #[error("drawing surface for `{key}` not found")]
    SurfaceNotFound { key: EngineKey },
    /// The surface element exists but has no measured size yet. Callers
    /// must wait for layout and retry.
    #[error("drawing surface for `{key}` has no measured size")]
    SurfaceUnsized { key: EngineKey },
    /// The raster backend refused to hand out a 2d context.
    #[error("2d context unavailable for `{key}`")]
    ContextUnavailable { key: EngineKey },
}

/// Serializable per-variant settings.
///
/// The export callback travels separately in [`EngineOptions`] because it is
/// not data. Hosts can ship these presets as JSON alongside screen config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pen width in surface pixels.
    pub pen_width: f64,
    /// Undo history retention.
    pub history: HistoryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::quiz()
    }
}

impl EngineConfig {
    /// Quiz drawing-answer canvas: 1 px pen, unbounded history for the
    /// lifetime of one question.
    #[must_use]
    pub fn quiz() -> Self {
        Self { pen_width: PEN_WIDTH, history: HistoryPolicy::Unbounded }
    }

    /// Notebook annotation canvas: 1 px pen, history capped to bound memory.
    #[must_use]
    pub fn notebook() -> Self {
        Self { pen_width: PEN_WIDTH, history: HistoryPolicy::Capped(NOTE_HISTORY_CAP) }
    }

    /// Legacy simple canvas: thick pen, no undo.
    #[must_use]
    pub fn legacy() -> Self {
        Self { pen_width: PEN_WIDTH_LEGACY, history: HistoryPolicy::Disabled }
    }
}

/// Everything needed to create an engine besides the surface itself.
pub struct EngineOptions {
    pub config: EngineConfig,
    /// Persistence bridge callback; `None` for hosts that poll
    /// [`EngineCore::export_payload`] instead.
    pub on_export: Option<ExportFn>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineOptions {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config, on_export: None }
    }

    /// Attach the persistence bridge callback.
    #[must_use]
    pub fn on_export(mut self, callback: ExportFn) -> Self {
        self.on_export = Some(callback);
        self
    }
}

/// Engine state and logic, independent of any canvas element.
///
/// Kept apart from [`Engine`] so the whole drawing path runs under native
/// `cargo test` with no browser in sight.
pub struct EngineCore {
    key: EngineKey,
    surface: Surface,
    history: History,
    state: DrawState,
    pen_width: f64,
    on_export: Option<ExportFn>,
}

impl EngineCore {
    /// Create a core for an attached, measured surface.
    ///
    /// # Errors
    ///
    /// [`EngineError::SurfaceUnsized`] when either dimension is zero — the
    /// caller must wait until the element is attached and laid out, then
    /// retry.
    pub fn create(
        key: impl Into<EngineKey>,
        width: u32,
        height: u32,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let key = key.into();
        let Some(surface) = Surface::new(width, height) else {
            return Err(EngineError::SurfaceUnsized { key });
        };
        let history = History::new(surface.snapshot(), options.config.history);
        tracing::debug!(%key, width, height, "engine core created");
        Ok(Self {
            key,
            surface,
            history,
            state: DrawState::Idle,
            pen_width: options.config.pen_width,
            on_export: options.on_export,
        })
    }

    // --- Queries ---

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Number of history entries, counting the blank baseline.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether there is a stroke to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a stroke is currently in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    /// Encode the current raster on demand, outside the bridge.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] when PNG encoding fails.
    pub fn export_payload(&self) -> Result<String, ExportError> {
        export::encode_png_data_uri(&self.surface)
    }

    // --- Input events ---

    /// Pointer-down: begin a stroke and paint the tap dot.
    ///
    /// Ignored while another stroke is in progress (the first active pointer
    /// owns the stroke) and for samples without a usable position.
    pub fn pointer_down(&mut self, input: &PointerInput, rect: ViewRect) {
        if self.state.is_drawing() {
            tracing::debug!(key = %self.key, pointer = input.id, "pointer-down ignored: stroke in progress");
            return;
        }
        let Some(at) = self.map(input, rect) else { return };
        let radius = self.dot_radius();
        render::paint_dot(&mut self.surface, at, radius, Rgba::BLACK);
        self.state = DrawState::Drawing { pointer: input.id, last: at };
    }

    /// Pointer-move: extend the stroke with a straight segment.
    ///
    /// A no-op while idle (stray moves after an unmatched up) and for
    /// samples from a pointer other than the one that started the stroke.
    pub fn pointer_move(&mut self, input: &PointerInput, rect: ViewRect) {
        let DrawState::Drawing { pointer, last } = self.state else {
            return;
        };
        if pointer != input.id {
            return;
        }
        let Some(at) = self.map(input, rect) else { return };
        render::paint_segment(&mut self.surface, last, at, self.pen_width, Rgba::BLACK);
        self.state = DrawState::Drawing { pointer, last: at };
    }

    /// Pointer-up: finish the stroke, snapshot it, and export.
    ///
    /// Samples from non-owning pointers are ignored, so a second finger
    /// lifting does not cut the active stroke short.
    pub fn pointer_up(&mut self, input: &PointerInput) {
        let DrawState::Drawing { pointer, .. } = self.state else {
            return;
        };
        if pointer != input.id {
            return;
        }
        self.finish_stroke();
    }

    /// Pointer-cancel, pointer-leave, or window blur: finish the stroke
    /// unconditionally so interrupted input never leaves it stuck open.
    pub fn pointer_cancel(&mut self) {
        if self.state.is_drawing() {
            self.finish_stroke();
        }
    }

    // --- Commands ---

    /// Undo the most recent stroke.
    ///
    /// A no-op at the baseline (the initial blank state is never
    /// discarded); otherwise the surface is repainted from the new last
    /// entry and re-exported so persisted state reflects the undo.
    pub fn undo(&mut self) {
        let Some(snapshot) = self.history.undo() else {
            return;
        };
        self.surface.restore(snapshot);
        self.emit_payload();
    }

    /// Wipe the surface to white, reset history to the blank baseline, and
    /// export the "no answer drawn" sentinel.
    pub fn clear(&mut self) {
        self.surface.fill(Rgba::WHITE);
        self.history.reset(self.surface.snapshot());
        self.state = DrawState::Idle;
        self.notify(&ExportUpdate::Cleared);
    }

    // --- Internals ---

    fn map(&self, input: &PointerInput, rect: ViewRect) -> Option<Point> {
        let Some(client) = input.client else {
            tracing::debug!(key = %self.key, pointer = input.id, "event without coordinates ignored");
            return None;
        };
        viewport::map_to_surface(client, rect, self.surface.width(), self.surface.height())
    }

    fn dot_radius(&self) -> f64 {
        (self.pen_width / 2.0).max(TAP_DOT_RADIUS)
    }

    fn finish_stroke(&mut self) {
        self.state = DrawState::Idle;
        self.history.record(self.surface.snapshot());
        self.emit_payload();
    }

    fn emit_payload(&mut self) {
        let update = match export::encode_png_data_uri(&self.surface) {
            Ok(uri) => ExportUpdate::Image(uri),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "payload export failed");
                ExportUpdate::Failed(e)
            }
        };
        self.notify(&update);
    }

    fn notify(&mut self, update: &ExportUpdate) {
        if let Some(callback) = self.on_export.as_mut() {
            callback(&self.key, update);
        }
    }
}

/// The full engine: a core bound to a live `<canvas>` element.
///
/// The host owns the DOM listeners and forwards normalized samples here;
/// disposal (via the registry) drops the raster with the instance, and the
/// host detaches its listeners alongside.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to the given canvas element.
    ///
    /// The element must already be attached and laid out; creation fails
    /// rather than registering a half-alive instance.
    ///
    /// # Errors
    ///
    /// [`EngineError::SurfaceUnsized`] when the element has no measured
    /// size, [`EngineError::ContextUnavailable`] when no 2d context can be
    /// obtained or the initial blit fails.
    pub fn create(
        key: impl Into<EngineKey>,
        canvas: HtmlCanvasElement,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let key = key.into();
        let rect = canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Err(EngineError::SurfaceUnsized { key });
        }
        let ctx = match canvas.get_context("2d") {
            Ok(Some(object)) => match object.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => return Err(EngineError::ContextUnavailable { key }),
            },
            Ok(None) | Err(_) => return Err(EngineError::ContextUnavailable { key }),
        };
        let core = EngineCore::create(key, canvas.width(), canvas.height(), options)?;
        let engine = Self { canvas, ctx, core };
        if engine.present().is_err() {
            return Err(EngineError::ContextUnavailable { key: engine.core.key().to_owned() });
        }
        Ok(engine)
    }

    /// Look up the canvas element for `key` by DOM id and build an engine.
    ///
    /// # Errors
    ///
    /// [`EngineError::SurfaceNotFound`] when the document has no such
    /// element or it is not a canvas, plus everything [`Engine::create`]
    /// returns.
    pub fn create_for_element_id(
        key: impl Into<EngineKey>,
        element_id: &str,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let key = key.into();
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Err(EngineError::SurfaceNotFound { key });
        };
        let Some(element) = document.get_element_by_id(element_id) else {
            tracing::warn!(%key, element_id, "canvas element not found");
            return Err(EngineError::SurfaceNotFound { key });
        };
        let Ok(canvas) = element.dyn_into::<HtmlCanvasElement>() else {
            return Err(EngineError::SurfaceNotFound { key });
        };
        Self::create(key, canvas, options)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn key(&self) -> &str {
        self.core.key()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.core.history_len()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.core.can_undo()
    }

    // --- Input events (delegated with the live bounding rect) ---

    pub fn pointer_down(&mut self, input: &PointerInput) {
        let rect = self.view_rect();
        self.core.pointer_down(input, rect);
        self.blit();
    }

    pub fn pointer_move(&mut self, input: &PointerInput) {
        let rect = self.view_rect();
        self.core.pointer_move(input, rect);
        self.blit();
    }

    pub fn pointer_up(&mut self, input: &PointerInput) {
        self.core.pointer_up(input);
        self.blit();
    }

    pub fn pointer_cancel(&mut self) {
        self.core.pointer_cancel();
        self.blit();
    }

    // --- Delegated commands ---

    pub fn undo(&mut self) {
        self.core.undo();
        self.blit();
    }

    pub fn clear(&mut self) {
        self.core.clear();
        self.blit();
    }

    // --- Presentation ---

    /// The element's current bounding rectangle in viewport units. Read per
    /// event, since responsive CSS can resize the element at any time.
    #[must_use]
    pub fn view_rect(&self) -> ViewRect {
        let rect = self.canvas.get_bounding_client_rect();
        ViewRect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    /// Push the core's pixel buffer to the canvas element.
    ///
    /// # Errors
    ///
    /// Returns the raw browser error when the buffer cannot be wrapped or
    /// drawn.
    pub fn present(&self) -> Result<(), JsValue> {
        let surface = self.core.surface();
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(surface.pixels()),
            surface.width(),
            surface.height(),
        )?;
        self.ctx.put_image_data(&image, 0.0, 0.0)
    }

    fn blit(&self) {
        if let Err(e) = self.present() {
            tracing::warn!(key = %self.core.key(), ?e, "canvas blit failed");
        }
    }
}
