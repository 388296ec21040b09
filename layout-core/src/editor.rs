//! The editing session.
//!
//! [`Editor`] owns the document being edited together with everything
//! that only lives for one session: selection, viewport, drag state,
//! guide lines and measured sizes. Only the [`Document`] is handed out on
//! save.

use serde::{Deserialize, Serialize};

use crate::drag::{DragSession, DragState};
use crate::event::{
    EventResponse, InputEvent, PointerEvent, PointerPhase, PointerTarget, TouchEvent, TouchPhase,
};
use crate::measure::Measure;
use crate::snap::{GuideLine, SnapPolicy};
use crate::{
    Category, Document, Layer, LayerContent, LayerId, LayoutError, LayoutResult, Orientation,
    Point, Size, SizeCache, TextStyle, Viewport,
};

/// Receiver of the editor's explicit save and cancel actions.
pub trait EditorShell {
    /// Persist a validated document.
    fn on_save(&mut self, document: &Document);

    /// Discard the in-progress document.
    fn on_cancel(&mut self);
}

/// Tunable editor behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tie-break between several snap matches on one axis.
    pub snap_policy: SnapPolicy,
}

/// An editing session over one document.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    categories: Vec<Category>,
    selected: Option<LayerId>,
    viewport: Viewport,
    drag: DragState,
    guides: Vec<GuideLine>,
    sizes: SizeCache,
    /// Screen position of the page's top-left corner.
    canvas_origin: Point,
    config: EditorConfig,
}

impl Editor {
    /// Open an existing document.
    #[must_use]
    pub fn new(document: Document, categories: Vec<Category>) -> Self {
        Self {
            document,
            categories,
            selected: None,
            viewport: Viewport::new(),
            drag: DragState::Idle,
            guides: Vec::new(),
            sizes: SizeCache::new(),
            canvas_origin: Point::default(),
            config: EditorConfig::default(),
        }
    }

    /// Open a blank portrait document.
    #[must_use]
    pub fn new_document(categories: Vec<Category>) -> Self {
        Self::new(Document::default(), categories)
    }

    /// Set the editor configuration.
    #[must_use]
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The document being edited.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Available categories.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Currently selected layer.
    #[must_use]
    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    /// Viewport state.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current document-to-screen scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.viewport.scale()
    }

    /// Guide lines of the active drag.
    #[must_use]
    pub fn guides(&self) -> &[GuideLine] {
        &self.guides
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Active drag session, if any.
    #[must_use]
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    /// Measured layer sizes.
    #[must_use]
    pub fn sizes(&self) -> &SizeCache {
        &self.sizes
    }

    /// Editor configuration.
    #[must_use]
    pub fn config(&self) -> EditorConfig {
        self.config
    }

    // ------------------------------------------------------------------
    // Layers
    // ------------------------------------------------------------------

    /// Add a text layer at the default position on top of the others and select it.
    pub fn add_text(&mut self, text: impl Into<String>) -> LayerId {
        let id = self.document.add_layer(Layer::text(text));
        self.selected = Some(id);
        tracing::debug!(layer = %id, "Text layer added");
        id
    }

    /// Add an image layer at the default position on top of the others and select it.
    ///
    /// `src` is an already-encoded image reference and is stored as-is.
    pub fn add_image(&mut self, src: impl Into<String>) -> LayerId {
        let id = self.document.add_layer(Layer::image(src));
        self.selected = Some(id);
        tracing::debug!(layer = %id, "Image layer added");
        id
    }

    /// Delete a layer. Clears the selection and ends the drag if they refer to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found.
    pub fn delete_layer(&mut self, id: LayerId) -> LayoutResult<Layer> {
        let layer = self.document.remove_layer(id)?;
        self.sizes.invalidate(id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag.session().is_some_and(|s| s.layer_id() == id) {
            self.end_drag();
        }
        tracing::debug!(layer = %id, "Layer deleted");
        Ok(layer)
    }

    /// Replace the text of a text layer (committed when the editable region loses focus).
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is missing or is not a text layer.
    pub fn set_text(&mut self, id: LayerId, new_text: impl Into<String>) -> LayoutResult<()> {
        let layer = self.document.require_layer_mut(id)?;
        match &mut layer.content {
            LayerContent::Text { text, .. } => *text = new_text.into(),
            LayerContent::Image { .. } => {
                return Err(LayoutError::InvalidOperation(format!(
                    "layer {id} is not a text layer"
                )))
            }
        }
        self.sizes.invalidate(id);
        Ok(())
    }

    /// Edit the style of a text layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is missing or is not a text layer.
    pub fn update_style(
        &mut self,
        id: LayerId,
        edit: impl FnOnce(&mut TextStyle),
    ) -> LayoutResult<()> {
        let layer = self.document.require_layer_mut(id)?;
        match &mut layer.content {
            LayerContent::Text { style, .. } => edit(style),
            LayerContent::Image { .. } => {
                return Err(LayoutError::InvalidOperation(format!(
                    "layer {id} has no text style"
                )))
            }
        }
        self.sizes.invalidate(id);
        Ok(())
    }

    /// Change the width of an image layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is missing, is not an image, or the
    /// width is not a positive finite number.
    pub fn set_image_width(&mut self, id: LayerId, new_width: f32) -> LayoutResult<()> {
        if !new_width.is_finite() || new_width <= 0.0 {
            return Err(LayoutError::InvalidOperation(format!(
                "invalid image width {new_width}"
            )));
        }
        let layer = self.document.require_layer_mut(id)?;
        match &mut layer.content {
            LayerContent::Image { width, .. } => *width = new_width,
            LayerContent::Text { .. } => {
                return Err(LayoutError::InvalidOperation(format!(
                    "layer {id} is not an image layer"
                )))
            }
        }
        self.sizes.invalidate(id);
        Ok(())
    }

    /// Move a layer to an exact position (position panel, keyboard nudges).
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found or the position is not finite.
    pub fn set_position(&mut self, id: LayerId, position: Point) -> LayoutResult<()> {
        self.document.require_layer_mut(id)?.set_position(position)
    }

    /// Select a layer, replacing any previous selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found.
    pub fn select(&mut self, id: LayerId) -> LayoutResult<()> {
        if self.document.layer(id).is_none() {
            return Err(LayoutError::LayerNotFound(id.to_string()));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Raise a layer above all others.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found.
    pub fn bring_to_front(&mut self, id: LayerId) -> LayoutResult<()> {
        self.document.bring_to_front(id)
    }

    /// Lower a layer below all others.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found.
    pub fn send_to_back(&mut self, id: LayerId) -> LayoutResult<()> {
        self.document.send_to_back(id)
    }

    /// Record the rendered size of a layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is unknown or the size is invalid.
    pub fn record_size(&mut self, id: LayerId, size: Size) -> LayoutResult<()> {
        if self.document.layer(id).is_none() {
            return Err(LayoutError::LayerNotFound(id.to_string()));
        }
        self.sizes.record(id, size)
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Rename the document.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.document.name = name.into();
    }

    /// Choose (or clear) the document category.
    pub fn set_category(&mut self, category_id: Option<String>) {
        self.document.category_id = category_id;
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    /// Update the page's top-left corner on screen (after scrolling or layout).
    pub fn set_canvas_origin(&mut self, origin: Point) {
        if origin.is_finite() {
            self.canvas_origin = origin;
        }
    }

    /// The container was resized. Returns `true` if the scale changed.
    pub fn resize_container(&mut self, container: Size, narrow: bool) -> bool {
        let page = self.document.page_size();
        self.viewport.resize(container, narrow, page)
    }

    /// Zoom in one step, disabling auto-fit.
    pub fn zoom_in(&mut self) -> f32 {
        self.viewport.zoom_in()
    }

    /// Zoom out one step, disabling auto-fit.
    pub fn zoom_out(&mut self) -> f32 {
        self.viewport.zoom_out()
    }

    /// Re-enable auto-fit and refit now.
    pub fn fit_to_screen(&mut self) -> bool {
        let page = self.document.page_size();
        self.viewport.fit_to_screen(page)
    }

    /// Set the page orientation, refitting if auto-fit is on.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.document.orientation != orientation {
            self.document.set_orientation(orientation);
            self.viewport.page_changed(self.document.page_size());
        }
    }

    /// Toggle the page orientation, refitting if auto-fit is on. Layers stay put.
    pub fn toggle_orientation(&mut self) -> Orientation {
        let orientation = self.document.toggle_orientation();
        self.viewport.page_changed(self.document.page_size());
        tracing::debug!(?orientation, "Orientation toggled");
        orientation
    }

    /// Convert a screen point into document space.
    #[must_use]
    pub fn to_document(&self, screen: Point) -> Point {
        self.viewport.screen_to_document(screen, self.canvas_origin)
    }

    // ------------------------------------------------------------------
    // Drag
    // ------------------------------------------------------------------

    /// Start dragging a layer grabbed at a screen position. Selects the layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found or the position is not finite.
    pub fn begin_drag(&mut self, id: LayerId, screen: Point) -> LayoutResult<()> {
        let pointer = self.to_document(screen);
        let session = DragSession::begin(&self.document, &self.sizes, id, pointer)?;
        self.selected = Some(id);
        self.guides.clear();
        self.drag = DragState::Dragging(session);
        Ok(())
    }

    /// Move the dragged layer to follow the pointer at a screen position.
    ///
    /// Returns `false` without changing anything when no drag is active,
    /// the pointer is not finite or the dragged layer has not been measured.
    pub fn drag_to(&mut self, screen: Point) -> bool {
        let DragState::Dragging(session) = &self.drag else {
            return false;
        };
        let pointer = self.to_document(screen);
        if !pointer.is_finite() {
            return false;
        }
        let id = session.layer_id();
        let Some(own_size) = self.sizes.size_of(id) else {
            tracing::trace!(layer = %id, "Dragged layer not measured yet; move skipped");
            return false;
        };

        let result = session.resolve(pointer, own_size, self.config.snap_policy);
        let Some(layer) = self.document.layer_mut(id) else {
            return false;
        };
        if layer.set_position(result.position).is_err() {
            return false;
        }
        self.guides = result.guides;
        true
    }

    /// End the drag, keeping the last position. Returns `false` if no drag was active.
    pub fn end_drag(&mut self) -> bool {
        self.guides.clear();
        match std::mem::take(&mut self.drag) {
            DragState::Idle => false,
            DragState::Dragging(session) => {
                tracing::debug!(layer = %session.layer_id(), "Drag ended");
                true
            }
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Route an input event through the drag state machine.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventResponse {
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer),
            InputEvent::Touch(touch) => self.handle_touch(touch),
        }
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> EventResponse {
        match event.phase {
            PointerPhase::Down => self.press(event.position(), event.target),
            PointerPhase::Move => {
                if self.drag_to(event.position()) {
                    EventResponse::HANDLED
                } else {
                    EventResponse::IGNORED
                }
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                if self.end_drag() {
                    EventResponse::HANDLED
                } else {
                    EventResponse::IGNORED
                }
            }
        }
    }

    fn handle_touch(&mut self, event: &TouchEvent) -> EventResponse {
        match event.phase {
            TouchPhase::Start => {
                if event.is_multi_touch() {
                    return EventResponse::IGNORED;
                }
                match event.primary_touch() {
                    Some(touch) => self.press(Point::new(touch.x, touch.y), event.target),
                    None => EventResponse::IGNORED,
                }
            }
            TouchPhase::Move => {
                if !self.is_dragging() {
                    return EventResponse::IGNORED;
                }
                if let Some(touch) = event.primary_touch() {
                    self.drag_to(Point::new(touch.x, touch.y));
                }
                EventResponse {
                    handled: true,
                    prevent_default: event.cancelable,
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                if self.end_drag() {
                    EventResponse::HANDLED
                } else {
                    EventResponse::IGNORED
                }
            }
        }
    }

    fn press(&mut self, screen: Point, target: PointerTarget) -> EventResponse {
        let hit = match target {
            PointerTarget::Layer(id) => Some(id),
            PointerTarget::EditableText(_) => return EventResponse::IGNORED,
            PointerTarget::Background => None,
            PointerTarget::Unresolved => {
                let pointer = self.to_document(screen);
                self.document.layer_at(pointer, &self.sizes)
            }
        };

        match hit {
            Some(id) => match self.begin_drag(id, screen) {
                Ok(()) => EventResponse::HANDLED,
                Err(err) => {
                    tracing::debug!("Drag not started: {err}");
                    EventResponse::IGNORED
                }
            },
            None => {
                self.deselect();
                EventResponse::HANDLED
            }
        }
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Validate the document and hand it to the shell.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Validation`] without calling the shell if the
    /// document has no name or no valid category.
    pub fn save(&mut self, shell: &mut impl EditorShell) -> LayoutResult<()> {
        self.document.validate(&self.categories)?;
        self.end_drag();
        tracing::info!(
            document = %self.document.id,
            layers = self.document.layer_count(),
            "Saving document"
        );
        shell.on_save(&self.document);
        Ok(())
    }

    /// Abandon the session.
    pub fn cancel(&mut self, shell: &mut impl EditorShell) {
        self.end_drag();
        tracing::info!(document = %self.document.id, "Editing cancelled");
        shell.on_cancel();
    }

    /// Consume the editor and return the document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new_document(Vec::new())
    }
}
