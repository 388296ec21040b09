//! WebAssembly bindings for layout-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! The browser shell forwards DOM measurements and pointer events here and
//! renders whatever the editor reports back.

use wasm_bindgen::prelude::*;

use crate::{
    Category, Document, Editor, InputEvent, LayerId, Orientation, Point, PointerEvent,
    PointerPhase, PointerTarget, Size, TextStyle, TouchEvent, TouchPhase,
};

/// Initialize the layout WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor over a blank document.
    ///
    /// # Errors
    ///
    /// Returns an error string if the categories JSON is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(categories_json: &str) -> Result<WasmEditor, String> {
        let categories: Vec<Category> =
            serde_json::from_str(categories_json).map_err(|e| e.to_string())?;
        Ok(Self {
            editor: Editor::new_document(categories),
        })
    }

    /// Replace the session with a document serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, json: &str) -> Result<(), String> {
        let document = Document::from_json(json).map_err(|e| e.to_string())?;
        let categories = self.editor.categories().to_vec();
        let config = self.editor.config();
        self.editor = Editor::new(document, categories).with_config(config);
        Ok(())
    }

    /// Get the current document as JSON.
    #[wasm_bindgen(js_name = getDocumentJson)]
    #[must_use]
    pub fn get_document_json(&self) -> String {
        self.editor.document().to_json().unwrap_or_default()
    }

    /// Validate the document for saving; returns the validation message or `undefined`.
    #[wasm_bindgen(js_name = validate)]
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        self.editor
            .document()
            .validate(self.editor.categories())
            .err()
            .map(|e| e.to_string())
    }

    /// Add a text layer, returning its ID.
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&mut self, text: &str) -> String {
        self.editor.add_text(text).to_string()
    }

    /// Add an image layer from an encoded image reference, returning its ID.
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self, src: &str) -> String {
        self.editor.add_image(src).to_string()
    }

    /// Delete a layer.
    ///
    /// # Errors
    ///
    /// Returns an error string if the ID is invalid or unknown.
    #[wasm_bindgen(js_name = deleteLayer)]
    pub fn delete_layer(&mut self, id: &str) -> Result<(), String> {
        let id = parse_id(id)?;
        self.editor.delete_layer(id).map(|_| ()).map_err(|e| e.to_string())
    }

    /// Commit edited text of a text layer.
    ///
    /// # Errors
    ///
    /// Returns an error string if the ID is invalid or not a text layer.
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, id: &str, text: &str) -> Result<(), String> {
        let id = parse_id(id)?;
        self.editor.set_text(id, text).map_err(|e| e.to_string())
    }

    /// Replace the style of a text layer with a serialized `TextStyle`.
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error string if the ID or JSON is invalid or the layer is not text.
    #[wasm_bindgen(js_name = updateStyle)]
    pub fn update_style(&mut self, id: &str, style_json: &str) -> Result<(), String> {
        let id = parse_id(id)?;
        let style: TextStyle = serde_json::from_str(style_json).map_err(|e| e.to_string())?;
        self.editor
            .update_style(id, |current| *current = style)
            .map_err(|e| e.to_string())
    }

    /// Change the width of an image layer.
    ///
    /// # Errors
    ///
    /// Returns an error string if the ID is invalid, the layer is not an
    /// image or the width is not positive.
    #[wasm_bindgen(js_name = setImageWidth)]
    pub fn set_image_width(&mut self, id: &str, width: f32) -> Result<(), String> {
        let id = parse_id(id)?;
        self.editor.set_image_width(id, width).map_err(|e| e.to_string())
    }

    /// Move a layer to an exact document position.
    ///
    /// # Errors
    ///
    /// Returns an error string if the ID is invalid or the position is not finite.
    #[wasm_bindgen(js_name = setPosition)]
    pub fn set_position(&mut self, id: &str, x: f32, y: f32) -> Result<(), String> {
        let id = parse_id(id)?;
        self.editor
            .set_position(id, Point::new(x, y))
            .map_err(|e| e.to_string())
    }

    /// Raise a layer above all others.
    ///
    /// # Errors
    ///
    /// Returns an error string if the ID is invalid or unknown.
    #[wasm_bindgen(js_name = bringToFront)]
    pub fn bring_to_front(&mut self, id: &str) -> Result<(), String> {
        let id = parse_id(id)?;
        self.editor.bring_to_front(id).map_err(|e| e.to_string())
    }

    /// Lower a layer below all others.
    ///
    /// # Errors
    ///
    /// Returns an error string if the ID is invalid or unknown.
    #[wasm_bindgen(js_name = sendToBack)]
    pub fn send_to_back(&mut self, id: &str) -> Result<(), String> {
        let id = parse_id(id)?;
        self.editor.send_to_back(id).map_err(|e| e.to_string())
    }

    /// Select a layer.
    ///
    /// # Errors
    ///
    /// Returns an error string if the ID is invalid or unknown.
    #[wasm_bindgen(js_name = select)]
    pub fn select(&mut self, id: &str) -> Result<(), String> {
        let id = parse_id(id)?;
        self.editor.select(id).map_err(|e| e.to_string())
    }

    /// Clear the selection.
    #[wasm_bindgen(js_name = deselect)]
    pub fn deselect(&mut self) {
        self.editor.deselect();
    }

    /// Rename the document.
    #[wasm_bindgen(js_name = setName)]
    pub fn set_name(&mut self, name: &str) {
        self.editor.set_name(name);
    }

    /// Choose the document category; `undefined` or an empty string clears it.
    #[wasm_bindgen(js_name = setCategory)]
    pub fn set_category(&mut self, category_id: Option<String>) {
        self.editor.set_category(category_id.filter(|c| !c.is_empty()));
    }

    /// Report a layer's rendered size.
    ///
    /// # Errors
    ///
    /// Returns an error string if the ID is invalid or the size is rejected.
    #[wasm_bindgen(js_name = recordSize)]
    pub fn record_size(&mut self, id: &str, width: f32, height: f32) -> Result<(), String> {
        let id = parse_id(id)?;
        self.editor
            .record_size(id, Size::new(width, height))
            .map_err(|e| e.to_string())
    }

    /// Report the page's top-left corner on screen.
    #[wasm_bindgen(js_name = setCanvasOrigin)]
    pub fn set_canvas_origin(&mut self, x: f32, y: f32) {
        self.editor.set_canvas_origin(Point::new(x, y));
    }

    /// Report the container size; returns the current scale.
    #[wasm_bindgen(js_name = resizeContainer)]
    pub fn resize_container(&mut self, width: f32, height: f32, narrow: bool) -> f32 {
        self.editor.resize_container(Size::new(width, height), narrow);
        self.editor.scale()
    }

    /// Zoom in one step; returns the new scale.
    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> f32 {
        self.editor.zoom_in()
    }

    /// Zoom out one step; returns the new scale.
    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> f32 {
        self.editor.zoom_out()
    }

    /// Re-enable auto-fit; returns the current scale.
    #[wasm_bindgen(js_name = fitToScreen)]
    pub fn fit_to_screen(&mut self) -> f32 {
        self.editor.fit_to_screen();
        self.editor.scale()
    }

    /// Toggle orientation; returns `true` for landscape.
    #[wasm_bindgen(js_name = toggleOrientation)]
    pub fn toggle_orientation(&mut self) -> bool {
        self.editor.toggle_orientation() == Orientation::Landscape
    }

    /// Current scale.
    #[wasm_bindgen(js_name = getScale)]
    #[must_use]
    pub fn get_scale(&self) -> f32 {
        self.editor.scale()
    }

    /// Selected layer ID, if any.
    #[wasm_bindgen(js_name = getSelected)]
    #[must_use]
    pub fn get_selected(&self) -> Option<String> {
        self.editor.selected().map(|id| id.to_string())
    }

    /// Active guide lines as JSON.
    #[wasm_bindgen(js_name = getGuidesJson)]
    #[must_use]
    pub fn get_guides_json(&self) -> String {
        serde_json::to_string(self.editor.guides()).unwrap_or_default()
    }

    /// Mouse down on a layer (`layer_id`), an edited text region
    /// (`editing = true`) or the background (`layer_id` undefined).
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        layer_id: Option<String>,
        editing: bool,
    ) -> bool {
        let target = resolve_target(layer_id.as_deref(), editing);
        let event = PointerEvent::new(PointerPhase::Down, x, y).with_target(target);
        self.editor.handle_event(&InputEvent::Pointer(event)).handled
    }

    /// Mouse move.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let event = PointerEvent::new(PointerPhase::Move, x, y);
        self.editor.handle_event(&InputEvent::Pointer(event)).handled
    }

    /// Mouse up or pointer cancel.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> bool {
        self.editor.end_drag()
    }

    /// Single touch start.
    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, x: f32, y: f32, layer_id: Option<String>, editing: bool) -> bool {
        let target = resolve_target(layer_id.as_deref(), editing);
        let event = TouchEvent::single(TouchPhase::Start, x, y).with_target(target);
        self.editor.handle_event(&InputEvent::Touch(event)).handled
    }

    /// Touch move; returns whether the shell must call `preventDefault()`.
    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&mut self, x: f32, y: f32, cancelable: bool) -> bool {
        let event = TouchEvent::single(TouchPhase::Move, x, y).with_cancelable(cancelable);
        self.editor
            .handle_event(&InputEvent::Touch(event))
            .prevent_default
    }

    /// Touch end or cancel.
    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self) -> bool {
        self.editor.end_drag()
    }
}

fn parse_id(id: &str) -> Result<LayerId, String> {
    LayerId::parse(id).map_err(|e| e.to_string())
}

fn resolve_target(layer_id: Option<&str>, editing: bool) -> PointerTarget {
    match layer_id.map(LayerId::parse) {
        Some(Ok(id)) if editing => PointerTarget::EditableText(id),
        Some(Ok(id)) => PointerTarget::Layer(id),
        Some(Err(_)) => PointerTarget::Unresolved,
        None => PointerTarget::Background,
    }
}
