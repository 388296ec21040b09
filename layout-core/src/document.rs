//! Documents: a page of layers plus template metadata.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::measure::{bounds_of, Measure};
use crate::{Layer, LayerId, LayoutError, LayoutResult, Point, Size, ValidationError};

/// Page width in pixels for a portrait A4 page at 96 DPI.
pub const PAGE_WIDTH: f32 = 794.0;

/// Page height in pixels for a portrait A4 page at 96 DPI.
pub const PAGE_HEIGHT: f32 = 1123.0;

/// Unique identifier for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Create a new unique document ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a document ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl Orientation {
    /// Native page size for this orientation.
    #[must_use]
    pub const fn page_size(self) -> Size {
        match self {
            Self::Portrait => Size::new(PAGE_WIDTH, PAGE_HEIGHT),
            Self::Landscape => Size::new(PAGE_HEIGHT, PAGE_WIDTH),
        }
    }

    /// The other orientation.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Portrait => Self::Landscape,
            Self::Landscape => Self::Portrait,
        }
    }
}

/// A document category (e.g. "Parte", "Poděkování").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Category {
    /// Create a category.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An editable document template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier. Generated when missing.
    #[serde(default)]
    pub id: DocumentId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Selected category.
    #[serde(default)]
    pub category_id: Option<String>,
    /// Page orientation.
    #[serde(default)]
    pub orientation: Orientation,
    /// Layers in insertion order. Paint order follows `z_index`.
    #[serde(default)]
    layers: Vec<Layer>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// Create an empty portrait document.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            name: name.into(),
            category_id: None,
            orientation: Orientation::Portrait,
            layers: Vec::new(),
        }
    }

    /// Create a document from existing layers, keeping their z-indices.
    #[must_use]
    pub fn with_layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = layers;
        self
    }

    /// Set the orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Native page size for the current orientation.
    #[must_use]
    pub fn page_size(&self) -> Size {
        self.orientation.page_size()
    }

    /// Change the orientation. Layer positions are left as they are.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Switch between portrait and landscape, returning the new orientation.
    pub fn toggle_orientation(&mut self) -> Orientation {
        self.orientation = self.orientation.toggled();
        self.orientation
    }

    /// Append a layer on top of all others.
    pub fn add_layer(&mut self, mut layer: Layer) -> LayerId {
        layer.z_index = self.top_z_index().map_or(0, |z| z.saturating_add(1));
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    /// Remove a layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found.
    pub fn remove_layer(&mut self, id: LayerId) -> LayoutResult<Layer> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| LayoutError::LayerNotFound(id.to_string()))?;
        Ok(self.layers.remove(index))
    }

    /// Get a layer by ID.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Get a mutable reference to a layer by ID.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Get a layer or fail with [`LayoutError::LayerNotFound`].
    pub(crate) fn require_layer_mut(&mut self, id: LayerId) -> LayoutResult<&mut Layer> {
        self.layer_mut(id)
            .ok_or_else(|| LayoutError::LayerNotFound(id.to_string()))
    }

    /// All layers in insertion order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layers sorted for painting: ascending z-index, insertion order on ties.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut ordered: Vec<&Layer> = self.layers.iter().collect();
        ordered.sort_by_key(|l| l.z_index);
        ordered
    }

    /// Topmost measured layer containing the given document-space point.
    #[must_use]
    pub fn layer_at(&self, point: Point, measure: &impl Measure) -> Option<LayerId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|l| bounds_of(l, measure).is_some_and(|b| b.contains(point)))
            .map(|l| l.id)
    }

    /// Raise a layer above all others.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found.
    pub fn bring_to_front(&mut self, id: LayerId) -> LayoutResult<()> {
        let top = self.top_z_index().unwrap_or(0);
        let shared = self.count_at_z(top) > 1;
        let layer = self.require_layer_mut(id)?;
        if layer.z_index < top || shared {
            layer.z_index = top.saturating_add(1);
        }
        Ok(())
    }

    /// Lower a layer below all others.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found.
    pub fn send_to_back(&mut self, id: LayerId) -> LayoutResult<()> {
        let bottom = self.layers.iter().map(|l| l.z_index).min().unwrap_or(0);
        let shared = self.count_at_z(bottom) > 1;
        let layer = self.require_layer_mut(id)?;
        if layer.z_index > bottom || shared {
            layer.z_index = bottom.saturating_sub(1);
        }
        Ok(())
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Check if the document has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Check that the document can be saved against the given category set.
    ///
    /// # Errors
    ///
    /// Returns the first failed rule: empty name, missing category, then
    /// unknown category.
    pub fn validate(&self, categories: &[Category]) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let category_id = self
            .category_id
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(ValidationError::MissingCategory)?;
        if !categories.iter().any(|c| c.id == category_id) {
            return Err(ValidationError::UnknownCategory(category_id.to_string()));
        }
        Ok(())
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> LayoutResult<String> {
        serde_json::to_string(self).map_err(LayoutError::Serialization)
    }

    /// Deserialize a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        serde_json::from_str(json).map_err(LayoutError::Serialization)
    }

    fn top_z_index(&self) -> Option<i32> {
        self.layers.iter().map(|l| l.z_index).max()
    }

    fn count_at_z(&self, z: i32) -> usize {
        self.layers.iter().filter(|l| l.z_index == z).count()
    }
}
