//! Document layers - the positionable building blocks of a page.

use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{LayoutError, LayoutResult, Point};

/// Position given to newly created layers.
pub const DEFAULT_LAYER_POSITION: Point = Point::new(50.0, 50.0);

/// Width given to newly created image layers.
pub const DEFAULT_IMAGE_WIDTH: f32 = 200.0;

/// Unique identifier for a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(Uuid);

impl LayerId {
    /// Create a new unique layer ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a layer ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font weight of a text layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Horizontal alignment of text within its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left aligned.
    #[default]
    Left,
    /// Centred.
    Center,
    /// Right aligned.
    Right,
}

/// Styling of a text layer. Has no influence on snapping beyond the
/// measured size it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in pixels.
    #[serde(deserialize_with = "positive_f32")]
    pub font_size: f32,
    /// CSS font family.
    pub font_family: String,
    /// Font weight.
    pub font_weight: FontWeight,
    /// Italic flag.
    pub italic: bool,
    /// Underline flag.
    pub underline: bool,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Text color as hex.
    pub color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_family: "Arial".to_string(),
            font_weight: FontWeight::Normal,
            italic: false,
            underline: false,
            align: TextAlign::Left,
            color: "#000000".to_string(),
        }
    }
}

/// What a layer displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerContent {
    /// A block of styled text.
    Text {
        /// Displayed string.
        text: String,
        /// Text styling.
        #[serde(default)]
        style: TextStyle,
    },

    /// An image. Height follows from the image's aspect ratio.
    Image {
        /// Image reference: a URL or an embedded data string. Treated opaquely.
        src: String,
        /// Explicit width in pixels.
        #[serde(deserialize_with = "positive_f32")]
        width: f32,
    },
}

/// Variant tag of a layer's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Text layer.
    Text,
    /// Image layer.
    Image,
}

/// A positionable visual element on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier, stable for the lifetime of the layer.
    pub id: LayerId,
    /// Layer content.
    pub content: LayerContent,
    /// Top-left corner in document space.
    #[serde(deserialize_with = "finite_point")]
    position: Point,
    /// Paint and hit-test priority; higher paints on top.
    pub z_index: i32,
}

impl Layer {
    /// Create a layer with the given content at the default position.
    #[must_use]
    pub fn new(content: LayerContent) -> Self {
        Self {
            id: LayerId::new(),
            content,
            position: DEFAULT_LAYER_POSITION,
            z_index: 0,
        }
    }

    /// Create a text layer with default styling.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(LayerContent::Text {
            text: text.into(),
            style: TextStyle::default(),
        })
    }

    /// Create an image layer with the default width.
    #[must_use]
    pub fn image(src: impl Into<String>) -> Self {
        Self::new(LayerContent::Image {
            src: src.into(),
            width: DEFAULT_IMAGE_WIDTH,
        })
    }

    /// Set the position. Non-finite coordinates are replaced with the default position.
    #[must_use]
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = if position.is_finite() {
            position
        } else {
            DEFAULT_LAYER_POSITION
        };
        self
    }

    /// Set the z-index.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Top-left corner in document space.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Move the layer.
    ///
    /// # Errors
    ///
    /// Returns an error if either coordinate is NaN or infinite; the
    /// position is left unchanged.
    pub fn set_position(&mut self, position: Point) -> LayoutResult<()> {
        if !position.is_finite() {
            return Err(LayoutError::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Variant tag of the content.
    #[must_use]
    pub fn kind(&self) -> LayerKind {
        match self.content {
            LayerContent::Text { .. } => LayerKind::Text,
            LayerContent::Image { .. } => LayerKind::Image,
        }
    }

    /// Text style, if this is a text layer.
    #[must_use]
    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.content {
            LayerContent::Text { style, .. } => Some(style),
            LayerContent::Image { .. } => None,
        }
    }
}

/// Out-of-range numbers such as `1e39` parse as infinity; reject them so
/// a stored layer always serializes back to valid JSON.
fn finite_point<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Point, D::Error> {
    let point = Point::deserialize(deserializer)?;
    if point.is_finite() {
        Ok(point)
    } else {
        Err(de::Error::custom(format!(
            "non-finite position ({}, {})",
            point.x, point.y
        )))
    }
}

fn finite_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    let value = f32::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom(format!("non-finite number {value}")))
    }
}

fn positive_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    let value = finite_f32(deserializer)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(de::Error::custom(format!("expected a positive size, got {value}")))
    }
}
