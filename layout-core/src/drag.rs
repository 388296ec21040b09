//! Drag sessions.
//!
//! A session lives from pointer-down to pointer-up on one layer. Sibling
//! boxes are snapshotted once at the start; nothing else moves while a
//! drag is in progress.

use serde::{Deserialize, Serialize};

use crate::measure::{bounds_of, Measure};
use crate::snap::{snap, SnapPolicy, SnapResult, SnapTarget};
use crate::{Bounds, Document, LayerId, LayoutError, LayoutResult, Point, Size};

/// State of one drag interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    layer_id: LayerId,
    /// Pointer position minus the layer's top-left corner, in document space.
    grab_offset: Point,
    targets: Vec<SnapTarget>,
}

impl DragSession {
    /// Start dragging `layer_id` with the pointer at `pointer` (document space).
    ///
    /// Every other layer with a known size becomes a snap target.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer does not exist or the pointer is not finite.
    pub fn begin(
        document: &Document,
        measure: &impl Measure,
        layer_id: LayerId,
        pointer: Point,
    ) -> LayoutResult<Self> {
        if !pointer.is_finite() {
            return Err(LayoutError::NonFinitePosition {
                x: pointer.x,
                y: pointer.y,
            });
        }
        let layer = document
            .layer(layer_id)
            .ok_or_else(|| LayoutError::LayerNotFound(layer_id.to_string()))?;

        let targets: Vec<SnapTarget> = document
            .layers()
            .iter()
            .filter(|l| l.id != layer_id)
            .filter_map(|l| bounds_of(l, measure).map(|bounds| SnapTarget { id: l.id, bounds }))
            .collect();

        let grab_offset = pointer.offset_from(layer.position());
        tracing::debug!(
            layer = %layer_id,
            targets = targets.len(),
            "Drag started"
        );

        Ok(Self {
            layer_id,
            grab_offset,
            targets,
        })
    }

    /// Layer being dragged.
    #[must_use]
    pub fn layer_id(&self) -> LayerId {
        self.layer_id
    }

    /// Offset from the layer's top-left corner to the grab point.
    #[must_use]
    pub fn grab_offset(&self) -> Point {
        self.grab_offset
    }

    /// Sibling boxes captured at drag start.
    #[must_use]
    pub fn targets(&self) -> &[SnapTarget] {
        &self.targets
    }

    /// Unsnapped top-left position for a pointer at `pointer` (document space).
    #[must_use]
    pub fn candidate(&self, pointer: Point) -> Point {
        pointer.offset_from(self.grab_offset)
    }

    /// Snapped position for a pointer at `pointer`, given the dragged layer's size.
    #[must_use]
    pub fn resolve(&self, pointer: Point, own_size: Size, policy: SnapPolicy) -> SnapResult {
        let candidate = Bounds::new(self.candidate(pointer), own_size);
        snap(candidate, &self.targets, policy)
    }
}

/// Whether a drag is in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A layer is being dragged.
    Dragging(DragSession),
}

impl DragState {
    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}
