//! Measured layer sizes.
//!
//! A layer's width and height come from rendering (text reflow, image
//! decode), not from the document. The shell reports them here whenever
//! they change so the geometry code never touches a render tree.

use std::collections::HashMap;

use crate::{Bounds, Layer, LayerId, LayoutError, LayoutResult, Size};

/// Source of rendered layer sizes.
pub trait Measure {
    /// Current rendered size of a layer, or `None` if it has not been measured.
    fn size_of(&self, id: LayerId) -> Option<Size>;
}

impl<M: Measure + ?Sized> Measure for &M {
    fn size_of(&self, id: LayerId) -> Option<Size> {
        (**self).size_of(id)
    }
}

/// Bounding box of a layer, if its size is known.
#[must_use]
pub fn bounds_of(layer: &Layer, measure: &impl Measure) -> Option<Bounds> {
    measure
        .size_of(layer.id)
        .map(|size| Bounds::new(layer.position(), size))
}

/// Cache of the last reported size of each layer.
#[derive(Debug, Clone, Default)]
pub struct SizeCache {
    sizes: HashMap<LayerId, Size>,
}

impl SizeCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly measured size.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidMeasurement`] for negative or
    /// non-finite sizes; the previous entry is kept.
    pub fn record(&mut self, id: LayerId, size: Size) -> LayoutResult<()> {
        if !size.is_valid() {
            tracing::warn!(
                "Rejected measurement for layer {id}: {}x{}",
                size.width,
                size.height
            );
            return Err(LayoutError::InvalidMeasurement {
                id: id.to_string(),
                width: size.width,
                height: size.height,
            });
        }
        self.sizes.insert(id, size);
        Ok(())
    }

    /// Forget a layer's size, e.g. after its content changed and before it reflows.
    pub fn invalidate(&mut self, id: LayerId) -> Option<Size> {
        self.sizes.remove(&id)
    }

    /// Forget every size.
    pub fn clear(&mut self) {
        self.sizes.clear();
    }

    /// Number of measured layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether nothing has been measured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl Measure for SizeCache {
    fn size_of(&self, id: LayerId) -> Option<Size> {
        self.sizes.get(&id).copied()
    }
}
