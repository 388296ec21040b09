//! # Urneo Layout Core
//!
//! Geometry and interaction core of the Urneo document template editor.
//! Compiles to WASM for the browser editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               layout-core.wasm              │
//! ├─────────────────────────────────────────────┤
//! │  Document        │  Editor session          │
//! │  - Layers        │  - Selection             │
//! │  - Orientation   │  - Drag state machine    │
//! │  - Validation    │  - Mouse / touch input   │
//! ├─────────────────────────────────────────────┤
//! │  Viewport        │  Snapping                │
//! │  - Auto-fit      │  - Edge / centre align   │
//! │  - Manual zoom   │  - Guide lines           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Layer sizes come from rendering and are reported through
//! [`SizeCache`]; persistence goes through the [`store::Repository`]
//! interface and is never called by the editor itself.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod drag;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod layer;
pub mod measure;
pub mod snap;
pub mod store;
pub mod viewport;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use document::{Category, Document, DocumentId, Orientation};
pub use drag::{DragSession, DragState};
pub use editor::{Editor, EditorConfig, EditorShell};
pub use error::{LayoutError, LayoutResult, ValidationError};
pub use event::{
    EventResponse, InputEvent, PointerEvent, PointerPhase, PointerTarget, TouchEvent, TouchPhase,
    TouchPoint,
};
pub use geometry::{Bounds, Point, Size};
pub use layer::{FontWeight, Layer, LayerContent, LayerId, LayerKind, TextAlign, TextStyle};
pub use measure::{Measure, SizeCache};
pub use snap::{GuideLine, GuideOrientation, SnapPolicy, SnapResult, SnapTarget};
pub use store::{DocumentFilter, DocumentStore, Repository, StoreError};
pub use viewport::Viewport;

/// Layout core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
