//! Pointer-driven draggable elements for egui.
//!
//! A [`DragRegistry`] turns elements of a [`Surface`] into drag sessions: they follow the
//! pointer, stay inside an optional boundary, and in [`DragMode::SnapToTarget`] either dock into
//! the first declared target zone they are released over or travel back to where the gesture
//! started. [`Scene`] is a ready-made in-memory surface that [`paint_scene`] draws with egui.
#![forbid(unsafe_code)]

pub mod boundary;
pub mod error;
pub mod geometry;
pub mod hooks;
pub mod input;
pub mod options;
pub mod paint;
pub mod registry;
pub mod scene;
pub mod session;
pub mod surface;
pub mod targets;


pub use error::ActivateError;
pub use hooks::{DragHooks, DragOutcome};
pub use input::{InputEvent, collect_input_events};
pub use options::{DragMode, DragOptions, Limit, RegistryOptions, SnapOffset, TargetSet};
pub use paint::{SceneStyle, paint_scene};
pub use registry::{DragHandle, DragRegistry, SubscriptionToken};
pub use scene::Scene;
pub use session::{DragPhase, DragSession, Settle};
pub use surface::{
    ElementId, IndicatorId, IndicatorKind, IndicatorState, Marker, Measured, Motion, Surface,
};
pub use targets::{TargetRegistry, TargetZone};
