use egui::Pos2;

use crate::surface::ElementId;

/// How a gesture ended.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    /// Free mode: the element stays at `position`.
    Dropped { position: Pos2 },

    /// Docked into target `key` at `position` (relative to the target). The session is gone.
    Snapped { key: String, position: Pos2 },

    /// Heading back to the gesture origin. The session stays bound.
    Returned { origin: Pos2 },
}

/// Presentation callbacks. Every method defaults to doing nothing.
///
/// Positions are relative to the element's parent.
pub trait DragHooks {
    fn on_drag_start(&mut self, element: ElementId) {
        let _ = element;
    }

    fn on_drag_move(&mut self, element: ElementId, position: Pos2) {
        let _ = (element, position);
    }

    fn on_drag_end(&mut self, element: ElementId, outcome: &DragOutcome) {
        let _ = (element, outcome);
    }

    fn on_target_enter(&mut self, key: &str) {
        let _ = key;
    }

    fn on_target_leave(&mut self, key: &str) {
        let _ = key;
    }
}

impl DragHooks for () {}
