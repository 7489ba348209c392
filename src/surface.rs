use egui::{Pos2, Rect, Vec2};

/// Identifies an element living in a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

/// Identifies an indicator (boundary outline or target cue) created through a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndicatorId(pub u64);

/// Presentation markers the drag engine puts on a draggable element.
///
/// Styling them is up to the surface; the engine only reads [`Marker::Dragging`] back as the
/// duplicate pointer-down guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    /// The element is registered as draggable.
    Source,

    /// A gesture is in progress.
    Dragging,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorKind {
    /// Outline of the movement boundary.
    Boundary,

    /// "You can drop here" cue drawn over a target zone.
    Target,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndicatorState {
    #[default]
    Hidden,
    Visible,
    Emphasized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Apply the position now.
    Immediate,

    /// Let the surface transition towards the position. The surface reports the end through
    /// [`crate::InputEvent::TransitionEnd`].
    Animated,
}

/// Geometry of an element read in one go, before anything is written back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measured {
    /// Top-left corner relative to the element's parent.
    pub position: Pos2,

    pub size: Vec2,

    /// Bounding rect in surface space.
    pub rect: Rect,
}

/// Everything the drag engine reads from or writes to the rendering environment.
///
/// Positions are relative to the element's parent; rects are in surface space.
pub trait Surface {
    /// Resolve a selector to a live element, if one exists right now.
    fn resolve(&self, selector: &str) -> Option<ElementId>;

    /// True if a pointer press at `pos` lands on `element` (or on something inside it).
    fn hits(&self, element: ElementId, pos: Pos2) -> bool;

    fn measure(&self, element: ElementId) -> Option<Measured>;

    fn set_position(&mut self, element: ElementId, position: Pos2, motion: Motion);

    /// Jump any transition of `element` to its final geometry.
    fn finish_transition(&mut self, element: ElementId);

    /// Move `element` under `new_parent`, keeping its parent-relative position.
    ///
    /// Returns `false` and leaves the tree untouched if the surface refuses the move.
    fn reparent(&mut self, element: ElementId, new_parent: ElementId) -> bool;

    fn add_marker(&mut self, element: ElementId, marker: Marker);

    fn remove_marker(&mut self, element: ElementId, marker: Marker);

    fn has_marker(&self, element: ElementId, marker: Marker) -> bool;

    /// Create an indicator covering `rect` (surface space), initially [`IndicatorState::Hidden`].
    fn create_indicator(&mut self, kind: IndicatorKind, rect: Rect) -> IndicatorId;

    fn set_indicator_state(&mut self, indicator: IndicatorId, state: IndicatorState);

    fn remove_indicator(&mut self, indicator: IndicatorId);
}
