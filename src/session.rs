use egui::{Pos2, Rect, Vec2};

use crate::boundary::clamp;
use crate::geometry::{contains, is_degenerate};
use crate::hooks::{DragHooks, DragOutcome};
use crate::options::{DragMode, DragOptions};
use crate::registry::DragHandle;
use crate::surface::{
    ElementId, IndicatorId, IndicatorKind, IndicatorState, Marker, Measured, Motion, Surface,
};
use crate::targets::TargetRegistry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settle {
    /// Docked into a target.
    Snap,

    /// Travelling back to the gesture origin.
    Return,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,

    /// Waiting for the surface to finish the settle transition. Nothing but the element's
    /// position depends on it; a new pointer-down is accepted right away.
    Settling(Settle),
}

/// Drag state of one draggable element.
///
/// Created by [`crate::DragRegistry::activate`], driven by the registry's event dispatch.
#[derive(Debug)]
pub struct DragSession {
    handle: DragHandle,
    mode: DragMode,
    element: ElementId,

    /// Relative to the element's parent.
    boundary: Option<Rect>,
    boundary_indicator: Option<IndicatorId>,
    return_on_release: bool,

    phase: DragPhase,
    pointer_active: bool,
    last_pointer: Option<Pos2>,
    origin_position: Pos2,

    targets: Option<TargetRegistry>,
    active_target: Option<String>,
}

impl DragSession {
    /// Commit phase of activation: `measured` was read before anything was written to `surface`.
    pub(crate) fn new(
        handle: DragHandle,
        element: ElementId,
        options: &DragOptions,
        measured: Measured,
        surface: &mut dyn Surface,
    ) -> Self {
        let boundary = options.limit.map(|l| l.to_rect()).filter(|rect| {
            let usable = !is_degenerate(*rect);
            if !usable {
                log::warn!("ignoring degenerate drag boundary {rect:?} for {element:?}");
            }
            usable
        });

        // The outline is only offered when the element starts inside its boundary.
        let boundary_indicator = boundary
            .filter(|b| contains(*b, Rect::from_min_size(measured.position, measured.size)))
            .map(|b| {
                let parent_origin = measured.rect.min - measured.position;
                surface.create_indicator(IndicatorKind::Boundary, b.translate(parent_origin))
            });

        let targets = (options.mode == DragMode::SnapToTarget)
            .then(|| TargetRegistry::new(&options.targets));

        surface.add_marker(element, Marker::Source);

        Self {
            handle,
            mode: options.mode,
            element,
            boundary,
            boundary_indicator,
            return_on_release: options.return_on_release,
            phase: DragPhase::Idle,
            pointer_active: false,
            last_pointer: None,
            origin_position: measured.position,
            targets,
            active_target: None,
        }
    }

    pub fn handle(&self) -> DragHandle {
        self.handle
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn boundary(&self) -> Option<Rect> {
        self.boundary
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_pointer_active(&self) -> bool {
        self.pointer_active
    }

    /// Only meaningful while the pointer is active.
    pub fn last_pointer(&self) -> Option<Pos2> {
        self.last_pointer
    }

    pub fn origin_position(&self) -> Pos2 {
        self.origin_position
    }

    pub fn active_target_key(&self) -> Option<&str> {
        self.active_target.as_deref()
    }

    pub fn targets(&self) -> Option<&TargetRegistry> {
        self.targets.as_ref()
    }

    fn set_boundary_indicator(&self, surface: &mut dyn Surface, state: IndicatorState) {
        if let Some(indicator) = self.boundary_indicator {
            surface.set_indicator_state(indicator, state);
        }
    }

    /// Idle/Settling -> Dragging. Returns false if the press was ignored.
    pub fn pointer_down(
        &mut self,
        surface: &mut dyn Surface,
        hooks: &mut dyn DragHooks,
        pos: Pos2,
    ) -> bool {
        if self.pointer_active || surface.has_marker(self.element, Marker::Dragging) {
            log::trace!("{:?}: ignoring duplicate pointer-down", self.handle);
            return false;
        }
        let Some(measured) = surface.measure(self.element) else {
            log::debug!("{:?}: element {:?} is gone", self.handle, self.element);
            return false;
        };

        // Freeze any settle transition where it is; the new gesture starts from there.
        surface.set_position(self.element, measured.position, Motion::Immediate);
        surface.add_marker(self.element, Marker::Dragging);

        self.pointer_active = true;
        self.last_pointer = Some(pos);
        self.origin_position = measured.position;
        self.phase = DragPhase::Dragging;
        self.active_target = None;

        if self
            .boundary
            .is_some_and(|b| contains(b, Rect::from_min_size(measured.position, measured.size)))
        {
            self.set_boundary_indicator(surface, IndicatorState::Visible);
        }

        if let Some(targets) = &mut self.targets {
            targets.resolve(surface);
            targets.show(surface);
        }

        log::debug!(
            "{:?}: drag start at {pos:?}, origin {:?}",
            self.handle,
            self.origin_position
        );
        hooks.on_drag_start(self.element);
        true
    }

    /// Move by the pointer's travel since the last event, subject to the boundary.
    pub fn pointer_move(&mut self, surface: &mut dyn Surface, hooks: &mut dyn DragHooks, pos: Pos2) {
        if !self.pointer_active {
            return;
        }
        let Some(last) = self.last_pointer else {
            return;
        };
        // Track real pointer travel even when the element is held back by the boundary,
        // so the element never lags behind the pointer after leaving an edge.
        self.last_pointer = Some(pos);

        let Some(measured) = surface.measure(self.element) else {
            return;
        };
        let delta: Vec2 = pos - last;
        let proposed = measured.position + delta;
        let position = clamp(proposed, measured.size, self.boundary, measured.position);
        if position != measured.position {
            surface.set_position(self.element, position, Motion::Immediate);
        }
        hooks.on_drag_move(self.element, position);

        let Some(targets) = &mut self.targets else {
            return;
        };
        let source = measured.rect.translate(position - measured.position);
        let nearest = targets.nearest_target(source).map(|z| z.selector.clone());
        if nearest != self.active_target {
            if let Some(old) = &self.active_target {
                hooks.on_target_leave(old);
            }
            if let Some(new) = &nearest {
                hooks.on_target_enter(new);
            }
            self.active_target = nearest;
        }
        targets.highlight(surface, self.active_target.as_deref());
    }

    /// Dragging -> Settling / Idle. `None` for an unmatched release.
    pub fn pointer_up(
        &mut self,
        surface: &mut dyn Surface,
        hooks: &mut dyn DragHooks,
    ) -> Option<DragOutcome> {
        if !self.pointer_active {
            log::trace!("{:?}: ignoring unmatched pointer-up", self.handle);
            return None;
        }
        self.pointer_active = false;
        self.last_pointer = None;
        surface.remove_marker(self.element, Marker::Dragging);
        self.set_boundary_indicator(surface, IndicatorState::Hidden);

        let active = self.active_target.take();
        if let Some(key) = &active {
            hooks.on_target_leave(key);
        }

        let snap = active.and_then(|key| {
            let zone = self.targets.as_ref()?.get(&key)?;
            Some((key, zone.element()?, zone.snap_offset.to_vec2().to_pos2()))
        });

        if let Some(targets) = &mut self.targets {
            targets.hide(surface);
        }

        // A refused reparent falls through to the return path.
        let snap = snap.filter(|(key, target, _)| {
            let accepted = surface.reparent(self.element, *target);
            if !accepted {
                log::warn!(
                    "{:?}: cannot move {:?} into target {key:?}, returning it",
                    self.handle,
                    self.element
                );
            }
            accepted
        });

        let outcome = match snap {
            Some((key, _, position)) => {
                surface.set_position(self.element, position, Motion::Immediate);
                self.phase = DragPhase::Settling(Settle::Snap);
                DragOutcome::Snapped { key, position }
            }
            None if self.mode == DragMode::SnapToTarget || self.return_on_release => {
                surface.set_position(self.element, self.origin_position, Motion::Animated);
                self.phase = DragPhase::Settling(Settle::Return);
                DragOutcome::Returned {
                    origin: self.origin_position,
                }
            }
            None => {
                self.phase = DragPhase::Idle;
                DragOutcome::Dropped {
                    position: surface
                        .measure(self.element)
                        .map_or(self.origin_position, |m| m.position),
                }
            }
        };

        log::debug!("{:?}: drag end, {outcome:?}", self.handle);
        hooks.on_drag_end(self.element, &outcome);
        Some(outcome)
    }

    /// Settling -> Idle.
    pub fn transition_end(&mut self) {
        if matches!(self.phase, DragPhase::Settling(_)) {
            self.phase = DragPhase::Idle;
        }
    }

    /// Undo everything the session put on the surface, except completed moves.
    pub(crate) fn teardown(&mut self, surface: &mut dyn Surface) {
        surface.finish_transition(self.element);
        surface.remove_marker(self.element, Marker::Dragging);
        surface.remove_marker(self.element, Marker::Source);
        if let Some(indicator) = self.boundary_indicator.take() {
            surface.remove_indicator(indicator);
        }
        if let Some(targets) = &mut self.targets {
            targets.release(surface);
        }
        self.pointer_active = false;
        self.last_pointer = None;
        self.active_target = None;
        self.phase = DragPhase::Idle;
    }
}
