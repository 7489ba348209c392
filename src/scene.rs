use std::collections::{BTreeMap, BTreeSet};

use egui::{Pos2, Rect, Vec2};

use crate::surface::{
    ElementId, IndicatorId, IndicatorKind, IndicatorState, Marker, Measured, Motion, Surface,
};

/// Default length of a settle transition, in seconds.
pub const DEFAULT_TRANSITION_SECS: f32 = 0.3;

#[derive(Clone, Debug, PartialEq)]
struct SceneElement {
    selector: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    position: Pos2,
    size: Vec2,
    markers: BTreeSet<Marker>,
    transition: Option<Transition>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Transition {
    from: Pos2,
    to: Pos2,
    elapsed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneIndicator {
    pub kind: IndicatorKind,
    pub rect: Rect,
    pub state: IndicatorState,
}

/// A retained, in-memory [`Surface`]: a tree of rectangular elements.
///
/// Selectors match an element's selector string exactly; the earliest created element wins.
/// Later children paint (and hit test) above earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    root: ElementId,
    elements: BTreeMap<ElementId, SceneElement>,
    indicators: BTreeMap<IndicatorId, SceneIndicator>,
    next_element: u64,
    next_indicator: u64,
    transition_secs: f32,
}

impl Scene {
    pub fn new(size: Vec2) -> Self {
        let root = ElementId(0);
        let mut elements = BTreeMap::new();
        elements.insert(
            root,
            SceneElement {
                selector: ":root".to_owned(),
                parent: None,
                children: Vec::new(),
                position: Pos2::ZERO,
                size,
                markers: BTreeSet::new(),
                transition: None,
            },
        );
        Self {
            root,
            elements,
            indicators: BTreeMap::new(),
            next_element: 1,
            next_indicator: 1,
            transition_secs: DEFAULT_TRANSITION_SECS,
        }
    }

    pub fn with_transition_secs(mut self, secs: f32) -> Self {
        self.transition_secs = secs.max(0.0);
        self
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Add an element under `parent` at `position` (relative to `parent`).
    ///
    /// An unknown parent falls back to the root.
    pub fn add_element(
        &mut self,
        parent: ElementId,
        selector: impl Into<String>,
        position: Pos2,
        size: Vec2,
    ) -> ElementId {
        let parent = if self.elements.contains_key(&parent) {
            parent
        } else {
            self.root
        };
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.elements.insert(
            id,
            SceneElement {
                selector: selector.into(),
                parent: Some(parent),
                children: Vec::new(),
                position,
                size,
                markers: BTreeSet::new(),
                transition: None,
            },
        );
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    pub fn selector(&self, element: ElementId) -> Option<&str> {
        self.elements.get(&element).map(|e| e.selector.as_str())
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.elements.get(&element)?.parent
    }

    pub fn position(&self, element: ElementId) -> Option<Pos2> {
        self.elements.get(&element).map(|e| e.position)
    }

    pub fn markers(&self, element: ElementId) -> impl Iterator<Item = Marker> + '_ {
        self.elements
            .get(&element)
            .into_iter()
            .flat_map(|e| e.markers.iter().copied())
    }

    pub fn is_transitioning(&self, element: ElementId) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|e| e.transition.is_some())
    }

    pub fn indicator(&self, indicator: IndicatorId) -> Option<&SceneIndicator> {
        self.indicators.get(&indicator)
    }

    pub fn indicators(&self) -> impl Iterator<Item = (IndicatorId, &SceneIndicator)> + '_ {
        self.indicators.iter().map(|(id, ind)| (*id, ind))
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators.len()
    }

    fn origin_of(&self, element: ElementId) -> Pos2 {
        let mut origin = Pos2::ZERO;
        let mut cursor = Some(element);
        while let Some(id) = cursor {
            let Some(e) = self.elements.get(&id) else {
                break;
            };
            origin += e.position.to_vec2();
            cursor = e.parent;
        }
        origin
    }

    /// Bounding rect in scene space.
    pub fn rect(&self, element: ElementId) -> Option<Rect> {
        let e = self.elements.get(&element)?;
        Some(Rect::from_min_size(self.origin_of(element), e.size))
    }

    /// Elements in paint order: parents before children, earlier siblings first.
    pub fn paint_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.elements.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(e) = self.elements.get(&id) {
                stack.extend(e.children.iter().rev().copied());
            }
        }
        order
    }

    /// Topmost element under `pos`.
    pub fn element_at(&self, pos: Pos2) -> Option<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|&id| self.rect(id).is_some_and(|r| r.contains(pos)))
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut cursor = Some(element);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    /// Step every running transition by `dt` seconds.
    ///
    /// Returns the elements whose transition finished during this step; feed them back to the
    /// registry as [`crate::InputEvent::TransitionEnd`].
    pub fn advance(&mut self, dt: f32) -> Vec<ElementId> {
        let duration = self.transition_secs;
        let mut ended = Vec::new();
        for (&id, e) in &mut self.elements {
            let Some(transition) = &mut e.transition else {
                continue;
            };
            transition.elapsed += dt.max(0.0);
            let t = if duration > 0.0 {
                (transition.elapsed / duration).min(1.0)
            } else {
                1.0
            };
            if t >= 1.0 {
                e.position = transition.to;
                e.transition = None;
                ended.push(id);
            } else {
                e.position = transition.from.lerp(transition.to, ease_out(t));
            }
        }
        ended
    }
}

fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

impl Surface for Scene {
    fn resolve(&self, selector: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|(_, e)| e.selector == selector)
            .map(|(id, _)| *id)
    }

    fn hits(&self, element: ElementId, pos: Pos2) -> bool {
        self.element_at(pos)
            .is_some_and(|hit| self.is_ancestor_or_self(element, hit))
    }

    fn measure(&self, element: ElementId) -> Option<Measured> {
        let e = self.elements.get(&element)?;
        Some(Measured {
            position: e.position,
            size: e.size,
            rect: self.rect(element)?,
        })
    }

    fn set_position(&mut self, element: ElementId, position: Pos2, motion: Motion) {
        let Some(e) = self.elements.get_mut(&element) else {
            return;
        };
        match motion {
            Motion::Immediate => {
                e.position = position;
                e.transition = None;
            }
            Motion::Animated => {
                e.transition = Some(Transition {
                    from: e.position,
                    to: position,
                    elapsed: 0.0,
                });
            }
        }
    }

    fn finish_transition(&mut self, element: ElementId) {
        if let Some(e) = self.elements.get_mut(&element)
            && let Some(transition) = e.transition.take()
        {
            e.position = transition.to;
        }
    }

    fn reparent(&mut self, element: ElementId, new_parent: ElementId) -> bool {
        if element == self.root
            || !self.elements.contains_key(&element)
            || !self.elements.contains_key(&new_parent)
            || self.is_ancestor_or_self(element, new_parent)
        {
            log::warn!("refusing to reparent {element:?} under {new_parent:?}");
            return false;
        }
        if let Some(old_parent) = self.parent(element)
            && let Some(p) = self.elements.get_mut(&old_parent)
        {
            p.children.retain(|&c| c != element);
        }
        if let Some(p) = self.elements.get_mut(&new_parent) {
            p.children.push(element);
        }
        if let Some(e) = self.elements.get_mut(&element) {
            e.parent = Some(new_parent);
        }
        true
    }

    fn add_marker(&mut self, element: ElementId, marker: Marker) {
        if let Some(e) = self.elements.get_mut(&element) {
            e.markers.insert(marker);
        }
    }

    fn remove_marker(&mut self, element: ElementId, marker: Marker) {
        if let Some(e) = self.elements.get_mut(&element) {
            e.markers.remove(&marker);
        }
    }

    fn has_marker(&self, element: ElementId, marker: Marker) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|e| e.markers.contains(&marker))
    }

    fn create_indicator(&mut self, kind: IndicatorKind, rect: Rect) -> IndicatorId {
        let id = IndicatorId(self.next_indicator);
        self.next_indicator += 1;
        self.indicators.insert(
            id,
            SceneIndicator {
                kind,
                rect,
                state: IndicatorState::Hidden,
            },
        );
        id
    }

    fn set_indicator_state(&mut self, indicator: IndicatorId, state: IndicatorState) {
        if let Some(ind) = self.indicators.get_mut(&indicator) {
            ind.state = state;
        }
    }

    fn remove_indicator(&mut self, indicator: IndicatorId) {
        self.indicators.remove(&indicator);
    }
}

#[cfg(test)]
mod tests {
    use egui::{pos2, vec2};

    use super::*;

    #[test]
    fn rects_follow_the_parent_chain() {
        let mut scene = Scene::new(vec2(800.0, 600.0));
        let panel = scene.add_element(scene.root(), "#panel", pos2(100.0, 50.0), vec2(300.0, 300.0));
        let card = scene.add_element(panel, "#card", pos2(10.0, 20.0), vec2(40.0, 30.0));
        assert_eq!(
            scene.rect(card),
            Some(Rect::from_min_size(pos2(110.0, 70.0), vec2(40.0, 30.0)))
        );
        assert_eq!(scene.resolve("#card"), Some(card));
        assert_eq!(scene.resolve("#missing"), None);
    }

    #[test]
    fn hits_prefer_topmost_and_bubble_to_ancestors() {
        let mut scene = Scene::new(vec2(800.0, 600.0));
        let root = scene.root();
        let below = scene.add_element(root, "#below", pos2(0.0, 0.0), vec2(100.0, 100.0));
        let above = scene.add_element(root, "#above", pos2(50.0, 50.0), vec2(100.0, 100.0));
        let handle = scene.add_element(above, "#handle", pos2(0.0, 0.0), vec2(10.0, 10.0));

        assert_eq!(scene.element_at(pos2(75.0, 75.0)), Some(above));
        assert!(!scene.hits(below, pos2(75.0, 75.0)));
        assert!(scene.hits(above, pos2(55.0, 55.0)));
        assert_eq!(scene.element_at(pos2(55.0, 55.0)), Some(handle));
        assert!(scene.hits(below, pos2(10.0, 10.0)));
    }

    #[test]
    fn animated_moves_report_their_end_once() {
        let mut scene = Scene::new(vec2(800.0, 600.0)).with_transition_secs(0.2);
        let card = scene.add_element(scene.root(), "#card", pos2(100.0, 0.0), vec2(10.0, 10.0));
        scene.set_position(card, pos2(0.0, 0.0), Motion::Animated);

        assert!(scene.advance(0.1).is_empty());
        let mid = scene.position(card).map(|p| p.x);
        assert!(mid.is_some_and(|x| x > 0.0 && x < 100.0), "mid = {mid:?}");

        assert_eq!(scene.advance(0.1), vec![card]);
        assert_eq!(scene.position(card), Some(pos2(0.0, 0.0)));
        assert!(scene.advance(0.1).is_empty());
    }

    #[test]
    fn finish_transition_jumps_to_the_end() {
        let mut scene = Scene::new(vec2(800.0, 600.0));
        let card = scene.add_element(scene.root(), "#card", pos2(100.0, 0.0), vec2(10.0, 10.0));
        scene.set_position(card, pos2(0.0, 40.0), Motion::Animated);
        scene.finish_transition(card);
        assert_eq!(scene.position(card), Some(pos2(0.0, 40.0)));
        assert!(!scene.is_transitioning(card));
    }

    #[test]
    fn reparent_refuses_cycles() {
        let mut scene = Scene::new(vec2(800.0, 600.0));
        let outer = scene.add_element(scene.root(), "#outer", pos2(0.0, 0.0), vec2(100.0, 100.0));
        let inner = scene.add_element(outer, "#inner", pos2(0.0, 0.0), vec2(10.0, 10.0));
        assert!(!scene.reparent(outer, inner));
        assert_eq!(scene.parent(outer), Some(scene.root()));

        let other = scene.add_element(scene.root(), "#other", pos2(200.0, 0.0), vec2(50.0, 50.0));
        assert!(scene.reparent(inner, other));
        assert_eq!(scene.parent(inner), Some(other));
        assert_eq!(scene.rect(inner).map(|r| r.min), Some(pos2(200.0, 0.0)));
    }
}
