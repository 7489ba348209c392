use egui::Rect;
use itertools::Itertools as _;

use crate::geometry::{center_overlap, is_degenerate};
use crate::options::{SnapOffset, TargetSet};
use crate::surface::{ElementId, IndicatorId, IndicatorKind, IndicatorState, Surface};

/// A declared drop zone.
#[derive(Clone, Debug)]
pub struct TargetZone {
    pub selector: String,
    pub snap_offset: SnapOffset,
    resolved: Option<ResolvedTarget>,
    indicator: Option<IndicatorId>,
    indicator_state: IndicatorState,
}

#[derive(Clone, Copy, Debug)]
struct ResolvedTarget {
    element: ElementId,
    rect: Rect,
}

impl TargetZone {
    fn new(selector: &str, snap_offset: SnapOffset) -> Self {
        Self {
            selector: selector.to_owned(),
            snap_offset,
            resolved: None,
            indicator: None,
            indicator_state: IndicatorState::Hidden,
        }
    }

    /// The live element, as of the last [`TargetRegistry::resolve`].
    pub fn element(&self) -> Option<ElementId> {
        self.resolved.map(|r| r.element)
    }

    pub fn rect(&self) -> Option<Rect> {
        self.resolved.map(|r| r.rect)
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator_state != IndicatorState::Hidden
    }

    pub fn indicator_state(&self) -> IndicatorState {
        self.indicator_state
    }

    fn set_indicator_state(&mut self, surface: &mut dyn Surface, state: IndicatorState) {
        self.indicator_state = state;
        if let Some(indicator) = self.indicator {
            surface.set_indicator_state(indicator, state);
        }
    }

    fn drop_indicator(&mut self, surface: &mut dyn Surface) {
        if let Some(indicator) = self.indicator.take() {
            surface.remove_indicator(indicator);
        }
        self.indicator_state = IndicatorState::Hidden;
    }
}

/// Declared target zones of one session, in declaration order.
#[derive(Clone, Debug)]
pub struct TargetRegistry {
    zones: Vec<TargetZone>,
}

impl TargetRegistry {
    pub fn new(targets: &TargetSet) -> Self {
        Self {
            zones: targets
                .iter()
                .map(|(selector, offset)| TargetZone::new(selector, offset))
                .collect(),
        }
    }

    pub fn zones(&self) -> &[TargetZone] {
        &self.zones
    }

    pub fn get(&self, key: &str) -> Option<&TargetZone> {
        self.zones.iter().find(|z| z.selector == key)
    }

    /// Re-read the geometry of every zone and make sure each live one has an indicator.
    ///
    /// Zones whose selector matches nothing, or whose rect has no area, sit this gesture out.
    /// Returns the number of usable zones.
    pub fn resolve(&mut self, surface: &mut dyn Surface) -> usize {
        for zone in &mut self.zones {
            let resolved = surface.resolve(&zone.selector).and_then(|element| {
                let rect = surface.measure(element)?.rect;
                (!is_degenerate(rect)).then_some(ResolvedTarget { element, rect })
            });

            // The element may have moved or changed since the indicator was made.
            zone.drop_indicator(surface);
            zone.resolved = resolved;

            match resolved {
                Some(target) => {
                    zone.indicator = Some(surface.create_indicator(IndicatorKind::Target, target.rect));
                }
                None => {
                    log::debug!("target {:?} unresolved, skipping it", zone.selector);
                }
            }
        }

        let live = self.zones.iter().filter(|z| z.resolved.is_some()).count();
        log::trace!(
            "resolved targets: [{}]",
            self.zones
                .iter()
                .filter(|z| z.resolved.is_some())
                .map(|z| z.selector.as_str())
                .join(", ")
        );
        live
    }

    /// First declared zone whose rect center-overlaps `source`.
    pub fn nearest_target(&self, source: Rect) -> Option<&TargetZone> {
        self.zones
            .iter()
            .find(|zone| zone.rect().is_some_and(|rect| center_overlap(source, rect)))
    }

    /// Put every live indicator in its baseline "droppable" state.
    pub fn show(&mut self, surface: &mut dyn Surface) {
        for zone in self.zones.iter_mut().filter(|z| z.resolved.is_some()) {
            zone.set_indicator_state(surface, IndicatorState::Visible);
        }
    }

    /// Emphasize exactly the zone `key` (or none) and put every other live zone back to baseline.
    ///
    /// Writes every indicator on each call, whether or not anything changed.
    pub fn highlight(&mut self, surface: &mut dyn Surface, key: Option<&str>) {
        for zone in self.zones.iter_mut().filter(|z| z.resolved.is_some()) {
            let state = if key == Some(zone.selector.as_str()) {
                IndicatorState::Emphasized
            } else {
                IndicatorState::Visible
            };
            zone.set_indicator_state(surface, state);
        }
    }

    pub fn hide(&mut self, surface: &mut dyn Surface) {
        for zone in &mut self.zones {
            zone.set_indicator_state(surface, IndicatorState::Hidden);
        }
    }

    /// Remove every indicator from the surface.
    pub fn release(&mut self, surface: &mut dyn Surface) {
        for zone in &mut self.zones {
            zone.drop_indicator(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use egui::{Pos2, Vec2, pos2, vec2};

    use super::*;
    use crate::scene::Scene;

    fn scene_with_targets() -> (Scene, ElementId, ElementId) {
        let mut scene = Scene::new(vec2(800.0, 600.0));
        let root = scene.root();
        let left = scene.add_element(root, "#left", pos2(100.0, 100.0), Vec2::splat(50.0));
        let right = scene.add_element(root, "#right", pos2(110.0, 100.0), Vec2::splat(50.0));
        (scene, left, right)
    }

    fn targets(keys: &[&str]) -> TargetSet {
        keys.iter().map(|k| (*k, SnapOffset::default())).collect()
    }

    #[test]
    fn tie_goes_to_first_declared() {
        let (mut scene, _, _) = scene_with_targets();
        let source = Rect::from_min_size(Pos2::new(105.0, 100.0), Vec2::splat(50.0));

        let mut registry = TargetRegistry::new(&targets(&["#right", "#left"]));
        registry.resolve(&mut scene);
        assert_eq!(
            registry.nearest_target(source).map(|z| z.selector.as_str()),
            Some("#right")
        );

        let mut registry = TargetRegistry::new(&targets(&["#left", "#right"]));
        registry.resolve(&mut scene);
        assert_eq!(
            registry.nearest_target(source).map(|z| z.selector.as_str()),
            Some("#left")
        );
    }

    #[test]
    fn unresolved_targets_are_skipped_and_retried() {
        let (mut scene, _, _) = scene_with_targets();
        let mut registry = TargetRegistry::new(&targets(&["#later", "#left"]));
        assert_eq!(registry.resolve(&mut scene), 1);
        assert!(registry.get("#later").and_then(TargetZone::element).is_none());
        assert_eq!(scene.indicator_count(), 1);

        let root = scene.root();
        let later = scene.add_element(root, "#later", pos2(400.0, 400.0), Vec2::splat(40.0));
        assert_eq!(registry.resolve(&mut scene), 2);
        assert_eq!(registry.get("#later").and_then(TargetZone::element), Some(later));
        assert_eq!(scene.indicator_count(), 2);
    }

    #[test]
    fn degenerate_targets_are_skipped() {
        let (mut scene, _, _) = scene_with_targets();
        let root = scene.root();
        scene.add_element(root, "#flat", pos2(0.0, 0.0), vec2(30.0, 0.0));
        let mut registry = TargetRegistry::new(&targets(&["#flat"]));
        assert_eq!(registry.resolve(&mut scene), 0);
        let source = Rect::from_min_size(Pos2::ZERO, Vec2::splat(30.0));
        assert!(registry.nearest_target(source).is_none());
    }

    #[test]
    fn highlight_emphasizes_exactly_one() {
        let (mut scene, _, _) = scene_with_targets();
        let mut registry = TargetRegistry::new(&targets(&["#left", "#right"]));
        registry.resolve(&mut scene);
        registry.show(&mut scene);

        registry.highlight(&mut scene, Some("#right"));
        let states: Vec<IndicatorState> =
            registry.zones().iter().map(TargetZone::indicator_state).collect();
        assert_eq!(states, [IndicatorState::Visible, IndicatorState::Emphasized]);

        registry.highlight(&mut scene, None);
        assert!(
            registry
                .zones()
                .iter()
                .all(|z| z.indicator_state() == IndicatorState::Visible)
        );

        registry.release(&mut scene);
        assert_eq!(scene.indicator_count(), 0);
        assert!(registry.zones().iter().all(|z| !z.indicator_visible()));
    }
}
