use egui::{Align2, Color32, CornerRadius, FontId, Painter, Rect, Shape, Stroke, StrokeKind, Vec2};

use crate::scene::{Scene, SceneIndicator};
use crate::surface::{IndicatorKind, IndicatorState, Marker, Surface as _};

/// Colors and strokes for [`paint_scene`].
#[derive(Clone, Debug)]
pub struct SceneStyle {
    pub element_fill: Color32,
    pub element_stroke: Stroke,

    /// Extra fill on top of `element_fill` for elements that can be dragged.
    pub source_fill: Color32,

    pub dragging_fill: Color32,
    pub dragging_shadow: Color32,

    pub boundary_stroke: Stroke,

    /// Dash and gap length of the boundary outline.
    pub boundary_dash: (f32, f32),

    pub target_fill: Color32,
    pub target_stroke: Stroke,
    pub target_emphasis_fill: Color32,
    pub target_emphasis_stroke: Stroke,

    /// Draw each element's selector in its center.
    pub show_labels: bool,
    pub label_color: Color32,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            element_fill: Color32::from_gray(60),
            element_stroke: Stroke::new(1.0, Color32::from_gray(110)),
            source_fill: Color32::from_rgba_unmultiplied(0xd6, 0xe1, 0xe6, 0x20),
            dragging_fill: Color32::from_rgba_unmultiplied(0xd6, 0xe1, 0xe6, 0x36),
            dragging_shadow: Color32::from_rgba_unmultiplied(0xe4, 0xe4, 0xe4, 0x60),
            boundary_stroke: Stroke::new(1.0, Color32::from_gray(0x99)),
            boundary_dash: (6.0, 4.0),
            target_fill: Color32::from_rgba_unmultiplied(0x4c, 0x9a, 0xff, 0x18),
            target_stroke: Stroke::new(1.0, Color32::from_rgb(0x4c, 0x9a, 0xff)),
            target_emphasis_fill: Color32::from_rgba_unmultiplied(0x4c, 0x9a, 0xff, 0x48),
            target_emphasis_stroke: Stroke::new(2.0, Color32::from_rgb(0x8c, 0xc0, 0xff)),
            show_labels: true,
            label_color: Color32::from_gray(220),
        }
    }
}

/// Paint `scene` with its top-left at `offset` in `painter` space.
///
/// Boundary outlines go below the elements, target cues above them.
pub fn paint_scene(painter: &Painter, scene: &Scene, offset: Vec2, style: &SceneStyle) {
    let visible_indicators = || {
        scene
            .indicators()
            .map(|(_, ind)| ind)
            .filter(|ind| ind.state != IndicatorState::Hidden)
    };

    for ind in visible_indicators().filter(|ind| ind.kind == IndicatorKind::Boundary) {
        paint_boundary(painter, ind.rect.translate(offset), style);
    }

    for id in scene.paint_order() {
        if id == scene.root() {
            continue;
        }
        let Some(rect) = scene.rect(id).map(|r| r.translate(offset)) else {
            continue;
        };
        let radius = CornerRadius::same(2);

        let dragging = scene.has_marker(id, Marker::Dragging);
        if dragging {
            painter.rect_filled(rect.translate(Vec2::new(0.0, 1.0)), radius, style.dragging_shadow);
        }
        painter.rect_filled(rect, radius, style.element_fill);
        if dragging {
            painter.rect_filled(rect, radius, style.dragging_fill);
        } else if scene.has_marker(id, Marker::Source) {
            painter.rect_filled(rect, radius, style.source_fill);
        }
        painter.rect_stroke(rect, radius, style.element_stroke, StrokeKind::Inside);

        if style.show_labels
            && let Some(selector) = scene.selector(id)
        {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                selector,
                FontId::proportional(12.0),
                style.label_color,
            );
        }
    }

    for ind in visible_indicators().filter(|ind| ind.kind == IndicatorKind::Target) {
        paint_target(painter, ind, offset, style);
    }
}

fn paint_boundary(painter: &Painter, rect: Rect, style: &SceneStyle) {
    let (dash, gap) = style.boundary_dash;
    let outline = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    painter.extend(Shape::dashed_line(&outline, style.boundary_stroke, dash, gap));
}

fn paint_target(painter: &Painter, ind: &SceneIndicator, offset: Vec2, style: &SceneStyle) {
    let rect = ind.rect.translate(offset);
    let (fill, stroke) = if ind.state == IndicatorState::Emphasized {
        (style.target_emphasis_fill, style.target_emphasis_stroke)
    } else {
        (style.target_fill, style.target_stroke)
    };
    painter.rect_filled(rect, CornerRadius::same(2), fill);
    painter.rect_stroke(rect, CornerRadius::same(2), stroke, StrokeKind::Inside);
}

#[cfg(test)]
mod tests {
    use egui::{LayerId, Pos2, pos2, vec2};

    use super::*;

    fn shape_count(scene: &Scene) -> usize {
        let ctx = egui::Context::default();
        let raw = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))),
            ..Default::default()
        };
        ctx.begin_pass(raw);
        let painter = ctx.layer_painter(LayerId::background());
        let style = SceneStyle {
            show_labels: false,
            ..Default::default()
        };
        paint_scene(&painter, scene, Vec2::ZERO, &style);
        ctx.end_pass().shapes.len()
    }

    #[test]
    fn hidden_indicators_are_not_painted() {
        let mut scene = Scene::new(vec2(800.0, 600.0));
        scene.add_element(scene.root(), "#card", pos2(10.0, 10.0), vec2(40.0, 40.0));
        let baseline = shape_count(&scene);
        assert!(baseline > 0, "elements must be painted");

        let boundary = scene.create_indicator(
            IndicatorKind::Boundary,
            Rect::from_min_size(Pos2::ZERO, vec2(200.0, 200.0)),
        );
        assert_eq!(shape_count(&scene), baseline);

        scene.set_indicator_state(boundary, IndicatorState::Visible);
        assert!(shape_count(&scene) > baseline);
    }
}
