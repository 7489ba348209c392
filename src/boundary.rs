use egui::{Pos2, Rect, Vec2};

/// Constrain a proposed top-left position to `boundary`, each axis on its own.
///
/// An axis that stays inside moves freely. An axis that would overshoot stops at the edge, so a
/// fast pointer still docks the element against the boundary. An axis that was already outside
/// (the element started out of bounds, or is larger than the boundary) keeps its previous
/// coordinate. The other axis is unaffected either way.
///
/// Positions are in the same space as `boundary`. With no boundary this is the identity.
pub fn clamp(proposed: Pos2, element_size: Vec2, boundary: Option<Rect>, previous: Pos2) -> Pos2 {
    let Some(boundary) = boundary else {
        return proposed;
    };
    Pos2::new(
        clamp_axis(
            proposed.x,
            previous.x,
            element_size.x,
            boundary.min.x,
            boundary.max.x,
        ),
        clamp_axis(
            proposed.y,
            previous.y,
            element_size.y,
            boundary.min.y,
            boundary.max.y,
        ),
    )
}

fn clamp_axis(proposed: f32, previous: f32, size: f32, min: f32, max: f32) -> f32 {
    let fits = |v: f32| v >= min && v + size <= max;
    if fits(proposed) {
        proposed
    } else if fits(previous) {
        proposed.clamp(min, max - size)
    } else {
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{contains, rect_from_limit};

    #[test]
    fn no_boundary_is_identity() {
        let proposed = Pos2::new(-500.0, 9000.0);
        let out = clamp(proposed, Vec2::splat(20.0), None, Pos2::ZERO);
        assert_eq!(out, proposed);
    }

    #[test]
    fn overshoot_stops_at_the_edge() {
        let boundary = rect_from_limit(0.0, 0.0, 200.0, 200.0);
        let previous = Pos2::new(50.0, 50.0);
        let out = clamp(
            previous + Vec2::new(1000.0, 0.0),
            Vec2::splat(20.0),
            Some(boundary),
            previous,
        );
        assert_eq!(out, Pos2::new(180.0, 50.0));
    }

    #[test]
    fn vertical_violation_still_applies_horizontal_delta() {
        let boundary = rect_from_limit(0.0, 0.0, 200.0, 200.0);
        let previous = Pos2::new(50.0, 180.0);
        let out = clamp(
            Pos2::new(60.0, 195.0),
            Vec2::splat(20.0),
            Some(boundary),
            previous,
        );
        assert_eq!(out, Pos2::new(60.0, 180.0));
    }

    #[test]
    fn out_of_bounds_axis_does_not_jump_inside() {
        let boundary = rect_from_limit(0.0, 0.0, 200.0, 200.0);
        let previous = Pos2::new(250.0, 50.0);
        let out = clamp(
            Pos2::new(240.0, 60.0),
            Vec2::splat(20.0),
            Some(boundary),
            previous,
        );
        assert_eq!(out, Pos2::new(250.0, 60.0));
    }

    #[test]
    fn oversized_element_keeps_its_position() {
        let boundary = rect_from_limit(0.0, 0.0, 50.0, 50.0);
        let previous = Pos2::new(0.0, 0.0);
        let out = clamp(
            Pos2::new(5.0, 5.0),
            Vec2::splat(80.0),
            Some(boundary),
            previous,
        );
        assert_eq!(out, previous);
    }

    #[test]
    fn any_delta_sequence_stays_inside() {
        let boundary = rect_from_limit(10.0, 20.0, 300.0, 150.0);
        let size = Vec2::new(40.0, 25.0);
        let mut pos = Pos2::new(100.0, 60.0);

        // Deterministic pseudo-random walk with large steps.
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let dx = (seed % 161) as f32 - 80.0;
            let dy = ((seed >> 8) % 121) as f32 - 60.0;
            pos = clamp(pos + Vec2::new(dx, dy), size, Some(boundary), pos);
            assert!(
                contains(boundary, Rect::from_min_size(pos, size)),
                "escaped boundary at {pos:?}"
            );
        }
    }
}
