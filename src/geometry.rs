use egui::{Pos2, Rect, Vec2};

/// Build a rect from the `{top, left, width, height}` shape used by drag options.
///
/// Negative extents are kept as-is: [`is_degenerate`] reports them, and neither [`contains`]
/// nor [`center_overlap`] ever matches a degenerate rect.
pub fn rect_from_limit(top: f32, left: f32, width: f32, height: f32) -> Rect {
    Rect::from_min_size(Pos2::new(left, top), Vec2::new(width, height))
}

/// Zero, negative or non-finite area.
pub fn is_degenerate(rect: Rect) -> bool {
    !(rect.min.is_finite() && rect.max.is_finite()) || !(rect.width() > 0.0 && rect.height() > 0.0)
}

/// True iff `inner` lies entirely within `outer`, edges inclusive.
pub fn contains(outer: Rect, inner: Rect) -> bool {
    if is_degenerate(outer) || is_degenerate(inner) {
        return false;
    }
    inner.min.x >= outer.min.x
        && inner.min.y >= outer.min.y
        && inner.max.x <= outer.max.x
        && inner.max.y <= outer.max.y
}

/// Center-distance overlap: on each axis the distance between the centers must be strictly
/// smaller than the sum of the half-extents.
///
/// This is not an edge intersection test. Rects touching at an edge do not overlap.
pub fn center_overlap(a: Rect, b: Rect) -> bool {
    if is_degenerate(a) || is_degenerate(b) {
        return false;
    }
    let distance = (a.center() - b.center()).abs();
    let reach = (a.size() + b.size()) * 0.5;
    distance.x < reach.x && distance.y < reach.y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(top: f32, left: f32, width: f32, height: f32) -> Rect {
        rect_from_limit(top, left, width, height)
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let outer = r(0.0, 0.0, 200.0, 200.0);
        assert!(contains(outer, r(0.0, 0.0, 200.0, 200.0)));
        assert!(contains(outer, r(50.0, 180.0, 20.0, 20.0)));
        assert!(!contains(outer, r(50.0, 181.0, 20.0, 20.0)));
        assert!(!contains(outer, r(-1.0, 0.0, 20.0, 20.0)));
    }

    #[test]
    fn center_overlap_requires_both_axes() {
        let a = r(0.0, 0.0, 20.0, 20.0);
        assert!(center_overlap(a, r(10.0, 10.0, 20.0, 20.0)));
        // Close on X, far on Y.
        assert!(!center_overlap(a, r(100.0, 5.0, 20.0, 20.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = r(0.0, 0.0, 20.0, 20.0);
        let b = r(0.0, 20.0, 20.0, 20.0);
        assert!(!center_overlap(a, b));
    }

    #[test]
    fn degenerate_rects_never_match() {
        let outer = r(0.0, 0.0, 100.0, 100.0);
        let negative = r(10.0, 10.0, -5.0, 5.0);
        let empty = r(10.0, 10.0, 0.0, 0.0);
        assert!(is_degenerate(negative));
        assert!(is_degenerate(empty));
        assert!(!contains(outer, negative));
        assert!(!contains(outer, empty));
        assert!(!center_overlap(outer, negative));
        assert!(!center_overlap(empty, outer));
    }
}
