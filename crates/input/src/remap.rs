use crate::pointer::PointerPosition;
use aviator_common::{FlightEnvelope, Span};
use glam::Vec2;

/// Clamp `v` into `[src_min, src_max]` and rescale it linearly onto
/// `[dst_min, dst_max]`.
///
/// A degenerate source span maps every input to `dst_min`.
pub fn normalize(v: f32, src_min: f32, src_max: f32, dst_min: f32, dst_max: f32) -> f32 {
    let src_span = src_max - src_min;
    if src_span == 0.0 {
        return dst_min;
    }
    let clamped = v.max(src_min).min(src_max);
    let t = (clamped - src_min) / src_span;
    dst_min + t * (dst_max - dst_min)
}

fn unit_to(v: f32, range: Span) -> f32 {
    normalize(v, -1.0, 1.0, range.min, range.max)
}

/// Where the airplane should fly for a given pointer position.
pub fn flight_target(pointer: PointerPosition, envelope: &FlightEnvelope) -> Vec2 {
    Vec2::new(unit_to(pointer.x, envelope.x), unit_to(pointer.y, envelope.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rescales_linearly() {
        assert_eq!(normalize(0.0, -1.0, 1.0, -100.0, 100.0), 0.0);
        assert_eq!(normalize(0.5, -1.0, 1.0, 25.0, 175.0), 137.5);
        assert_eq!(normalize(-1.0, -1.0, 1.0, 25.0, 175.0), 25.0);
        assert_eq!(normalize(1.0, -1.0, 1.0, 25.0, 175.0), 175.0);
    }

    #[test]
    fn normalize_clamps_out_of_range_input() {
        assert_eq!(normalize(5.0, -1.0, 1.0, -100.0, 100.0), 100.0);
        assert_eq!(normalize(-5.0, -1.0, 1.0, -100.0, 100.0), -100.0);
    }

    #[test]
    fn normalize_degenerate_source_maps_to_dst_min() {
        assert_eq!(normalize(3.0, 2.0, 2.0, 10.0, 20.0), 10.0);
        assert!(normalize(0.0, 0.0, 0.0, -1.0, 1.0).is_finite());
    }

    #[test]
    fn normalize_is_monotone() {
        let mut last = f32::NEG_INFINITY;
        for i in -200..=200 {
            let v = normalize(i as f32 / 100.0, -1.0, 1.0, 25.0, 175.0);
            assert!(v >= last);
            assert!((25.0..=175.0).contains(&v));
            last = v;
        }
    }

    #[test]
    fn flight_target_spans_the_envelope() {
        let envelope = FlightEnvelope::default();
        assert_eq!(
            flight_target(PointerPosition::new(-1.0, -1.0), &envelope),
            Vec2::new(-100.0, 25.0)
        );
        assert_eq!(
            flight_target(PointerPosition::new(1.0, 1.0), &envelope),
            Vec2::new(100.0, 175.0)
        );
        assert_eq!(
            flight_target(PointerPosition::default(), &envelope),
            Vec2::new(0.0, 100.0)
        );
    }
}
