//! Per-frame animation drivers shared by the models.

use aviator_kernel::{NodeId, SceneError, SceneGraph};
use std::f32::consts::TAU;

/// Rotation axis of a node's Euler angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// How a spun angle is stored after the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulate {
    /// Let the angle grow without bound.
    Unbounded,
    /// Keep the angle in `[0, 2π)`.
    Wrapped,
}

/// Advance a phase by `step`, keeping it in `[0, 2π)`.
pub fn advance_phase(phase: f32, step: f32) -> f32 {
    (phase + step).rem_euclid(TAU)
}

/// Vertical scale of hair strand `strand` at hair phase `phase`.
///
/// Always within `[0.5, 1.0]`.
pub fn hair_scale(phase: f32, strand: usize) -> f32 {
    0.75 + 0.25 * (phase + strand as f32 / 3.0).cos()
}

/// Add `delta` to one rotation axis of `node` and return the new angle.
pub fn spin(
    scene: &mut SceneGraph,
    node: NodeId,
    axis: Axis,
    delta: f32,
    mode: Accumulate,
) -> Result<f32, SceneError> {
    let rotation = &mut scene.transform_mut(node)?.rotation;
    let angle = match axis {
        Axis::X => &mut rotation.x,
        Axis::Y => &mut rotation.y,
        Axis::Z => &mut rotation.z,
    };
    *angle = match mode {
        Accumulate::Unbounded => *angle + delta,
        Accumulate::Wrapped => advance_phase(*angle, delta),
    };
    Ok(*angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviator_common::Transform;

    #[test]
    fn phase_wraps_into_full_turn() {
        let p = advance_phase(TAU - 0.1, 0.3);
        assert!((p - 0.2).abs() < 1e-5);
        assert!(advance_phase(0.0, 0.16) > 0.0);
        for i in 0..10_000 {
            let p = advance_phase(i as f32 * 0.16, 0.16);
            assert!((0.0..TAU).contains(&p));
        }
    }

    #[test]
    fn hair_scale_is_bounded() {
        for i in 0..400 {
            let phase = i as f32 * 0.16;
            for k in 0..12 {
                let s = hair_scale(phase, k);
                assert!((0.5..=1.0).contains(&s), "phase {phase} strand {k}: {s}");
            }
        }
        assert_eq!(hair_scale(0.0, 0), 1.0);
    }

    #[test]
    fn unbounded_spin_accumulates() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn("sea", Transform::default(), None);
        for _ in 0..2000 {
            spin(&mut scene, id, Axis::Z, 0.005, Accumulate::Unbounded).unwrap();
        }
        let z = scene.transform(id).unwrap().rotation.z;
        assert!((z - 10.0).abs() < 1e-2);
    }

    #[test]
    fn wrapped_spin_stays_in_turn() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn("propeller", Transform::default(), None);
        let mut last = 0.0;
        for _ in 0..100 {
            last = spin(&mut scene, id, Axis::X, 0.3, Accumulate::Wrapped).unwrap();
        }
        assert!((0.0..TAU).contains(&last));
        assert!((last - (30.0_f32).rem_euclid(TAU)).abs() < 1e-3);
        assert_eq!(scene.transform(id).unwrap().rotation.y, 0.0);
    }
}
