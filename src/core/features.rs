//! Fingertip angle features.
//!
//! Each hand is reduced to five angles, one per fingertip, measured at the
//! wrist between the wrist→middle-finger-base direction and the
//! wrist→fingertip direction. Using angles rather than raw positions makes
//! the vector independent of hand size and of where the hand sits in the
//! image.

use crate::domain::model::{
    AngleVector, HandLandmarks, Landmark, FINGERTIPS, FINGER_COUNT, MIDDLE_MCP, WRIST,
};

/// Angle in radians between two vectors, in `[0, π]`.
///
/// Uses cos(θ) = â · b̂ on the unit vectors, so large finite coordinates
/// do not overflow. A zero-length vector has no direction, so the angle is
/// reported as 0.
pub fn vector_angle(a: &Landmark, b: &Landmark) -> f64 {
    let (norm_a, norm_b) = (a.norm(), b.norm());
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cos_angle = a.divided_by(norm_a).dot(&b.divided_by(norm_b));
    if !cos_angle.is_finite() {
        return 0.0;
    }

    // 浮點誤差可能讓 cos 略超出 [-1, 1]
    cos_angle.clamp(-1.0, 1.0).acos()
}

/// Extract the five fingertip angles, thumb to pinky.
pub fn finger_angles(landmarks: &HandLandmarks) -> AngleVector {
    let wrist = landmarks[WRIST];
    let reference = landmarks[MIDDLE_MCP] - wrist;

    let mut angles = [0.0; FINGER_COUNT];
    for (angle, tip) in angles.iter_mut().zip(FINGERTIPS) {
        let tip_vec = landmarks[tip] - wrist;
        *angle = vector_angle(&reference, &tip_vec);
    }

    AngleVector::new(angles)
}
