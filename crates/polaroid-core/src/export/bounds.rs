//! Bounding box of a rotated rectangle.

/// Compute the dimensions of the bounding box for a rotated rectangle.
///
/// When a rectangle is rotated, its corners extend beyond the original
/// bounds. This returns the smallest whole-pixel box that contains the entire
/// rotated rectangle:
///
/// ```text
/// new_w = |w*cos θ| + |h*sin θ|
/// new_h = |w*sin θ| + |h*cos θ|
/// ```
///
/// Multiples of 90° are exact (no growth, or swapped dimensions). Other
/// angles round up, so the rotated content is never clipped.
///
/// # Arguments
///
/// * `width` - Original width
/// * `height` - Original height
/// * `angle_degrees` - Rotation angle in degrees (sign does not matter)
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    // Normalize angle to handle 360, 720, etc.
    let abs_angle = (angle_degrees % 360.0).abs();

    // Fast path: no rotation needed (including near-zero and multiples of 360)
    if abs_angle < 0.001 || (360.0 - abs_angle).abs() < 0.001 {
        return (width, height);
    }

    // Fast path: exact 90/270 degree rotations (swap dimensions)
    if (abs_angle - 90.0).abs() < 0.001 || (abs_angle - 270.0).abs() < 0.001 {
        return (height, width);
    }

    // Fast path: exact 180 degree rotation (same dimensions)
    if (abs_angle - 180.0).abs() < 0.001 {
        return (width, height);
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // Shave float noise before rounding up so exact sizes don't gain a pixel
    let new_w = (w * cos + h * sin - 1e-6).ceil() as u32;
    let new_h = (w * sin + h * cos - 1e-6).ceil() as u32;

    (new_w.max(1), new_h.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(540, 580, 0.0), (540, 580));
    }

    #[test]
    fn test_90_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(540, 580, 90.0), (580, 540));
        assert_eq!(compute_rotated_bounds(540, 580, -90.0), (580, 540));
    }

    #[test]
    fn test_180_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 180.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, -180.0), (100, 50));
    }

    #[test]
    fn test_270_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 270.0), (50, 100));
    }

    #[test]
    fn test_45_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 100, 45.0);
        // Diagonal of 100x100 square is ~141.4, rounded up
        assert_eq!((w, h), (142, 142));
    }

    #[test]
    fn test_negative_rotation_bounds() {
        let (w1, h1) = compute_rotated_bounds(100, 50, 30.0);
        let (w2, h2) = compute_rotated_bounds(100, 50, -30.0);
        assert_eq!(w1, w2);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_large_rotation_angles() {
        assert_eq!(compute_rotated_bounds(100, 50, 720.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 450.0), (50, 100));
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1.0, 15.0, 45.0, 89.0, 90.0, 135.0, 179.0, 180.0, 270.0, 359.0] {
            let (w, h) = compute_rotated_bounds(10, 10, angle);
            assert!(w > 0, "Width should be > 0 for angle {}", angle);
            assert!(h > 0, "Height should be > 0 for angle {}", angle);
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the box always contains all four rotated corners.
        #[test]
        fn prop_bounds_contain_rotated_corners(
            (w, h) in (1u32..=2000, 1u32..=2000),
            angle in -360.0f64..=360.0,
        ) {
            let (bw, bh) = compute_rotated_bounds(w, h, angle);
            let (s, c) = angle.to_radians().sin_cos();
            let (hw, hh) = (w as f64 / 2.0, h as f64 / 2.0);

            for (x, y) in [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)] {
                let rx = x * c - y * s;
                let ry = x * s + y * c;
                prop_assert!(rx.abs() <= bw as f64 / 2.0 + 1e-3);
                prop_assert!(ry.abs() <= bh as f64 / 2.0 + 1e-3);
            }
        }

        /// Property: the box is never smaller than the original's shorter side.
        #[test]
        fn prop_bounds_at_least_min_side(
            (w, h) in (1u32..=2000, 1u32..=2000),
            angle in -360.0f64..=360.0,
        ) {
            let (bw, bh) = compute_rotated_bounds(w, h, angle);
            prop_assert!(bw >= w.min(h));
            prop_assert!(bh >= w.min(h));
        }
    }
}
