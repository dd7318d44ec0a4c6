//! RGB color triple shared by every material format.

use glam::DVec3;

/// Channel weights used to collapse a color into a single gray value.
/// Applied to x, y, z in that order.
pub const GRAY_WEIGHTS: DVec3 = DVec3::new(0.1140, 0.5870, 0.2989);

/// Three floating-point channels. Values are not clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub DVec3);

impl Color {
    pub const WHITE: Self = Self(DVec3::ONE);
    pub const BLACK: Self = Self(DVec3::ZERO);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    /// Weighted sum of the channels (see [`GRAY_WEIGHTS`]).
    pub fn gray(&self) -> f64 {
        self.0.dot(GRAY_WEIGHTS)
    }

    pub fn to_array(&self) -> [f64; 3] {
        self.0.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn white_is_nearly_full_gray() {
        assert_abs_diff_eq!(Color::WHITE.gray(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn black_is_zero_gray() {
        assert_eq!(Color::BLACK.gray(), 0.0);
    }

    #[test]
    fn gray_weights_follow_channel_order() {
        assert_abs_diff_eq!(Color::new(1.0, 0.0, 0.0).gray(), 0.1140);
        assert_abs_diff_eq!(Color::new(0.0, 1.0, 0.0).gray(), 0.5870);
        assert_abs_diff_eq!(Color::new(0.0, 0.0, 1.0).gray(), 0.2989);
    }

    #[test]
    fn channels_keep_their_order() {
        let color = Color::new(1.0, 0.5, 0.25);
        assert_eq!(color.to_array(), [1.0, 0.5, 0.25]);
        assert_eq!(color.0.y, 0.5);
    }
}
