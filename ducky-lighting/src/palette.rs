//! Noise palette: the tuning bundle for noise-field schemes.

use crate::color::{Color, Gradient};

/// Gradient plus sampling parameters for a noise-field scheme.
///
/// The gradient's key points are expected on `[0, 1]`; field samples
/// are folded to a proportion and mapped through it.
#[derive(Debug, Clone)]
pub struct NoisePalette {
    pub gradient: Gradient,
    /// Higher speed shifts colors faster.
    pub speed: f64,
    /// How "zoomed out" the field is: lower scale means bigger blobs.
    pub scale: f64,
    /// Frame-to-frame smoothing on `[0, 1]`, reduces artifacts at low
    /// speeds.
    pub smoothing: f64,
}

impl NoisePalette {
    pub fn new(gradient: Gradient, speed: f64, scale: f64, smoothing: f64) -> Self {
        Self {
            gradient,
            speed,
            scale,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Palette with the usual speed/scale defaults.
    pub fn with_defaults(gradient: Gradient) -> Self {
        Self::new(gradient, 0.1, 120.0, 0.0)
    }

    /// Color at a span proportion in `[0, 1]`.
    pub fn color_at(&self, proportion: f64) -> Color {
        let t = self.gradient.t_min() + proportion.clamp(0.0, 1.0) * self.gradient.span();
        self.gradient.color_at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::GradientKeyPoint;

    #[test]
    fn smoothing_is_clamped() {
        let g = Gradient::rgb(vec![
            GradientKeyPoint::new(Color::BLACK, 0.0),
            GradientKeyPoint::new(Color::WHITE, 1.0),
        ])
        .unwrap();
        let p = NoisePalette::new(g, 0.1, 120.0, 7.0);
        assert_eq!(p.smoothing, 1.0);
    }

    #[test]
    fn proportion_maps_over_the_span() {
        let g = Gradient::rgb(vec![
            GradientKeyPoint::new(Color::BLACK, 2.0),
            GradientKeyPoint::new(Color::WHITE, 4.0),
        ])
        .unwrap();
        let p = NoisePalette::with_defaults(g);
        assert_eq!(p.color_at(0.0), Color::BLACK);
        assert_eq!(p.color_at(1.0), Color::WHITE);
        assert_eq!(p.color_at(0.5), Color::new(128, 128, 128));
    }
}
