//! The flame / starlight / blue-press configuration.
//!
//! Five layers, bottom first: a warm flame gradient swept across the
//! board, a noise flicker subtracted from it, a dampening gradient, a
//! starlight twinkle over the function row and space bar, and a blue
//! reactive press layer on top.

use ducky_lighting::builders::column_gradient_map;
use ducky_lighting::{
    Color, CombineType, Config, ConfigLayer, Gradient, GradientKeyPoint, LightingError,
    LightingScheme, Mask, NoisePalette,
};

/// How often a starlight sample lands in the lit tail of the ramp.
const STARLIGHT_CHANCE: f64 = 0.125;

pub struct FlameStarlightConfig {
    layers: Vec<ConfigLayer>,
}

impl FlameStarlightConfig {
    pub fn new() -> Result<Self, LightingError> {
        Ok(Self {
            layers: vec![
                Self::flame_base()?,
                Self::flame_flicker()?,
                Self::flame_dampen()?,
                Self::starlight()?,
                Self::reactive_blue()?,
            ],
        })
    }

    fn flame_base() -> Result<ConfigLayer, LightingError> {
        let gradient = Gradient::hsv(vec![
            GradientKeyPoint::new(Color::new(255, 175, 0), 1.0),
            GradientKeyPoint::new(Color::new(255, 0, 0), 0.0),
        ])?;
        Ok(ConfigLayer::new(LightingScheme::per_key(
            column_gradient_map(&gradient),
        )))
    }

    fn flame_flicker() -> Result<ConfigLayer, LightingError> {
        let gradient = Gradient::rgb(vec![
            GradientKeyPoint::new(Color::new(0, 0, 0), 0.0),
            GradientKeyPoint::new(Color::new(127, 127, 127), 1.0),
        ])?;
        let palette = NoisePalette::new(gradient, 0.1, 120.0, 0.0);
        Ok(ConfigLayer::new(LightingScheme::noise(palette)).combine(CombineType::Subtract))
    }

    fn flame_dampen() -> Result<ConfigLayer, LightingError> {
        let gradient = Gradient::rgb(vec![
            GradientKeyPoint::new(Color::new(180, 180, 180), 0.0),
            GradientKeyPoint::new(Color::new(130, 130, 175), 0.1),
            GradientKeyPoint::new(Color::new(0, 0, 0), 1.0),
        ])?;
        Ok(
            ConfigLayer::new(LightingScheme::per_key(column_gradient_map(&gradient)))
                .combine(CombineType::Subtract),
        )
    }

    fn starlight() -> Result<ConfigLayer, LightingError> {
        let gradient = Gradient::rgb(vec![
            GradientKeyPoint::new(Color::new(0, 0, 0), 0.0),
            GradientKeyPoint::new(Color::new(0, 0, 0), 1.0 - STARLIGHT_CHANCE),
            GradientKeyPoint::new(Color::new(100, 25, 127), 1.0 - STARLIGHT_CHANCE),
            GradientKeyPoint::new(Color::new(200, 50, 255), 1.0),
        ])?;
        let palette = NoisePalette::new(gradient, 0.05, 115.0, 0.0);
        Ok(ConfigLayer::new(LightingScheme::noise(palette))
            .mask(Mask::function_row().union(&Mask::new(["Space"]))))
    }

    fn reactive_blue() -> Result<ConfigLayer, LightingError> {
        Ok(ConfigLayer::new(LightingScheme::reactive(
            LightingScheme::solid(Color::new(80, 0, 255)),
            0.4,
        )?))
    }
}

impl Config for FlameStarlightConfig {
    fn layers(&self) -> Vec<ConfigLayer> {
        self.layers.clone()
    }
}
