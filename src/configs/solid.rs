//! Single-color configuration.

use ducky_lighting::{Color, Config, ConfigLayer, LightingScheme};

/// Lights every key with one fixed color.
pub struct SolidConfig {
    pub color: Color,
}

impl SolidConfig {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Config for SolidConfig {
    fn layers(&self) -> Vec<ConfigLayer> {
        vec![ConfigLayer::new(LightingScheme::solid(self.color))]
    }
}
