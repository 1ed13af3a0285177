//! The configuration contract: an explicit, ordered layer builder.
//!
//! A [`Config`] declares its layers in the order they should composite;
//! [`Config::get_scheme`] appends them to a fresh [`CombiningScheme`]
//! in exactly that order. Nothing else ever derives layer ordering.

use std::sync::Arc;

use crate::mask::Mask;
use crate::scheme::{CombineType, CombiningScheme, LightingScheme};

/// One declared layer: scheme, blend rule, key subset.
///
/// Clones share the scheme instance, so reactive state and hook
/// identity survive the copy.
#[derive(Clone)]
pub struct ConfigLayer {
    pub scheme: Arc<LightingScheme>,
    pub combine: CombineType,
    pub mask: Mask,
}

impl ConfigLayer {
    /// An Overlay layer over the whole board.
    pub fn new(scheme: LightingScheme) -> Self {
        Self {
            scheme: Arc::new(scheme),
            combine: CombineType::Overlay,
            mask: Mask::all(),
        }
    }

    pub fn combine(mut self, combine: CombineType) -> Self {
        self.combine = combine;
        self
    }

    pub fn mask(mut self, mask: Mask) -> Self {
        self.mask = mask;
        self
    }
}

/// A named lighting configuration.
pub trait Config {
    /// The layers, bottom first. Order is compositing order.
    fn layers(&self) -> Vec<ConfigLayer>;

    /// Build the combining scheme by appending the declared layers in
    /// order.
    fn get_scheme(&self) -> CombiningScheme {
        let mut scheme = CombiningScheme::new();
        for layer in self.layers() {
            scheme.add_scheme(layer.scheme, layer.combine, layer.mask);
        }
        scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    struct TwoLayer;

    impl Config for TwoLayer {
        fn layers(&self) -> Vec<ConfigLayer> {
            vec![
                ConfigLayer::new(LightingScheme::solid(Color::new(10, 0, 0))),
                ConfigLayer::new(LightingScheme::solid(Color::new(5, 0, 0)))
                    .combine(CombineType::Add)
                    .mask(Mask::new(["A"])),
            ]
        }
    }

    #[test]
    fn scheme_preserves_declaration_order() {
        let scheme = TwoLayer.get_scheme();
        assert_eq!(scheme.layers().len(), 2);
        assert_eq!(scheme.layers()[0].combine, CombineType::Overlay);
        assert_eq!(scheme.layers()[1].combine, CombineType::Add);

        let colors = scheme.get_all_colors(&Mask::all(), 0.0);
        assert_eq!(colors.get("A"), Some(&Color::new(15, 0, 0)));
        assert_eq!(colors.get("B"), Some(&Color::new(10, 0, 0)));
    }
}
