//! Lighting schemes: per-key color maps and ordered layer stacking.
//!
//! A [`LightingScheme`] produces a color for every key in a mask at a
//! given instant. A [`CombiningScheme`] flattens an ordered stack of
//! (scheme, combine type, mask) layers into one color per key:
//! Overlay replaces (black is transparent), Add and Subtract saturate
//! per channel. Maps are computed fresh at every call — nothing is
//! cached between frames.

use std::collections::HashMap;
use std::sync::Arc;

use noise::{NoiseFn, OpenSimplex};
use parking_lot::Mutex;

use crate::color::Color;
use crate::error::LightingError;
use crate::function::{ColorFunction, ReactiveEnvelope};
use crate::input::KeyHook;
use crate::layout::KeyIndex;
use crate::mask::Mask;
use crate::palette::NoisePalette;

/// One color per key.
pub type KeyColorMap = HashMap<KeyIndex, Color>;

/// Blend rule used when a layer's colors land on the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineType {
    /// Replace the accumulated color, unless the layer color is exactly
    /// black (treated as transparent).
    Overlay,
    /// Per-channel saturating addition.
    Add,
    /// Per-channel saturating subtraction.
    Subtract,
}

/// One color for every key.
#[derive(Debug, Clone)]
pub struct SolidColorScheme {
    pub color: Color,
}

/// A color function per key.
#[derive(Clone)]
pub struct FunctionScheme {
    functions: HashMap<KeyIndex, ColorFunction>,
}

/// Practical amplitude of the 3-D OpenSimplex field; samples are
/// normalized against it before clamping to a span proportion.
const NOISE_AMPLITUDE: f64 = 0.866;

/// Colors derived from a noise field over the board surface.
///
/// Each key samples the field at its column-major position (scaled by
/// the palette frequency) and the elapsed time; the folded value maps
/// through the palette gradient. Per-key exponential smoothing keeps
/// low-speed fields from flickering.
pub struct NoiseScheme {
    palette: NoisePalette,
    field: OpenSimplex,
    smoothed: Mutex<HashMap<KeyIndex, f64>>,
}

impl NoiseScheme {
    fn sample(&self, key: &KeyIndex, t: f64) -> Color {
        let Some((col, row)) = key.position_col_major() else {
            return Color::BLACK;
        };
        let freq = self.palette.scale / 1000.0;
        let raw = self.field.get([
            col as f64 * freq,
            row as f64 * freq,
            t * self.palette.speed,
        ]);
        let mut proportion = ((raw / NOISE_AMPLITUDE) + 1.0) / 2.0;

        if self.palette.smoothing > 0.0 {
            let mut smoothed = self.smoothed.lock();
            let prev = smoothed.get(key).copied().unwrap_or(proportion);
            proportion =
                self.palette.smoothing * prev + (1.0 - self.palette.smoothing) * proportion;
            smoothed.insert(key.clone(), proportion);
        }

        self.palette.color_at(proportion.clamp(0.0, 1.0))
    }
}

/// Wraps an inner scheme, scaling each key's color by a per-key
/// reactive envelope.
pub struct ReactiveScheme {
    inner: Box<LightingScheme>,
    envelopes: HashMap<KeyIndex, ReactiveEnvelope>,
}

/// Produces a color for every key in a mask at a given instant.
pub enum LightingScheme {
    Solid(SolidColorScheme),
    PerKey(FunctionScheme),
    Noise(NoiseScheme),
    Reactive(ReactiveScheme),
}

impl LightingScheme {
    pub fn solid(color: Color) -> Self {
        Self::Solid(SolidColorScheme { color })
    }

    pub fn per_key(functions: HashMap<KeyIndex, ColorFunction>) -> Self {
        Self::PerKey(FunctionScheme { functions })
    }

    pub fn noise(palette: NoisePalette) -> Self {
        Self::Noise(NoiseScheme {
            palette,
            field: OpenSimplex::new(0),
            smoothed: Mutex::new(HashMap::new()),
        })
    }

    /// Wrap `inner` with one reactive envelope per key of the whole
    /// board.
    pub fn reactive(inner: LightingScheme, decay: f64) -> Result<Self, LightingError> {
        Self::reactive_over(inner, decay, &Mask::all())
    }

    /// Wrap `inner` with one reactive envelope per key of `mask`.
    pub fn reactive_over(
        inner: LightingScheme,
        decay: f64,
        mask: &Mask,
    ) -> Result<Self, LightingError> {
        let mut envelopes = HashMap::new();
        for key in mask.iter() {
            envelopes.insert(KeyIndex::new(key), ReactiveEnvelope::new(key, decay)?);
        }
        Ok(Self::Reactive(ReactiveScheme {
            inner: Box::new(inner),
            envelopes,
        }))
    }

    /// Colors for exactly the keys in `mask` at engine time `t`.
    pub fn get_all_colors(&self, mask: &Mask, t: f64) -> KeyColorMap {
        match self {
            Self::Solid(scheme) => mask
                .iter()
                .map(|key| (KeyIndex::new(key), scheme.color))
                .collect(),
            Self::PerKey(scheme) => mask
                .iter()
                .filter_map(|key| {
                    scheme
                        .functions
                        .get(key)
                        .map(|function| (KeyIndex::new(key), function.get(t)))
                })
                .collect(),
            Self::Noise(scheme) => mask
                .iter()
                .map(|key| {
                    let key = KeyIndex::new(key);
                    let color = scheme.sample(&key, t);
                    (key, color)
                })
                .collect(),
            Self::Reactive(scheme) => {
                let mut colors = scheme.inner.get_all_colors(mask, t);
                for (key, color) in colors.iter_mut() {
                    let scalar = scheme
                        .envelopes
                        .get(key)
                        .map(|envelope| envelope.scalar(t))
                        .unwrap_or(0.0);
                    *color = color.scale(scalar);
                }
                colors
            }
        }
    }

    /// Event hooks of every reactive envelope in this scheme.
    pub fn hooks(&self) -> Vec<KeyHook> {
        match self {
            Self::Solid(_) | Self::Noise(_) => Vec::new(),
            Self::PerKey(scheme) => scheme
                .functions
                .values()
                .flat_map(|function| function.hooks())
                .collect(),
            Self::Reactive(scheme) => {
                let mut hooks = scheme.inner.hooks();
                hooks.extend(scheme.envelopes.values().map(|envelope| envelope.hook()));
                hooks
            }
        }
    }
}

/// A layer of a [`CombiningScheme`].
pub struct SchemeLayer {
    pub scheme: Arc<LightingScheme>,
    pub combine: CombineType,
    pub mask: Mask,
}

/// An ordered stack of lighting layers.
///
/// Insertion order is the compositing order and is permanent; removal
/// is by scheme identity, never by position.
#[derive(Default)]
pub struct CombiningScheme {
    layers: Vec<SchemeLayer>,
}

impl CombiningScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer to the top of the stack.
    pub fn add_scheme(&mut self, scheme: Arc<LightingScheme>, combine: CombineType, mask: Mask) {
        self.layers.push(SchemeLayer {
            scheme,
            combine,
            mask,
        });
    }

    /// Remove every layer holding exactly this scheme instance.
    pub fn remove_scheme(&mut self, scheme: &Arc<LightingScheme>) {
        self.layers
            .retain(|layer| !Arc::ptr_eq(&layer.scheme, scheme));
    }

    pub fn clear_schemes(&mut self) {
        self.layers.clear();
    }

    pub fn layers(&self) -> &[SchemeLayer] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Flatten the stack into one color per key of `mask`.
    ///
    /// Starts from all-black; each layer is computed over
    /// `mask ∩ layer.mask` and merged per its combine type. Keys a
    /// layer does not cover keep their accumulated color.
    pub fn get_all_colors(&self, mask: &Mask, t: f64) -> KeyColorMap {
        let mut acc: KeyColorMap = mask
            .iter()
            .map(|key| (KeyIndex::new(key), Color::BLACK))
            .collect();

        for layer in &self.layers {
            let covered = mask.intersection(&layer.mask);
            let colors = layer.scheme.get_all_colors(&covered, t);
            for (key, color) in colors {
                let Some(slot) = acc.get_mut(&key) else {
                    continue;
                };
                match layer.combine {
                    CombineType::Overlay => {
                        if !color.is_black() {
                            *slot = color;
                        }
                    }
                    CombineType::Add => *slot = slot.add(color),
                    CombineType::Subtract => *slot = slot.sub(color),
                }
            }
        }
        acc
    }

    /// Event hooks of every reactive envelope in the stack.
    pub fn hooks(&self) -> Vec<KeyHook> {
        self.layers
            .iter()
            .flat_map(|layer| layer.scheme.hooks())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Gradient, GradientKeyPoint};
    use crate::input::{KeyEvent, KeyEventKind};
    use crate::layout;

    #[test]
    fn solid_covers_exactly_the_mask() {
        let scheme = LightingScheme::solid(Color::new(1, 2, 3));
        let colors = scheme.get_all_colors(&Mask::wasd(), 0.0);
        assert_eq!(colors.len(), 4);
        assert_eq!(colors.get("W"), Some(&Color::new(1, 2, 3)));
        assert!(!colors.contains_key("Q"));
    }

    #[test]
    fn overlay_layer_reproduces_scheme_output() {
        let mut stack = CombiningScheme::new();
        stack.add_scheme(
            Arc::new(LightingScheme::solid(Color::new(9, 9, 9))),
            CombineType::Overlay,
            Mask::all(),
        );
        let composed = stack.get_all_colors(&Mask::all(), 0.0);
        for key in Mask::all().iter() {
            assert_eq!(composed.get(key), Some(&Color::new(9, 9, 9)));
        }
    }

    #[test]
    fn overlay_treats_black_as_transparent() {
        let mut stack = CombiningScheme::new();
        stack.add_scheme(
            Arc::new(LightingScheme::solid(Color::new(40, 0, 0))),
            CombineType::Overlay,
            Mask::all(),
        );
        stack.add_scheme(
            Arc::new(LightingScheme::solid(Color::BLACK)),
            CombineType::Overlay,
            Mask::all(),
        );
        let composed = stack.get_all_colors(&Mask::all(), 0.0);
        assert_eq!(composed.get("A"), Some(&Color::new(40, 0, 0)));
    }

    #[test]
    fn add_and_subtract_saturate() {
        let mut stack = CombiningScheme::new();
        stack.add_scheme(
            Arc::new(LightingScheme::solid(Color::new(200, 0, 10))),
            CombineType::Add,
            Mask::all(),
        );
        stack.add_scheme(
            Arc::new(LightingScheme::solid(Color::new(100, 0, 30))),
            CombineType::Add,
            Mask::all(),
        );
        let composed = stack.get_all_colors(&Mask::all(), 0.0);
        assert_eq!(composed.get("A"), Some(&Color::new(255, 0, 40)));

        stack.add_scheme(
            Arc::new(LightingScheme::solid(Color::new(0, 50, 255))),
            CombineType::Subtract,
            Mask::all(),
        );
        let composed = stack.get_all_colors(&Mask::all(), 0.0);
        assert_eq!(composed.get("A"), Some(&Color::new(255, 0, 0)));
    }

    #[test]
    fn layered_solid_add_over_single_key() {
        let mut stack = CombiningScheme::new();
        stack.add_scheme(
            Arc::new(LightingScheme::solid(Color::new(10, 0, 0))),
            CombineType::Overlay,
            Mask::all(),
        );
        stack.add_scheme(
            Arc::new(LightingScheme::solid(Color::new(5, 0, 0))),
            CombineType::Add,
            Mask::new(["A"]),
        );
        let composed = stack.get_all_colors(&Mask::all(), 0.0);
        assert_eq!(composed.get("A"), Some(&Color::new(15, 0, 0)));
        assert_eq!(composed.get("B"), Some(&Color::new(10, 0, 0)));
        assert_eq!(composed.get("Escape"), Some(&Color::new(10, 0, 0)));
    }

    #[test]
    fn masked_out_keys_keep_accumulated_color() {
        let mut stack = CombiningScheme::new();
        stack.add_scheme(
            Arc::new(LightingScheme::solid(Color::new(50, 50, 50))),
            CombineType::Overlay,
            Mask::new(["W"]),
        );
        let composed = stack.get_all_colors(&Mask::wasd(), 0.0);
        assert_eq!(composed.get("W"), Some(&Color::new(50, 50, 50)));
        assert_eq!(composed.get("A"), Some(&Color::BLACK));
    }

    #[test]
    fn removal_is_by_identity() {
        let first = Arc::new(LightingScheme::solid(Color::new(1, 0, 0)));
        let twin = Arc::new(LightingScheme::solid(Color::new(1, 0, 0)));
        let mut stack = CombiningScheme::new();
        stack.add_scheme(Arc::clone(&first), CombineType::Overlay, Mask::all());
        stack.add_scheme(Arc::clone(&twin), CombineType::Overlay, Mask::all());

        stack.remove_scheme(&first);
        assert_eq!(stack.layers().len(), 1);
        assert!(Arc::ptr_eq(&stack.layers()[0].scheme, &twin));
    }

    #[test]
    fn per_key_scheme_skips_unmapped_keys() {
        let mut functions = HashMap::new();
        functions.insert(
            KeyIndex::new("W"),
            ColorFunction::solid(Color::new(0, 9, 0)),
        );
        let scheme = LightingScheme::per_key(functions);
        let colors = scheme.get_all_colors(&Mask::wasd(), 0.0);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors.get("W"), Some(&Color::new(0, 9, 0)));
    }

    #[test]
    fn noise_scheme_stays_on_palette() {
        let gradient = Gradient::rgb(vec![
            GradientKeyPoint::new(Color::new(0, 0, 100), 0.0),
            GradientKeyPoint::new(Color::new(0, 0, 200), 1.0),
        ])
        .unwrap();
        let scheme = LightingScheme::noise(NoisePalette::new(gradient, 0.1, 120.0, 0.5));
        for t in [0.0, 0.5, 1.0, 10.0] {
            let colors = scheme.get_all_colors(&Mask::all(), t);
            assert_eq!(colors.len(), Mask::all().len());
            for (key, color) in &colors {
                assert_eq!(color.r, 0, "{key} off palette");
                assert_eq!(color.g, 0, "{key} off palette");
                assert!((100..=200).contains(&color.b), "{key} off palette");
            }
        }
    }

    #[test]
    fn reactive_scheme_lights_only_pressed_keys() {
        let scheme =
            LightingScheme::reactive(LightingScheme::solid(Color::new(80, 0, 255)), 0.4).unwrap();
        let hooks = scheme.hooks();
        assert_eq!(hooks.len(), Mask::all().len());

        let dark = scheme.get_all_colors(&Mask::all(), 0.0);
        assert!(dark.values().all(|color| color.is_black()));

        let event = KeyEvent {
            scan_code: layout::scan_code("W").unwrap(),
            name: "w".to_string(),
            is_keypad: false,
            kind: KeyEventKind::Press,
            time: 1.0,
        };
        for hook in &hooks {
            hook(&event);
        }
        let lit = scheme.get_all_colors(&Mask::all(), 1.0);
        assert_eq!(lit.get("W"), Some(&Color::new(80, 0, 255)));
        assert_eq!(lit.get("Q"), Some(&Color::BLACK));
    }
}
