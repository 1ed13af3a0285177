//! Color functions: stateful producers of a single color.
//!
//! The family is a closed set — solid, periodic gradient walk, static
//! gradient sample, and a reactive decay wrapper — dispatched through
//! [`ColorFunction::get`]. Time is passed in explicitly (engine-clock
//! seconds); nothing here reads the wall clock.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::color::{scale_map, Color, Gradient};
use crate::error::LightingError;
use crate::input::{KeyEvent, KeyEventKind, KeyHook};
use crate::layout;

/// Always returns one color.
#[derive(Debug, Clone)]
pub struct SolidColor {
    pub color: Color,
}

/// Walks a gradient once per `period` seconds, wrapping.
#[derive(Debug, Clone)]
pub struct PeriodicColor {
    gradient: Gradient,
    period: f64,
    phase: f64,
}

impl PeriodicColor {
    pub fn new(gradient: Gradient, period: f64, phase: f64) -> Result<Self, LightingError> {
        if period <= 0.0 {
            return Err(LightingError::InvalidPeriod(period));
        }
        Ok(Self {
            gradient,
            period,
            phase,
        })
    }

    fn get(&self, t: f64) -> Color {
        let folded = (t + self.phase).rem_euclid(self.period);
        self.gradient.color_at(scale_map(
            folded,
            0.0,
            self.period,
            self.gradient.t_min(),
            self.gradient.t_max(),
        ))
    }
}

/// Samples a gradient at a fixed point, or uniformly at random per call
/// when no point is configured.
#[derive(Debug, Clone)]
pub struct StaticGradient {
    gradient: Gradient,
    at: Option<f64>,
}

impl StaticGradient {
    fn get(&self) -> Color {
        match self.at {
            Some(t) => self.gradient.color_at(t),
            None => {
                let t = self.gradient.t_min() + rand::random::<f64>() * self.gradient.span();
                self.gradient.color_at(t)
            }
        }
    }
}

/// How a tracked key's events are disambiguated from scan-code siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyClass {
    /// Neither keypad nor right-hand: rejects both side-band flags.
    Main,
    /// Right-hand duplicate: requires a "right"-prefixed event name.
    Right,
    /// Numeric-keypad duplicate: requires the keypad flag.
    Numpad,
}

fn is_right_named(name: &str) -> bool {
    name.get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("right"))
}

#[derive(Debug)]
struct EnvelopeState {
    on: bool,
    release_time: f64,
}

/// Decay-based scalar driven by one key's press/release events.
///
/// ON while the key is held (scalar 1.0); a release starts a linear
/// decay from 1 to 0 over `decay` seconds; 0 afterwards. State is
/// shared between the envelope and its registered event hook, so a
/// clone observes the same key.
#[derive(Clone)]
pub struct ReactiveEnvelope {
    key: String,
    scan_code: i32,
    class: KeyClass,
    decay: f64,
    state: Arc<Mutex<EnvelopeState>>,
}

impl ReactiveEnvelope {
    pub fn new(key: &str, decay: f64) -> Result<Self, LightingError> {
        if decay <= 0.0 {
            return Err(LightingError::InvalidDecay(decay));
        }
        let scan_code =
            layout::scan_code(key).ok_or_else(|| LightingError::UnknownKey(key.to_string()))?;
        let class = if layout::is_right_class(key) {
            KeyClass::Right
        } else if layout::is_numpad_class(key) {
            KeyClass::Numpad
        } else {
            KeyClass::Main
        };
        Ok(Self {
            key: key.to_string(),
            scan_code,
            class,
            decay,
            state: Arc::new(Mutex::new(EnvelopeState {
                on: false,
                release_time: f64::NEG_INFINITY,
            })),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Scalar at engine time `t`: 1 while ON, decaying linearly to 0
    /// over the decay window, 0 otherwise.
    pub fn scalar(&self, t: f64) -> f64 {
        let state = self.state.lock();
        if state.on {
            return 1.0;
        }
        let elapsed = t - state.release_time;
        if (0.0..=self.decay).contains(&elapsed) {
            scale_map(elapsed, 0.0, self.decay, 1.0, 0.0)
        } else {
            0.0
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        if event.scan_code != self.scan_code {
            return false;
        }
        match self.class {
            KeyClass::Right => is_right_named(&event.name) && !event.is_keypad,
            KeyClass::Numpad => event.is_keypad,
            KeyClass::Main => !event.is_keypad && !is_right_named(&event.name),
        }
    }

    fn deliver(&self, event: &KeyEvent) {
        if !self.matches(event) {
            return;
        }
        let mut state = self.state.lock();
        match event.kind {
            KeyEventKind::Press => state.on = true,
            KeyEventKind::Release => {
                state.on = false;
                state.release_time = event.time;
            }
        }
    }

    /// Event-bus subscriber observing this envelope's key.
    pub fn hook(&self) -> KeyHook {
        let envelope = self.clone();
        Arc::new(move |event: &KeyEvent| envelope.deliver(event))
    }
}

/// Wraps a lower function, scaling its output by a reactive envelope.
#[derive(Clone)]
pub struct ReactiveFunction {
    lower: Box<ColorFunction>,
    envelope: ReactiveEnvelope,
}

impl ReactiveFunction {
    pub fn envelope(&self) -> &ReactiveEnvelope {
        &self.envelope
    }
}

/// A producer of a single color, dispatched by variant.
#[derive(Clone)]
pub enum ColorFunction {
    Solid(SolidColor),
    Periodic(PeriodicColor),
    Static(StaticGradient),
    Reactive(ReactiveFunction),
}

impl ColorFunction {
    pub fn solid(color: Color) -> Self {
        Self::Solid(SolidColor { color })
    }

    pub fn periodic(gradient: Gradient, period: f64) -> Result<Self, LightingError> {
        Ok(Self::Periodic(PeriodicColor::new(gradient, period, 0.0)?))
    }

    /// Periodic walk starting `phase` seconds into the cycle.
    pub fn periodic_with_phase(
        gradient: Gradient,
        period: f64,
        phase: f64,
    ) -> Result<Self, LightingError> {
        Ok(Self::Periodic(PeriodicColor::new(gradient, period, phase)?))
    }

    /// Static sample at a random point per call.
    pub fn static_gradient(gradient: Gradient) -> Self {
        Self::Static(StaticGradient { gradient, at: None })
    }

    /// Static sample at a fixed point.
    pub fn static_at(gradient: Gradient, t: f64) -> Self {
        Self::Static(StaticGradient {
            gradient,
            at: Some(t),
        })
    }

    /// Wrap `lower` in a decay envelope tracking `key`.
    pub fn reactive(lower: ColorFunction, key: &str, decay: f64) -> Result<Self, LightingError> {
        Ok(Self::Reactive(ReactiveFunction {
            lower: Box::new(lower),
            envelope: ReactiveEnvelope::new(key, decay)?,
        }))
    }

    /// Color at engine time `t` (seconds).
    pub fn get(&self, t: f64) -> Color {
        match self {
            Self::Solid(f) => f.color,
            Self::Periodic(f) => f.get(t),
            Self::Static(f) => f.get(),
            Self::Reactive(f) => f.lower.get(t).scale(f.envelope.scalar(t)),
        }
    }

    /// Event hooks of any reactive envelopes inside this function.
    pub fn hooks(&self) -> Vec<KeyHook> {
        match self {
            Self::Reactive(f) => {
                let mut hooks = f.lower.hooks();
                hooks.push(f.envelope.hook());
                hooks
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::GradientKeyPoint;

    fn red_blue() -> Gradient {
        Gradient::rgb(vec![
            GradientKeyPoint::new(Color::new(255, 0, 0), 0.0),
            GradientKeyPoint::new(Color::new(0, 0, 255), 1.0),
        ])
        .unwrap()
    }

    fn press(scan_code: i32, name: &str, is_keypad: bool, time: f64) -> KeyEvent {
        KeyEvent {
            scan_code,
            name: name.to_string(),
            is_keypad,
            kind: KeyEventKind::Press,
            time,
        }
    }

    fn release(scan_code: i32, name: &str, is_keypad: bool, time: f64) -> KeyEvent {
        KeyEvent {
            kind: KeyEventKind::Release,
            ..press(scan_code, name, is_keypad, time)
        }
    }

    #[test]
    fn solid_ignores_time() {
        let f = ColorFunction::solid(Color::new(1, 2, 3));
        assert_eq!(f.get(0.0), Color::new(1, 2, 3));
        assert_eq!(f.get(1000.0), Color::new(1, 2, 3));
    }

    #[test]
    fn periodic_wraps_over_the_span() {
        let f = ColorFunction::periodic(red_blue(), 2.0).unwrap();
        assert_eq!(f.get(0.0), Color::new(255, 0, 0));
        assert_eq!(f.get(1.0), Color::new(128, 0, 128));
        // One full period later the walk repeats
        assert_eq!(f.get(2.0), f.get(0.0));
        assert_eq!(f.get(5.0), f.get(1.0));
    }

    #[test]
    fn periodic_phase_advances_the_walk() {
        let plain = ColorFunction::periodic(red_blue(), 2.0).unwrap();
        let shifted = ColorFunction::periodic_with_phase(red_blue(), 2.0, 1.0).unwrap();
        assert_eq!(shifted.get(0.0), plain.get(1.0));
    }

    #[test]
    fn periodic_rejects_bad_period() {
        assert!(matches!(
            ColorFunction::periodic(red_blue(), 0.0),
            Err(LightingError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn static_fixed_point_sample() {
        let f = ColorFunction::static_at(red_blue(), 0.0);
        assert_eq!(f.get(42.0), Color::new(255, 0, 0));
    }

    #[test]
    fn static_random_sample_stays_on_gradient() {
        let f = ColorFunction::static_gradient(red_blue());
        for _ in 0..32 {
            let c = f.get(0.0);
            // Every point on the red→blue ramp satisfies r + b ≈ 255
            assert!(c.g == 0, "unexpected green in {c}");
            let sum = c.r as i32 + c.b as i32;
            assert!((254..=256).contains(&sum), "off-ramp color {c}");
        }
    }

    #[test]
    fn reactive_decay_timeline() {
        let f = ColorFunction::reactive(ColorFunction::solid(Color::new(200, 0, 0)), "A", 0.25)
            .unwrap();
        let hooks = f.hooks();
        assert_eq!(hooks.len(), 1);
        let hook = &hooks[0];
        let code = layout::scan_code("A").unwrap();

        // Untouched key is dark
        assert_eq!(f.get(0.0), Color::BLACK);

        hook(&press(code, "a", false, 1.0));
        assert_eq!(f.get(1.0), Color::new(200, 0, 0));
        assert_eq!(f.get(10.0), Color::new(200, 0, 0)); // still held

        hook(&release(code, "a", false, 10.0));
        assert_eq!(f.get(10.0), Color::new(200, 0, 0)); // scalar 1.0 at t0
        assert_eq!(f.get(10.125), Color::new(100, 0, 0)); // ~0.5 mid-decay
        assert_eq!(f.get(10.25), Color::BLACK); // exactly 0 at decay end
        assert_eq!(f.get(11.0), Color::BLACK);
    }

    #[test]
    fn reactive_requires_known_key() {
        let err = ColorFunction::reactive(ColorFunction::solid(Color::WHITE), "NoSuchKey", 0.25);
        assert!(matches!(err, Err(LightingError::UnknownKey(_))));
    }

    #[test]
    fn right_class_needs_right_named_event() {
        // RightControl shares scan code 29 with nothing named "right"
        let env = ReactiveEnvelope::new("RightControl", 0.25).unwrap();
        let hook = env.hook();

        hook(&press(29, "ctrl", false, 0.0));
        assert_eq!(env.scalar(0.0), 0.0);

        hook(&press(29, "right ctrl", false, 0.0));
        assert_eq!(env.scalar(0.0), 1.0);
    }

    #[test]
    fn numpad_class_needs_keypad_flag() {
        // N7 shares scan code 71 with Home
        let env = ReactiveEnvelope::new("N7", 0.25).unwrap();
        let hook = env.hook();

        hook(&press(71, "home", false, 0.0));
        assert_eq!(env.scalar(0.0), 0.0);

        hook(&press(71, "7", true, 0.0));
        assert_eq!(env.scalar(0.0), 1.0);
    }

    #[test]
    fn main_class_rejects_keypad_and_right_events() {
        // Home shares scan code 71 with N7
        let env = ReactiveEnvelope::new("Home", 0.25).unwrap();
        let hook = env.hook();

        hook(&press(71, "7", true, 0.0));
        assert_eq!(env.scalar(0.0), 0.0);

        hook(&press(71, "home", false, 0.0));
        assert_eq!(env.scalar(0.0), 1.0);
    }

    #[test]
    fn repress_during_decay_returns_to_on() {
        let env = ReactiveEnvelope::new("Space", 0.5).unwrap();
        let hook = env.hook();
        let code = layout::scan_code("Space").unwrap();

        hook(&press(code, "space", false, 0.0));
        hook(&release(code, "space", false, 1.0));
        assert!(env.scalar(1.2) < 1.0);
        hook(&press(code, "space", false, 1.3));
        assert_eq!(env.scalar(1.4), 1.0);
    }
}
