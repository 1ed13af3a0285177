//! Built-in lighting configurations.

mod flame_starlight;
mod solid;

pub use flame_starlight::FlameStarlightConfig;
pub use solid::SolidConfig;
