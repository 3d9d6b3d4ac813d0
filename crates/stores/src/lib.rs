pub mod context;
pub mod interval;
pub mod pitcher;
pub mod presets;
pub mod theme;
pub mod user;

pub use context::TrainerStores;
pub use interval::IntervalSettingsStore;
pub use pitcher::PitcherStore;
pub use presets::PresetStore;
pub use theme::{AppearanceHost, HeadlessHost, ThemeStore};
pub use user::UserSettingsStore;
