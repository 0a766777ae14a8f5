pub mod models;

pub use models::{Battle, CaptureRecord, HeroScore, RawBattle};
