//! # clinsim-achievements
//!
//! The achievement table and its unlock predicates.
//!
//! `TomlAchievementBook` implements `clinsim_core::traits::AchievementRules`.
//! The built-in table lives in `achievements.toml` next to this crate's
//! manifest; deployments can load their own with `from_file`.

pub mod engine;
pub mod rule;

pub use engine::TomlAchievementBook;
pub use rule::AchievementConfig;
