//! Shipped file schemas.
//!
//! | Kind         | File names                                             | Version |
//! | ------------ | ------------------------------------------------------ | ------- |
//! | `curves`     | `CURVES.DAT12`                                         | 12      |
//! | `categories` | `CATEGORIES.DAT15`                                     | 15      |
//! | `sounds`     | `SOUNDS.DAT15`, `EP*_RADIO_SOUNDS.DAT15`               | 15      |
//! | `game`       | `GAME.DAT16`, `EP*_GAME.DAT16`, `EP*_RADIO_GAME.DAT16` | 16      |

use std::path::Path;

pub mod categories;
pub mod curves;
pub mod game;
pub mod sounds;

pub use categories::{Categories, CategoriesFile};
pub use curves::{Curves, CurvesFile};
pub use game::{Game, GameFile};
pub use sounds::{Sounds, SoundsFile};

use crate::file::Format;

/// Files a game directory is expected to hold, in processing order.
pub const WELL_KNOWN_FILES: &[&str] = &[
    "CATEGORIES.DAT15",
    "CURVES.DAT12",
    "SOUNDS.DAT15",
    "EP1_RADIO_SOUNDS.DAT15",
    "EP2_RADIO_SOUNDS.DAT15",
    "GAME.DAT16",
    "EP1_GAME.DAT16",
    "EP1_RADIO_GAME.DAT16",
    "EP2_GAME.DAT16",
    "EP2_RADIO_GAME.DAT16",
];

/// Runtime discriminant for the shipped formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Curves,
    Categories,
    Sounds,
    Game,
}

impl FormatKind {
    pub const ALL: [FormatKind; 4] =
        [FormatKind::Curves, FormatKind::Categories, FormatKind::Sounds, FormatKind::Game];

    /// Short name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            FormatKind::Curves     => Curves::NAME,
            FormatKind::Categories => Categories::NAME,
            FormatKind::Sounds     => Sounds::NAME,
            FormatKind::Game       => Game::NAME,
        }
    }

    pub fn version(self) -> u32 {
        match self {
            FormatKind::Curves     => Curves::VERSION,
            FormatKind::Categories => Categories::VERSION,
            FormatKind::Sounds     => Sounds::VERSION,
            FormatKind::Game       => Game::VERSION,
        }
    }

    /// Parse from a CLI string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "curves"     => Some(FormatKind::Curves),
            "categories" => Some(FormatKind::Categories),
            "sounds"     => Some(FormatKind::Sounds),
            "game"       => Some(FormatKind::Game),
            _            => None,
        }
    }

    /// Detect the format from a file name.  A trailing `.json` or `.GEN` is
    /// ignored, so `SOUNDS.DAT15.json` is detected as sounds.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_uppercase();
        let name = name
            .strip_suffix(".JSON")
            .or_else(|| name.strip_suffix(".GEN"))
            .unwrap_or(&name);
        match name {
            "CURVES.DAT12"                 => Some(FormatKind::Curves),
            "CATEGORIES.DAT15"             => Some(FormatKind::Categories),
            n if n.ends_with(".DAT15")     => Some(FormatKind::Sounds),
            n if n.ends_with(".DAT16")     => Some(FormatKind::Game),
            _                              => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_from_file_names() {
        assert_eq!(FormatKind::from_path(Path::new("CURVES.DAT12")), Some(FormatKind::Curves));
        assert_eq!(FormatKind::from_path(Path::new("x/categories.dat15")), Some(FormatKind::Categories));
        assert_eq!(FormatKind::from_path(Path::new("EP1_RADIO_SOUNDS.DAT15")), Some(FormatKind::Sounds));
        assert_eq!(FormatKind::from_path(Path::new("SOUNDS.DAT15.json")), Some(FormatKind::Sounds));
        assert_eq!(FormatKind::from_path(Path::new("EP2_RADIO_GAME.DAT16")), Some(FormatKind::Game));
        assert_eq!(FormatKind::from_path(Path::new("game.dat16.json")), Some(FormatKind::Game));
        assert_eq!(FormatKind::from_path(Path::new("EFFECTS.DAT11")), None);
    }

    #[test]
    fn names_roundtrip() {
        for kind in FormatKind::ALL {
            assert_eq!(FormatKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(FormatKind::Curves.version(), 12);
        assert_eq!(FormatKind::Game.version(), 16);
        assert_eq!(FormatKind::from_name("SOUNDS"), Some(FormatKind::Sounds));
    }

    #[test]
    fn every_well_known_file_is_detected() {
        for name in WELL_KNOWN_FILES {
            assert!(FormatKind::from_path(Path::new(name)).is_some(), "{name}");
        }
    }
}
