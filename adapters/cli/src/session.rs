//! Optional TOML session file.
//!
//! ```toml
//! [level]
//! shape = "random"
//! seed = 42
//! forbid_revisits = true
//!
//! [[towers]]
//! kind = "mage"
//! column = 3
//! row = 4
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use waypoint_defence_core::MapShape;

use crate::placement::TowerPlacement;

/// Contents of a session file. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionFile {
    /// Level overrides applied before command-line flags.
    pub(crate) level: LevelSection,
    /// Towers placed before any command-line placement.
    pub(crate) towers: Vec<TowerPlacement>,
}

/// Level settings that replace the built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LevelSection {
    pub(crate) columns: Option<u32>,
    pub(crate) rows: Option<u32>,
    pub(crate) cell_size: Option<f32>,
    pub(crate) shape: Option<MapShape>,
    pub(crate) seed: Option<u64>,
    pub(crate) forbid_revisits: Option<bool>,
}

impl SessionFile {
    /// Reads and parses the session file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse session file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::TowerKind;

    #[test]
    fn empty_file_uses_defaults() {
        let session = SessionFile::parse("").expect("empty session parses");
        assert_eq!(session, SessionFile::default());
    }

    #[test]
    fn parses_level_and_towers() {
        let session = SessionFile::parse(
            r#"
            [level]
            columns = 12
            shape = "x-base"
            forbid_revisits = true

            [[towers]]
            kind = "combat"
            column = 2
            row = 5
            "#,
        )
        .expect("session parses");

        assert_eq!(session.level.columns, Some(12));
        assert_eq!(session.level.rows, None);
        assert_eq!(session.level.shape, Some(MapShape::XBase));
        assert_eq!(session.level.forbid_revisits, Some(true));
        assert_eq!(
            session.towers,
            vec![TowerPlacement {
                kind: TowerKind::Combat,
                column: 2,
                row: 5,
            }]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(SessionFile::parse("[level]\nwidth = 3\n").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = SessionFile::load(Path::new("/definitely/not/here.toml"))
            .expect_err("missing file fails");
        assert!(format!("{error:#}").contains("/definitely/not/here.toml"));
    }
}
