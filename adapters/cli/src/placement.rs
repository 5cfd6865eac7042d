//! Tower placement requests accepted on the command line and in session files.

use std::str::FromStr;

use serde::{de::IntoDeserializer, Deserialize};
use thiserror::Error;
use waypoint_defence_core::{CellCoord, MapShape, TowerKind};

/// Delimiter between the tower kind and its cell.
const KIND_DELIMITER: char = '@';
/// Delimiter between the column and the row.
const AXIS_DELIMITER: char = ',';

/// Request to build one tower on a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TowerPlacement {
    /// Kind of tower to build.
    pub(crate) kind: TowerKind,
    /// Column of the target cell.
    pub(crate) column: u32,
    /// Row of the target cell.
    pub(crate) row: u32,
}

impl TowerPlacement {
    /// Cell the tower should occupy.
    #[must_use]
    pub(crate) const fn cell(&self) -> CellCoord {
        CellCoord::new(self.column, self.row)
    }
}

/// Errors produced while parsing `KIND@COLUMN,ROW` placement strings.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum PlacementParseError {
    /// The string did not contain the `@` separator.
    #[error("expected KIND@COLUMN,ROW, got '{0}'")]
    MissingCell(String),
    /// The kind segment did not name a tower.
    #[error("unknown tower kind '{0}' (expected mage or combat)")]
    UnknownKind(String),
    /// The cell segment could not be parsed.
    #[error("could not parse cell '{0}' (expected COLUMN,ROW)")]
    InvalidCell(String),
}

impl FromStr for TowerPlacement {
    type Err = PlacementParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (kind, cell) = trimmed
            .split_once(KIND_DELIMITER)
            .ok_or_else(|| PlacementParseError::MissingCell(trimmed.to_owned()))?;

        let kind = parse_kind(kind.trim())
            .ok_or_else(|| PlacementParseError::UnknownKind(kind.trim().to_owned()))?;
        let (column, row) = parse_cell(cell)
            .ok_or_else(|| PlacementParseError::InvalidCell(cell.trim().to_owned()))?;

        Ok(Self { kind, column, row })
    }
}

fn parse_kind(value: &str) -> Option<TowerKind> {
    let lowered = value.to_ascii_lowercase();
    TowerKind::deserialize(lowered.as_str().into_deserializer())
        .map_err(|_: serde::de::value::Error| ())
        .ok()
}

fn parse_cell(value: &str) -> Option<(u32, u32)> {
    let (column, row) = value.split_once(AXIS_DELIMITER)?;
    let column = column.trim().parse::<u32>().ok()?;
    let row = row.trim().parse::<u32>().ok()?;
    Some((column, row))
}

/// Parses a map shape using the same names accepted by session files.
pub(crate) fn parse_shape(value: &str) -> Result<MapShape, String> {
    let lowered = value.trim().to_ascii_lowercase();
    MapShape::deserialize(lowered.as_str().into_deserializer()).map_err(
        |error: serde::de::value::Error| format!("{error} (expected u, s, x-base or random)"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_and_cell() {
        let placement: TowerPlacement = "mage@3,7".parse().expect("placement parses");
        assert_eq!(placement.kind, TowerKind::Mage);
        assert_eq!(placement.cell(), CellCoord::new(3, 7));
    }

    #[test]
    fn tolerates_whitespace_and_case() {
        let placement: TowerPlacement = " Combat @ 0 , 12 ".parse().expect("placement parses");
        assert_eq!(placement.kind, TowerKind::Combat);
        assert_eq!(placement.cell(), CellCoord::new(0, 12));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!(
            "mage".parse::<TowerPlacement>(),
            Err(PlacementParseError::MissingCell("mage".to_owned()))
        );
        assert_eq!(
            "archer@1,1".parse::<TowerPlacement>(),
            Err(PlacementParseError::UnknownKind("archer".to_owned()))
        );
        assert_eq!(
            "mage@1;1".parse::<TowerPlacement>(),
            Err(PlacementParseError::InvalidCell("1;1".to_owned()))
        );
        assert!(matches!(
            "combat@-1,2".parse::<TowerPlacement>(),
            Err(PlacementParseError::InvalidCell(_))
        ));
    }

    #[test]
    fn shape_names_match_session_files() {
        assert_eq!(parse_shape("x-base"), Ok(MapShape::XBase));
        assert_eq!(parse_shape("U"), Ok(MapShape::U));
        assert!(parse_shape("spiral").is_err());
    }
}
