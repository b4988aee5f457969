//! Force-composition loading.
//!
//! A composition file is JSON: either a bare array of unit specs or an
//! object with a `units` array. Unreadable or malformed files are logged and
//! read as zero units, so one bad file does not sink a scenario set.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use trident_core::backend::{ForceLaydown, UnitSpec};
use trident_core::enums::Faction;
use trident_core::error::{Result, TridentError};

#[derive(Deserialize)]
#[serde(untagged)]
enum ForceFile {
    List(Vec<UnitSpec>),
    Composition { units: Vec<UnitSpec> },
}

impl ForceFile {
    fn into_units(self) -> Vec<UnitSpec> {
        match self {
            ForceFile::List(units) | ForceFile::Composition { units } => units,
        }
    }
}

/// Parse a composition from JSON text.
pub fn parse_force_composition(json: &str, faction: Faction) -> Result<ForceLaydown> {
    let file: ForceFile = serde_json::from_str(json)?;
    let units = file.into_units();
    if let Some(bad) = units.iter().find(|u| !(u.max_speed.is_finite() && u.max_speed >= 0.0)) {
        return Err(TridentError::Scenario(format!(
            "unit {} has invalid max_speed {}",
            bad.name, bad.max_speed
        )));
    }
    Ok(ForceLaydown { faction, units })
}

/// Load a faction's composition. Never fails: faults yield an empty force.
pub fn load_force_composition(path: &Path, faction: Faction) -> ForceLaydown {
    let loaded = std::fs::read_to_string(path)
        .map_err(TridentError::from)
        .and_then(|json| parse_force_composition(&json, faction));
    match loaded {
        Ok(laydown) => {
            info!(?faction, path = %path.display(), units = laydown.units.len(), "force composition loaded");
            laydown
        }
        Err(err) => {
            warn!(?faction, path = %path.display(), %err, "force composition unreadable, using zero units");
            ForceLaydown::empty(faction)
        }
    }
}

#[cfg(test)]
mod tests {
    use trident_core::enums::Domain;

    use super::*;

    const FIGHTER: &str = r#"{"name": "F-1", "domain": "Air", "max_speed": 300.0}"#;

    #[test]
    fn bare_list_and_object_forms() {
        let list = parse_force_composition(&format!("[{FIGHTER}]"), Faction::Legacy).unwrap();
        assert_eq!(list.units.len(), 1);
        assert_eq!(list.units[0].domain, Domain::Air);
        assert!(list.units[0].controllable);

        let obj =
            parse_force_composition(&format!(r#"{{"units": [{FIGHTER}, {FIGHTER}]}}"#), Faction::Dynasty)
                .unwrap();
        assert_eq!(obj.units.len(), 2);
        assert_eq!(obj.faction, Faction::Dynasty);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_force_composition("{not json", Faction::Legacy),
            Err(TridentError::Serialization(_))
        ));
    }

    #[test]
    fn missing_file_reads_as_zero_units() {
        let path = std::env::temp_dir().join("trident-no-such-force-file.json");
        let laydown = load_force_composition(&path, Faction::Legacy);
        assert!(laydown.units.is_empty());
        assert_eq!(laydown.faction, Faction::Legacy);
    }
}
