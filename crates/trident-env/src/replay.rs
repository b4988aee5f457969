//! Episode replay recording.
//!
//! The recorder keeps each agent's observation, action and reward
//! sequences. A saved bundle also embeds the backend's own deterministic
//! replay so a visualiser can re-run the simulation without the agents.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use trident_core::action::Action;
use trident_core::config::EnvConfig;
use trident_core::enums::{Faction, Outcome, TerminationCause};
use trident_core::error::{Result, TridentError};
use trident_core::types::PerFaction;

pub const REPLAY_EXTENSION: &str = "w4a.json";
pub const REPLAY_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentTrack {
    pub observations: Vec<Vec<f32>>,
    pub actions: Vec<Action>,
    pub rewards: Vec<f64>,
}

/// Summary of how the recorded episode went.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub seed: u64,
    pub steps: u64,
    pub time_elapsed: f64,
    pub outcome: Outcome,
    pub termination_cause: Option<TerminationCause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayBundle {
    pub version: u32,
    /// RFC 3339 creation time.
    pub created_at: String,
    pub episode: EpisodeSummary,
    pub config: EnvConfig,
    pub agents: PerFaction<AgentTrack>,
    /// The backend's exported replay, kept as raw JSON.
    pub simulation: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct ReplayRecorder {
    tracks: PerFaction<AgentTrack>,
}

impl ReplayRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and record the reset observations.
    pub fn start(&mut self, observations: &PerFaction<Vec<f32>>) {
        self.tracks = PerFaction::default();
        for faction in Faction::COMBATANTS {
            self.tracks[faction]
                .observations
                .push(observations[faction].clone());
        }
    }

    pub fn record(
        &mut self,
        actions: &PerFaction<Action>,
        observations: &PerFaction<Vec<f32>>,
        rewards: &PerFaction<f64>,
    ) {
        for faction in Faction::COMBATANTS {
            let track = &mut self.tracks[faction];
            track.actions.push(actions[faction]);
            track.observations.push(observations[faction].clone());
            track.rewards.push(rewards[faction]);
        }
    }

    pub fn tracks(&self) -> &PerFaction<AgentTrack> {
        &self.tracks
    }

    pub fn steps(&self) -> usize {
        self.tracks.legacy.actions.len()
    }

    pub fn bundle(
        &self,
        episode: EpisodeSummary,
        config: &EnvConfig,
        simulation_json: &str,
    ) -> Result<ReplayBundle> {
        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| TridentError::Replay(e.to_string()))?;
        Ok(ReplayBundle {
            version: REPLAY_FORMAT_VERSION,
            created_at,
            episode,
            config: config.clone(),
            agents: self.tracks.clone(),
            simulation: serde_json::from_str(simulation_json)?,
        })
    }
}

/// Write a bundle to `dir/name.w4a.json`, creating `dir` if needed.
pub fn save(bundle: &ReplayBundle, dir: &Path, name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.{REPLAY_EXTENSION}"));
    let json = serde_json::to_string(bundle)?;
    std::fs::write(&path, json)?;
    info!(path = %path.display(), steps = bundle.episode.steps, "replay saved");
    Ok(path)
}

pub fn load(path: &Path) -> Result<ReplayBundle> {
    let json = std::fs::read_to_string(path)?;
    let bundle: ReplayBundle = serde_json::from_str(&json)?;
    if bundle.version != REPLAY_FORMAT_VERSION {
        return Err(TridentError::Replay(format!(
            "unsupported replay version {}",
            bundle.version
        )));
    }
    Ok(bundle)
}

/// The embedded backend replay, re-exported as standalone JSON.
pub fn export_simulation_json(bundle: &ReplayBundle) -> Result<String> {
    Ok(serde_json::to_string_pretty(&bundle.simulation)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_aligned_sequences() {
        let mut rec = ReplayRecorder::new();
        let obs = PerFaction::new(vec![0.5], vec![0.25]);
        rec.start(&obs);
        rec.record(
            &PerFaction::new(Action::noop(), Action::noop()),
            &obs,
            &PerFaction::new(1.0, -1.0),
        );
        assert_eq!(rec.steps(), 1);
        assert_eq!(rec.tracks().legacy.observations.len(), 2);
        assert_eq!(rec.tracks().dynasty.rewards, vec![-1.0]);

        rec.start(&obs);
        assert_eq!(rec.steps(), 0);
    }

    #[test]
    fn bundle_carries_timestamp_and_simulation() {
        let rec = ReplayRecorder::new();
        let bundle = rec
            .bundle(EpisodeSummary::default(), &EnvConfig::default(), r#"{"frames": []}"#)
            .unwrap();
        assert!(bundle.created_at.contains('T'));
        assert!(bundle.created_at.ends_with('Z'));
        assert_eq!(bundle.simulation["frames"], serde_json::json!([]));
    }

    #[test]
    fn bad_simulation_json_is_rejected() {
        let rec = ReplayRecorder::new();
        assert!(rec
            .bundle(EpisodeSummary::default(), &EnvConfig::default(), "not json")
            .is_err());
    }
}
