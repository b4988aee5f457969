//! The two-agent environment and its step loop.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use trident_core::action::{Action, ActionSpace, ObservationSpace};
use trident_core::backend::{BackendFactory, ForceLaydown, SimulationBackend, SimulationConfig};
use trident_core::commands::Command;
use trident_core::config::EnvConfig;
use trident_core::enums::{Faction, Outcome, TerminationCause};
use trident_core::error::{Result, TridentError};
use trident_core::events::SimEvent;
use trident_core::types::PerFaction;

use crate::agent::FactionAgent;
use crate::dispatch::{self, DispatchTargets};
use crate::execution;
use crate::flags::FlagBoard;
use crate::forces;
use crate::info::{ActionTrail, ActionTrails, MissionInfo, StepInfo};
use crate::masks;
use crate::metrics::MissionMetrics;
use crate::observation::{self, ObservationContext};
use crate::outcome;
use crate::replay::{self, EpisodeSummary, ReplayBundle, ReplayRecorder};
use crate::reward::{RewardContext, RewardShaper};
use crate::validation::{self, ActionContext};

pub const SCENARIO_NAME: &str = "trident-island";

#[derive(Debug, Clone)]
pub struct ResetOutput {
    pub observations: PerFaction<Vec<f32>>,
    pub infos: PerFaction<StepInfo>,
}

#[derive(Debug, Clone)]
pub struct StepOutput {
    pub observations: PerFaction<Vec<f32>>,
    pub rewards: PerFaction<f64>,
    pub terminations: PerFaction<bool>,
    pub truncations: PerFaction<bool>,
    pub infos: PerFaction<StepInfo>,
}

impl StepOutput {
    /// Both agents share one termination and one truncation flag.
    pub fn done(&self) -> bool {
        self.terminations.legacy || self.truncations.legacy
    }
}

/// Two-faction environment over a backend produced by `F`.
///
/// Call [`set_agents`](Self::set_agents) once, then [`reset`](Self::reset)
/// before each episode. The backend is owned for one episode and destroyed
/// before its replacement is created.
pub struct TridentEnv<F: BackendFactory> {
    config: EnvConfig,
    factory: F,
    factory_ready: bool,
    backend: Option<F::Backend>,
    shapers: Option<PerFaction<Box<dyn RewardShaper>>>,
    agents: PerFaction<FactionAgent>,
    flags: FlagBoard,
    metrics: MissionMetrics,

    seed: u64,
    step_count: u64,
    time_elapsed: f64,
    outcome: Outcome,
    terminated: bool,
    truncated: bool,
    last_events: usize,
    intent: PerFaction<ActionTrails>,
    applied: PerFaction<ActionTrails>,
    rejections: PerFaction<Option<String>>,
    recorder: Option<ReplayRecorder>,
}

impl<F: BackendFactory> TridentEnv<F> {
    pub fn new(config: EnvConfig, factory: F) -> Self {
        let agents = PerFaction::from_fn(|f| FactionAgent::new(f, &config));
        Self {
            config,
            factory,
            factory_ready: false,
            backend: None,
            shapers: None,
            agents,
            flags: FlagBoard::new(),
            metrics: MissionMetrics::new(),
            seed: 0,
            step_count: 0,
            time_elapsed: 0.0,
            outcome: Outcome::Ongoing,
            terminated: false,
            truncated: false,
            last_events: 0,
            intent: PerFaction::default(),
            applied: PerFaction::default(),
            rejections: PerFaction::default(),
            recorder: None,
        }
    }

    /// Record observations, actions and rewards from the next reset on.
    pub fn with_replay(mut self) -> Self {
        self.enable_replay();
        self
    }

    pub fn enable_replay(&mut self) {
        if self.recorder.is_none() {
            self.recorder = Some(ReplayRecorder::new());
        }
    }

    /// Register both agents with their reward shaping.
    pub fn set_agents(
        &mut self,
        legacy: impl RewardShaper + 'static,
        dynasty: impl RewardShaper + 'static,
    ) {
        let legacy: Box<dyn RewardShaper> = Box::new(legacy);
        let dynasty: Box<dyn RewardShaper> = Box::new(dynasty);
        self.shapers = Some(PerFaction::new(legacy, dynasty));
    }

    pub fn agents_registered(&self) -> bool {
        self.shapers.is_some()
    }

    fn require_agents(&self) -> Result<()> {
        if self.agents_registered() {
            Ok(())
        } else {
            Err(TridentError::AgentsNotRegistered)
        }
    }

    pub fn action_space(&self, _faction: Faction) -> Result<ActionSpace> {
        self.require_agents()?;
        Ok(ActionSpace::from_config(&self.config))
    }

    pub fn observation_space(&self, _faction: Faction) -> Result<ObservationSpace> {
        self.require_agents()?;
        Ok(ObservationSpace::from_config(&self.config))
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn backend(&self) -> Option<&F::Backend> {
        self.backend.as_ref()
    }

    pub fn agent(&self, faction: Faction) -> &FactionAgent {
        &self.agents[faction]
    }

    pub fn flags(&self) -> &FlagBoard {
        &self.flags
    }

    pub fn metrics(&self) -> &MissionMetrics {
        &self.metrics
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn time_elapsed(&self) -> f64 {
        self.time_elapsed
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reset(&mut self, seed: Option<u64>) -> Result<ResetOutput> {
        self.require_agents()?;
        if !self.factory_ready {
            self.factory.initialize()?;
            self.factory_ready = true;
        }
        if let Some(old) = self.backend.take() {
            self.factory.destroy(old);
        }

        self.seed = seed.or(self.config.seed).unwrap_or(0);
        let mut backend = self.factory.create(&SimulationConfig {
            scenario_name: SCENARIO_NAME.to_string(),
            seed: self.seed,
            record_replay: self.recorder.is_some(),
        })?;
        self.clear_episode();

        let laydowns = Faction::COMBATANTS
            .iter()
            .map(|&faction| self.laydown_for(faction))
            .collect();
        backend.start_force_laydown(laydowns);
        let events = backend.finalize_force_laydown();
        self.last_events = events.len();
        self.dispatch(&events);
        self.metrics
            .update(&self.agents, &self.flags, &backend, &self.config);
        self.backend = Some(backend);

        let (observations, infos) = self.observe()?;
        if let Some(recorder) = &mut self.recorder {
            recorder.start(&observations);
        }
        info!(
            seed = self.seed,
            legacy_units = self.agents.legacy.entities.len(),
            dynasty_units = self.agents.dynasty.entities.len(),
            "episode reset"
        );
        Ok(ResetOutput {
            observations,
            infos,
        })
    }

    pub fn step(&mut self, actions: PerFaction<Action>) -> Result<StepOutput> {
        let mut backend = self
            .backend
            .take()
            .ok_or(TridentError::BackendUnavailable)?;

        self.step_count += 1;
        self.time_elapsed += self.config.seconds_per_step();

        let (commands, applied) = self.collect_commands(&actions, &backend);
        let events = backend.tick(commands, self.config.frame_rate);
        self.last_events = events.len();
        self.dispatch(&events);
        self.metrics
            .update(&self.agents, &self.flags, &backend, &self.config);
        self.backend = Some(backend);

        if !self.outcome.is_decided() {
            self.outcome = outcome::evaluate(&mut self.metrics, &self.config, self.step_count);
        }
        if let Some(faction) = outcome::decided_by_capture(&self.metrics, self.outcome) {
            self.flags.mark_captured(faction);
        }
        let newly_terminated = self.outcome.is_decided() && !self.terminated;
        let newly_truncated = !self.truncated && self.time_elapsed >= self.config.max_game_time;
        self.terminated = self.outcome.is_decided();
        self.truncated = self.time_elapsed >= self.config.max_game_time;

        let terminal = if newly_terminated {
            outcome::terminal_rewards(self.outcome, self.config.terminal_reward)
        } else {
            PerFaction::default()
        };
        let rewards = PerFaction::from_fn(|faction| {
            let ctx = RewardContext {
                faction,
                step: self.step_count,
                time_elapsed: self.time_elapsed,
                metrics: &self.metrics,
                outcome: self.outcome,
                action_applied: applied[faction],
            };
            let shaping = self
                .shapers
                .as_ref()
                .map_or(0.0, |s| s[faction].step_reward(&ctx));
            shaping + terminal[faction]
        });

        if newly_terminated {
            info!(outcome = ?self.outcome, step = self.step_count, "episode terminated");
        } else if newly_truncated {
            info!(step = self.step_count, "episode truncated at time limit");
        }

        let (observations, infos) = self.observe()?;
        if let Some(recorder) = &mut self.recorder {
            recorder.record(&actions, &observations, &rewards);
        }
        Ok(StepOutput {
            observations,
            rewards,
            terminations: PerFaction::new(self.terminated, self.terminated),
            truncations: PerFaction::new(self.truncated, self.truncated),
            infos,
        })
    }

    /// Destroy the live backend, if any.
    pub fn close(&mut self) {
        if let Some(backend) = self.backend.take() {
            self.factory.destroy(backend);
            debug!("backend released");
        }
    }

    /// The backend's own deterministic replay.
    pub fn export_replay(&self) -> Result<String> {
        self.backend
            .as_ref()
            .ok_or(TridentError::BackendUnavailable)?
            .export_replay()
    }

    pub fn replay_bundle(&self) -> Result<ReplayBundle> {
        let recorder = self
            .recorder
            .as_ref()
            .ok_or_else(|| TridentError::Replay("recording is not enabled".into()))?;
        let summary = EpisodeSummary {
            seed: self.seed,
            steps: self.step_count,
            time_elapsed: self.time_elapsed,
            outcome: self.outcome,
            termination_cause: self.termination_cause(),
        };
        recorder.bundle(summary, &self.config, &self.export_replay()?)
    }

    /// Write the episode so far to `dir/name.w4a.json`.
    pub fn save_replay(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        replay::save(&self.replay_bundle()?, dir, name)
    }

    fn clear_episode(&mut self) {
        for faction in Faction::COMBATANTS {
            self.agents[faction].clear();
        }
        self.flags.clear();
        self.metrics.reset();
        self.step_count = 0;
        self.time_elapsed = 0.0;
        self.outcome = Outcome::Ongoing;
        self.terminated = false;
        self.truncated = false;
        self.last_events = 0;
        self.intent = PerFaction::default();
        self.applied = PerFaction::default();
        self.rejections = PerFaction::default();
    }

    fn laydown_for(&self, faction: Faction) -> ForceLaydown {
        let path = match faction {
            Faction::Legacy => self.config.legacy_force_path.as_deref(),
            Faction::Dynasty => self.config.dynasty_force_path.as_deref(),
            Faction::Neutral => None,
        };
        match path {
            Some(path) => forces::load_force_composition(path, faction),
            None => self.factory.default_laydown(faction),
        }
    }

    fn dispatch(&mut self, events: &[SimEvent]) {
        self.metrics.record_despawn_losses(events, &self.agents);
        let PerFaction { legacy, dynasty } = &mut self.agents;
        let summary = dispatch::dispatch_all(
            events,
            &mut DispatchTargets {
                legacy,
                dynasty,
                shared: &mut self.flags,
            },
        );
        if summary.total() > 0 {
            debug!(
                applied = summary.applied,
                duplicates = summary.duplicates,
                ignored = summary.ignored,
                refused = summary.refused,
                "events dispatched"
            );
        }
    }

    /// Validate both actions and translate the survivors into commands.
    /// Also returns which agents had their action applied.
    fn collect_commands(
        &mut self,
        actions: &PerFaction<Action>,
        backend: &dyn SimulationBackend,
    ) -> (Vec<Command>, PerFaction<bool>) {
        let step = self.step_count;
        let mut commands = Vec::new();
        let mut applied = PerFaction::new(false, false);
        for faction in Faction::COMBATANTS {
            let action = &actions[faction];
            let trail = ActionTrail {
                step,
                action: *action,
            };
            if action.action_type != 0 {
                self.intent[faction].insert(action.entity_id, trail);
            }
            let ctx = ActionContext {
                agent: &self.agents[faction],
                flags: &self.flags,
                backend,
                config: &self.config,
            };
            match validation::validate(action, &ctx) {
                Ok(validated) => {
                    self.rejections[faction] = None;
                    if !validated.is_noop() {
                        self.applied[faction].insert(action.entity_id, trail);
                        commands.extend(execution::commands_for(&validated));
                        applied[faction] = true;
                    }
                }
                Err(rejection) => {
                    debug!(?faction, %rejection, "action rejected, treated as no-op");
                    self.rejections[faction] = Some(rejection.to_string());
                }
            }
        }
        (commands, applied)
    }

    fn termination_cause(&self) -> Option<TerminationCause> {
        if self.terminated || self.truncated {
            outcome::termination_cause(self.outcome, self.truncated)
        } else {
            None
        }
    }

    fn observe(&self) -> Result<(PerFaction<Vec<f32>>, PerFaction<StepInfo>)> {
        let backend: &dyn SimulationBackend = self
            .backend
            .as_ref()
            .ok_or(TridentError::BackendUnavailable)?;
        let observations = PerFaction::from_fn(|faction| {
            observation::build(&ObservationContext {
                agent: &self.agents[faction],
                backend,
                metrics: &self.metrics,
                flags: &self.flags,
                config: &self.config,
                time_elapsed: self.time_elapsed,
            })
        });
        let infos = PerFaction::from_fn(|faction| self.info_for(faction, backend));
        Ok((observations, infos))
    }

    fn info_for(&self, faction: Faction, backend: &dyn SimulationBackend) -> StepInfo {
        let agent = &self.agents[faction];
        let m = &self.metrics;
        let enemy = faction.opponent();
        StepInfo {
            agent: faction.agent_name().to_string(),
            faction,
            step: self.step_count,
            time_elapsed: self.time_elapsed,
            time_remaining: (self.config.max_game_time - self.time_elapsed).max(0.0),
            num_entities: agent.entities.len(),
            num_live_entities: agent.live_entities(backend).len(),
            num_target_groups: agent.target_groups.len(),
            untracked_entities: agent.entities.refused(),
            untracked_target_groups: agent.target_groups.refused(),
            last_events_count: self.last_events,
            valid_masks: masks::compute(agent, backend),
            refuel_masks: masks::refuel(agent, backend),
            mission: MissionInfo {
                casualties: m.casualties(faction),
                kills: m.kills(faction),
                kill_ratio: m.kill_ratio(faction),
                capture_progress: m.capture_progress[faction],
                enemy_capture_progress: enemy.map_or(0.0, |e| m.capture_progress[e]),
                capture_possible: m.capture_possible[faction],
                enemy_capture_possible: enemy.is_some_and(|e| m.capture_possible[e]),
                island_contested: m.island_contested,
                capture_completed_step: m.capture_completed_step[faction],
                outcome: self.outcome,
            },
            action_intent: self.intent[faction].clone(),
            action_applied: self.applied[faction].clone(),
            last_rejection: self.rejections[faction].clone(),
            termination_cause: self.termination_cause(),
            backend_victory: self.flags.backend_victory(),
        }
    }
}

impl<F: BackendFactory> Drop for TridentEnv<F> {
    fn drop(&mut self) {
        self.close();
    }
}
