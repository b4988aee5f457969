//! Outcome evaluation.
//!
//! Evaluated fresh each step from the mission metrics. The only state it
//! writes is the first-completion step of a capture, used to break ties.

use trident_core::config::EnvConfig;
use trident_core::enums::{Faction, Outcome, TerminationCause};
use trident_core::types::PerFaction;

use crate::metrics::MissionMetrics;

pub fn evaluate(metrics: &mut MissionMetrics, config: &EnvConfig, step: u64) -> Outcome {
    // 1. Mark capture completion the first time the threshold is crossed.
    for faction in Faction::COMBATANTS {
        if metrics.capture_progress[faction] >= config.capture_required_seconds
            && metrics.capture_possible[faction]
            && metrics.capture_completed_step[faction].is_none()
        {
            metrics.capture_completed_step[faction] = Some(step);
        }
    }

    // 2-3. Capture decides before attrition.
    match (
        metrics.capture_completed_step.legacy,
        metrics.capture_completed_step.dynasty,
    ) {
        (Some(l), Some(d)) if l < d => return Outcome::LegacyWin,
        (Some(l), Some(d)) if d < l => return Outcome::DynastyWin,
        (Some(_), Some(_)) => return Outcome::Draw,
        (Some(_), None) => return Outcome::LegacyWin,
        (None, Some(_)) => return Outcome::DynastyWin,
        (None, None) => {}
    }

    // 4. Kill ratios. A low ratio only loses once capture is out of reach.
    let threshold = config.kill_ratio_threshold.max(f64::EPSILON);
    let wins = |faction: Faction| -> bool {
        let loses = |f: Faction| {
            metrics.kill_ratio(f) <= 1.0 / threshold && !metrics.capture_possible[f]
        };
        let opponent_loses = faction.opponent().is_some_and(loses);
        metrics.kill_ratio(faction) >= threshold || opponent_loses
    };
    match (wins(Faction::Legacy), wins(Faction::Dynasty)) {
        (true, false) => Outcome::LegacyWin,
        (false, true) => Outcome::DynastyWin,
        (true, true) => Outcome::Draw,
        (false, false) => Outcome::Ongoing,
    }
}

/// Zero-sum terminal reward for a decided outcome.
pub fn terminal_rewards(outcome: Outcome, magnitude: f64) -> PerFaction<f64> {
    match outcome {
        Outcome::LegacyWin => PerFaction::new(magnitude, -magnitude),
        Outcome::DynastyWin => PerFaction::new(-magnitude, magnitude),
        Outcome::Draw | Outcome::Ongoing => PerFaction::new(0.0, 0.0),
    }
}

/// Why the episode stopped, if it did.
pub fn termination_cause(outcome: Outcome, truncated: bool) -> Option<TerminationCause> {
    match outcome {
        Outcome::LegacyWin => Some(TerminationCause::LegacyWin),
        Outcome::DynastyWin => Some(TerminationCause::DynastyWin),
        Outcome::Draw => Some(TerminationCause::Draw),
        Outcome::Ongoing if truncated => Some(TerminationCause::TimeLimit),
        Outcome::Ongoing => None,
    }
}

/// Whether the outcome came from a completed capture.
pub fn decided_by_capture(metrics: &MissionMetrics, outcome: Outcome) -> Option<Faction> {
    let winner = outcome.winner()?;
    metrics.capture_completed_step[winner].map(|_| winner)
}

#[cfg(test)]
mod tests {
    use trident_core::types::EntityHandle;

    use super::*;

    fn config() -> EnvConfig {
        EnvConfig {
            capture_required_seconds: 100.0,
            kill_ratio_threshold: 5.0,
            ..EnvConfig::default()
        }
    }

    fn metrics() -> MissionMetrics {
        let mut m = MissionMetrics::new();
        m.capture_possible = PerFaction::new(true, true);
        m
    }

    #[test]
    fn ongoing_by_default() {
        let mut m = metrics();
        assert_eq!(evaluate(&mut m, &config(), 1), Outcome::Ongoing);
    }

    #[test]
    fn single_capture_wins_and_marks_step() {
        let mut m = metrics();
        m.capture_progress.dynasty = 100.0;
        assert_eq!(evaluate(&mut m, &config(), 12), Outcome::DynastyWin);
        assert_eq!(m.capture_completed_step.dynasty, Some(12));
        // Never overwritten.
        evaluate(&mut m, &config(), 13);
        assert_eq!(m.capture_completed_step.dynasty, Some(12));
    }

    #[test]
    fn capture_needs_possibility() {
        let mut m = metrics();
        m.capture_progress.legacy = 500.0;
        m.capture_possible.legacy = false;
        // One kill keeps Legacy off the losing kill ratio.
        m.insert_casualty(Faction::Dynasty, EntityHandle(1));
        assert_eq!(evaluate(&mut m, &config(), 3), Outcome::Ongoing);
        assert_eq!(m.capture_completed_step.legacy, None);
    }

    #[test]
    fn stalled_capture_without_kills_loses_on_ratio() {
        let mut m = metrics();
        m.capture_progress.legacy = 500.0;
        m.capture_possible.legacy = false;
        assert_eq!(evaluate(&mut m, &config(), 3), Outcome::DynastyWin);
        assert_eq!(m.capture_completed_step.legacy, None);
        assert_eq!(decided_by_capture(&m, Outcome::DynastyWin), None);
    }

    #[test]
    fn earlier_capture_wins_tie_break() {
        let mut m = metrics();
        m.capture_completed_step = PerFaction::new(Some(8), Some(5));
        assert_eq!(evaluate(&mut m, &config(), 9), Outcome::DynastyWin);
        m.capture_completed_step = PerFaction::new(Some(4), Some(5));
        assert_eq!(evaluate(&mut m, &config(), 9), Outcome::LegacyWin);
    }

    #[test]
    fn simultaneous_capture_is_draw() {
        let mut m = metrics();
        m.capture_progress = PerFaction::new(100.0, 100.0);
        assert_eq!(evaluate(&mut m, &config(), 7), Outcome::Draw);
    }

    #[test]
    fn kill_ratio_win() {
        let mut m = metrics();
        for h in 0..5 {
            m.insert_casualty(Faction::Dynasty, EntityHandle(h));
        }
        assert_eq!(m.kill_ratio(Faction::Legacy), 5.0);
        assert_eq!(evaluate(&mut m, &config(), 2), Outcome::LegacyWin);
    }

    #[test]
    fn low_ratio_loses_only_without_capture() {
        let mut m = metrics();
        // Dynasty: 1 kill against 4 losses is below threshold, but Legacy
        // at 4.0 is not yet a win on its own.
        m.insert_casualty(Faction::Legacy, EntityHandle(100));
        for h in 0..4 {
            m.insert_casualty(Faction::Dynasty, EntityHandle(h));
        }
        m.insert_casualty(Faction::Dynasty, EntityHandle(50));
        m.insert_casualty(Faction::Legacy, EntityHandle(101));
        // Legacy 5/2 = 2.5, Dynasty 2/5 = 0.4: nothing decided.
        assert_eq!(evaluate(&mut m, &config(), 2), Outcome::Ongoing);

        let mut m = metrics();
        m.insert_casualty(Faction::Legacy, EntityHandle(100));
        for h in 0..4 {
            m.insert_casualty(Faction::Dynasty, EntityHandle(h));
        }
        // Legacy 4/1 = 4.0, Dynasty 1/4 = 0.25 > 0.2: still ongoing.
        assert_eq!(evaluate(&mut m, &config(), 2), Outcome::Ongoing);

        let mut m = metrics();
        for h in 0..3 {
            m.insert_casualty(Faction::Dynasty, EntityHandle(h));
        }
        m.capture_possible.dynasty = false;
        // Dynasty 0/3 = 0 <= 0.2 with no capture left: Legacy wins.
        assert_eq!(evaluate(&mut m, &config(), 2), Outcome::LegacyWin);
        m.capture_possible.dynasty = true;
        assert_eq!(evaluate(&mut m, &config(), 3), Outcome::Ongoing);
    }

    #[test]
    fn rewards_are_zero_sum() {
        for outcome in [Outcome::LegacyWin, Outcome::DynastyWin, Outcome::Draw] {
            let r = terminal_rewards(outcome, 100.0);
            assert_eq!(r.legacy + r.dynasty, 0.0);
        }
        assert_eq!(terminal_rewards(Outcome::LegacyWin, 100.0).legacy, 100.0);
    }

    #[test]
    fn causes() {
        assert_eq!(termination_cause(Outcome::Ongoing, false), None);
        assert_eq!(
            termination_cause(Outcome::Ongoing, true),
            Some(TerminationCause::TimeLimit)
        );
        assert_eq!(
            termination_cause(Outcome::Draw, true),
            Some(TerminationCause::Draw)
        );
    }
}
