//! Enumeration types used throughout the environment.

use serde::{Deserialize, Serialize};

/// Force allegiance. `Neutral` only ever owns the central objective flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    Legacy,
    Dynasty,
    Neutral,
}

impl Faction {
    /// The two factions that field forces and agents.
    pub const COMBATANTS: [Faction; 2] = [Faction::Legacy, Faction::Dynasty];

    /// The opposing combatant, if any.
    pub fn opponent(self) -> Option<Faction> {
        match self {
            Faction::Legacy => Some(Faction::Dynasty),
            Faction::Dynasty => Some(Faction::Legacy),
            Faction::Neutral => None,
        }
    }

    pub fn is_combatant(self) -> bool {
        self != Faction::Neutral
    }

    /// Agent name used in info dictionaries and replay files.
    pub fn agent_name(self) -> &'static str {
        match self {
            Faction::Legacy => "legacy_agent",
            Faction::Dynasty => "dynasty_agent",
            Faction::Neutral => "neutral",
        }
    }
}

/// Operating domain of a unit or detected group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    Air,
    Surface,
    Land,
}

/// The eight discrete action kinds, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    Noop,
    Move,
    Engage,
    Stealth,
    SensingPosition,
    Capture,
    ReturnToBase,
    Refuel,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::Noop,
        ActionKind::Move,
        ActionKind::Engage,
        ActionKind::Stealth,
        ActionKind::SensingPosition,
        ActionKind::Capture,
        ActionKind::ReturnToBase,
        ActionKind::Refuel,
    ];

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// How many weapons are committed per target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponUsage {
    #[default]
    OneShotPerUnit,
    OneShotPerAdversary,
    TwoShotsPerAdversary,
}

impl WeaponUsage {
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(WeaponUsage::OneShotPerUnit),
            1 => Some(WeaponUsage::OneShotPerAdversary),
            2 => Some(WeaponUsage::TwoShotsPerAdversary),
            _ => None,
        }
    }

    /// Shots fired per selected weapon in a single firing pass.
    pub fn shots_per_weapon(self) -> u32 {
        match self {
            WeaponUsage::OneShotPerUnit | WeaponUsage::OneShotPerAdversary => 1,
            WeaponUsage::TwoShotsPerAdversary => 2,
        }
    }
}

/// Rules-of-engagement posture for a weapons commitment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngagementPosture {
    Defensive,
    #[default]
    Cautious,
    Assertive,
    Aggressive,
}

impl EngagementPosture {
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(EngagementPosture::Defensive),
            1 => Some(EngagementPosture::Cautious),
            2 => Some(EngagementPosture::Assertive),
            3 => Some(EngagementPosture::Aggressive),
            _ => None,
        }
    }
}

/// Mission outcome as judged after each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Ongoing,
    LegacyWin,
    DynastyWin,
    Draw,
}

impl Outcome {
    pub fn is_decided(self) -> bool {
        self != Outcome::Ongoing
    }

    pub fn winner(self) -> Option<Faction> {
        match self {
            Outcome::LegacyWin => Some(Faction::Legacy),
            Outcome::DynastyWin => Some(Faction::Dynasty),
            Outcome::Ongoing | Outcome::Draw => None,
        }
    }

    pub fn win_for(faction: Faction) -> Self {
        match faction {
            Faction::Legacy => Outcome::LegacyWin,
            Faction::Dynasty => Outcome::DynastyWin,
            Faction::Neutral => Outcome::Draw,
        }
    }
}

/// Why an episode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCause {
    LegacyWin,
    DynastyWin,
    Draw,
    TimeLimit,
}
