#[cfg(test)]
mod tests {
    use crate::action::{Action, ActionSpace, ObservationSpace};
    use crate::commands::Command;
    use crate::config::EnvConfig;
    use crate::enums::*;
    use crate::events::{DespawnedObject, SimEvent};
    use crate::types::{EntityHandle, PerFaction, Position, TargetGroupHandle};

    #[test]
    fn test_faction_serde() {
        for v in [Faction::Legacy, Faction::Dynasty, Faction::Neutral] {
            let json = serde_json::to_string(&v).unwrap();
            let back: Faction = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_faction_opponent() {
        assert_eq!(Faction::Legacy.opponent(), Some(Faction::Dynasty));
        assert_eq!(Faction::Dynasty.opponent(), Some(Faction::Legacy));
        assert_eq!(Faction::Neutral.opponent(), None);
        assert!(!Faction::Neutral.is_combatant());
    }

    #[test]
    fn test_action_kind_indices() {
        for (i, kind) in ActionKind::ALL.iter().enumerate() {
            assert_eq!(kind.index() as usize, i);
            assert_eq!(ActionKind::from_index(i as i64), Some(*kind));
        }
        assert_eq!(ActionKind::from_index(8), None);
        assert_eq!(ActionKind::from_index(-1), None);
    }

    #[test]
    fn test_weapon_usage_and_posture_decode() {
        assert_eq!(WeaponUsage::from_index(2), Some(WeaponUsage::TwoShotsPerAdversary));
        assert_eq!(WeaponUsage::from_index(3), None);
        assert_eq!(EngagementPosture::from_index(3), Some(EngagementPosture::Aggressive));
        assert_eq!(EngagementPosture::from_index(4), None);
    }

    #[test]
    fn test_outcome_winner() {
        assert_eq!(Outcome::LegacyWin.winner(), Some(Faction::Legacy));
        assert_eq!(Outcome::Draw.winner(), None);
        assert!(Outcome::Draw.is_decided());
        assert!(!Outcome::Ongoing.is_decided());
        assert_eq!(Outcome::win_for(Faction::Dynasty), Outcome::DynastyWin);
    }

    #[test]
    fn test_position_range() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3000.0, 4000.0, 0.0);
        assert!((a.range_to(&b) - 5000.0).abs() < 1e-6);
        assert!((a.horizontal_range_to(&b) - 5000.0).abs() < 1e-6);
    }

    #[test]
    fn test_position_bearing() {
        let origin = Position::new(0.0, 0.0, 0.0);
        let north = Position::new(0.0, 1000.0, 0.0);
        let east = Position::new(1000.0, 0.0, 0.0);
        assert!(origin.bearing_to(&north).abs() < 1e-6);
        assert!((origin.bearing_to(&east) - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_per_faction_index() {
        let mut pf = PerFaction::new(1, 2);
        pf[Faction::Dynasty] += 10;
        assert_eq!(pf[Faction::Legacy], 1);
        assert_eq!(pf[Faction::Dynasty], 12);
        let doubled = pf.map(|_, v| v * 2);
        assert_eq!(doubled.legacy, 2);
    }

    #[test]
    #[should_panic]
    fn test_per_faction_neutral_panics() {
        let pf = PerFaction::new(0, 0);
        let _ = pf[Faction::Neutral];
    }

    #[test]
    fn test_config_derived_quantities() {
        let config = EnvConfig::default();
        assert_eq!(config.grid_size(), 25);
        assert_eq!(config.grid_cell_count(), 625);
        assert_eq!(config.patrol_steps(), 37);
        assert_eq!(config.angle_steps(), 36);
        assert_eq!(config.max_weapon_combinations(), 31);
        assert!((config.seconds_per_step() - 10.0).abs() < 1e-9);
        assert_eq!(config.max_episode_steps(), 10_000);
    }

    #[test]
    fn test_grid_decoding_corners() {
        let config = EnvConfig::default();
        let first = config.grid_to_position(0);
        assert_eq!(first.x, -125_000.0);
        assert_eq!(first.y, -125_000.0);
        let last = config.grid_to_position(config.grid_cell_count() - 1);
        assert_eq!(last.x, 115_000.0);
        assert_eq!(last.y, 115_000.0);
        assert!(config.in_bounds(&first));
        assert!(config.in_bounds(&last));
        assert!(!config.in_bounds(&Position::new(126_000.0, 0.0, 0.0)));
    }

    #[test]
    fn test_position_to_grid_inverts_and_clamps() {
        let config = EnvConfig::default();
        for index in [0, 1, 26, 312, 624] {
            let pos = config.grid_to_position(index);
            assert_eq!(config.position_to_grid(&pos), index);
        }
        let far = Position::new(1e9, -1e9, 0.0);
        assert_eq!(config.position_to_grid(&far), 24);
    }

    #[test]
    fn test_patrol_decoding() {
        let config = EnvConfig::default();
        assert_eq!(config.patrol_axis_m(0), 100_000.0);
        assert_eq!(config.patrol_axis_m(36), 1_000_000.0);
        assert!((config.patrol_angle_rad(9) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{ "frame_rate": 60, "seed": 7 }"#;
        let config: EnvConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_entities, 100);
    }

    #[test]
    fn test_config_file_round_trip() {
        let path = std::env::temp_dir().join("trident_core_config_test.json");
        let config = EnvConfig {
            kill_ratio_threshold: 3.0,
            ..EnvConfig::default()
        };
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        let loaded = EnvConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_action_space_bounds() {
        let config = EnvConfig::default();
        let space = ActionSpace::from_config(&config);
        assert_eq!(
            space.nvec(),
            vec![8, 100, 625, 37, 37, 36, 50, 31, 3, 4, 2, 626, 100]
        );
        assert!(space.contains(&Action::noop()));
        let mut action = Action::noop();
        action.move_center_grid = 625;
        assert!(!space.contains(&action));
        action.move_center_grid = -1;
        assert!(!space.contains(&action));
    }

    #[test]
    fn test_action_array_round_trip() {
        let values = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
        assert_eq!(Action::from_array(values).to_array(), values);
        let move_action = Action::new(ActionKind::Move, 4);
        assert_eq!(move_action.kind(), Some(ActionKind::Move));
        assert_eq!(move_action.entity_id, 4);
    }

    #[test]
    fn test_observation_space_len() {
        let config = EnvConfig::default();
        let space = ObservationSpace::from_config(&config);
        assert_eq!(space.len, 12 + 27 * 100 + 10 * 50);
        assert!(space.contains(&vec![0.5; space.len]));
        assert!(!space.contains(&vec![f32::NAN; space.len]));
        assert!(!space.contains(&vec![0.5; 3]));
    }

    #[test]
    fn test_command_target_entity() {
        let cmd = Command::Refuel {
            receiver: EntityHandle(3),
            provider: EntityHandle(9),
        };
        assert_eq!(cmd.entity(), EntityHandle(3));
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn test_event_serde() {
        let event = SimEvent::Despawned {
            object: DespawnedObject::TargetGroup {
                handle: TargetGroupHandle(12),
                observer: Faction::Legacy,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: SimEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
