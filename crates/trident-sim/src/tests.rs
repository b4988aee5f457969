#[cfg(test)]
mod tests {
    use trident_core::backend::{
        ForceLaydown, SimulationBackend, SimulationConfig, UnitSpec, WeaponSpec,
    };
    use trident_core::commands::Command;
    use trident_core::entity::{Capabilities, EntityState, FlagState};
    use trident_core::enums::*;
    use trident_core::events::{DespawnedObject, SimEvent, SpawnedObject};
    use trident_core::types::{EntityHandle, Position, TargetGroupHandle};

    use crate::constants::CORPSE_RETENTION_FRAMES;
    use crate::engine::{SandboxSimulation, SimReplay};
    use crate::scenario;
    use crate::systems::orders::racetrack_waypoints;

    const FRAME_RATE: u32 = 600;

    fn config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            scenario_name: "test".into(),
            seed,
            record_replay: true,
        }
    }

    /// Sandbox with the default symmetric forces laid down.
    fn default_sim(seed: u64) -> (SandboxSimulation, Vec<SimEvent>) {
        let mut sim = SandboxSimulation::new(&config(seed));
        sim.start_force_laydown(vec![
            scenario::default_laydown(Faction::Legacy),
            scenario::default_laydown(Faction::Dynasty),
        ]);
        let events = sim.finalize_force_laydown();
        (sim, events)
    }

    fn spawned_entities(events: &[SimEvent]) -> Vec<EntityState> {
        events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Spawned {
                    object: SpawnedObject::Entity(state),
                } => Some(state.clone()),
                _ => None,
            })
            .collect()
    }

    fn spawned_flags(events: &[SimEvent]) -> Vec<FlagState> {
        events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Spawned {
                    object: SpawnedObject::Flag(state),
                } => Some(state.clone()),
                _ => None,
            })
            .collect()
    }

    fn find(entities: &[EntityState], faction: Faction, name: &str) -> EntityHandle {
        entities
            .iter()
            .find(|e| e.faction == faction && e.name == name)
            .map(|e| e.handle)
            .unwrap()
    }

    fn unit(name: &str, domain: Domain, capabilities: Capabilities) -> UnitSpec {
        UnitSpec {
            name: name.into(),
            domain,
            controllable: true,
            capabilities,
            weapons: Vec::new(),
            max_speed: 250.0,
            radar_range_km: 0.0,
            endurance_secs: 0.0,
        }
    }

    #[test]
    fn test_laydown_spawns_flags_and_forces() {
        let (_sim, events) = default_sim(42);
        let flags = spawned_flags(&events);
        assert_eq!(flags.len(), 3);
        assert_eq!(
            flags.iter().filter(|f| f.faction == Faction::Neutral).count(),
            1
        );
        let units = spawned_entities(&events);
        let per_side = scenario::default_laydown(Faction::Legacy).units.len();
        assert_eq!(units.len(), per_side * 2);
        assert!(units.iter().all(|u| u.alive));
        assert!(units.iter().any(|u| !u.controllable));
    }

    #[test]
    fn test_units_spawn_inside_their_zone() {
        let (_sim, events) = default_sim(7);
        for state in spawned_entities(&events) {
            let zone = scenario::spawn_zone(state.faction, state.domain);
            let dist = zone.center.horizontal_range_to(&state.position);
            assert!(dist <= zone.radius + 1e-6, "{} outside zone", state.name);
            if state.domain == Domain::Air {
                assert!(state.position.z > 0.0);
            } else {
                assert_eq!(state.position.z, 0.0);
            }
        }
    }

    #[test]
    fn test_determinism_same_seed() {
        let (mut a, ev_a) = default_sim(99);
        let (mut b, ev_b) = default_sim(99);
        assert_eq!(
            serde_json::to_string(&ev_a).unwrap(),
            serde_json::to_string(&ev_b).unwrap()
        );
        for _ in 0..30 {
            let ea = a.tick(Vec::new(), FRAME_RATE);
            let eb = b.tick(Vec::new(), FRAME_RATE);
            assert_eq!(ea, eb);
        }
        assert_eq!(a.export_replay().unwrap(), b.export_replay().unwrap());
    }

    #[test]
    fn test_different_seeds_differ() {
        let (_a, ev_a) = default_sim(1);
        let (_b, ev_b) = default_sim(2);
        assert_ne!(
            serde_json::to_string(&ev_a).unwrap(),
            serde_json::to_string(&ev_b).unwrap()
        );
    }

    #[test]
    fn test_air_patrols_and_surface_holds() {
        let (mut sim, events) = default_sim(3);
        let units = spawned_entities(&events);
        let fighter = find(&units, Faction::Legacy, "Fighter-1");
        let destroyer = find(&units, Faction::Legacy, "Destroyer-1");
        let f0 = sim.entity(fighter).unwrap().position;
        let d0 = sim.entity(destroyer).unwrap().position;
        sim.tick(Vec::new(), FRAME_RATE);
        let f1 = sim.entity(fighter).unwrap();
        assert!(f1.position.horizontal_range_to(&f0) > 0.0);
        assert!(f1.speed > 0.0);
        assert_eq!(sim.entity(destroyer).unwrap().position, d0);
    }

    #[test]
    fn test_racetrack_waypoints_geometry() {
        let center = Position::new(1000.0, 2000.0, 5000.0);
        let pts = racetrack_waypoints(&center, 40_000.0, 10_000.0, 0.0);
        assert_eq!(pts.len(), 4);
        // Long axis along North at angle zero.
        assert!((pts[0].y - 22_000.0).abs() < 1e-6);
        assert!((pts[0].x - 6_000.0).abs() < 1e-6);
        assert!((pts[0].range_to(&pts[1]) - 10_000.0).abs() < 1e-6);
        assert!((pts[1].range_to(&pts[2]) - 40_000.0).abs() < 1e-6);
        assert!(pts.iter().all(|p| p.z == 5000.0));
    }

    #[test]
    fn test_patrol_command_redirects_aircraft() {
        let (mut sim, events) = default_sim(5);
        let fighter = find(&spawned_entities(&events), Faction::Legacy, "Fighter-2");
        let center = Position::new(0.0, 0.0, 8000.0);
        sim.tick(
            vec![Command::PatrolRaceTrack {
                entity: fighter,
                center,
                axis_long: 100_000.0,
                axis_short: 100_000.0,
                angle: 0.0,
            }],
            FRAME_RATE,
        );
        let before = sim.entity(fighter).unwrap().position.horizontal_range_to(&center);
        for _ in 0..5 {
            sim.tick(Vec::new(), FRAME_RATE);
        }
        let after = sim.entity(fighter).unwrap().position.horizontal_range_to(&center);
        assert!(after < before);
    }

    #[test]
    fn test_radar_strength_and_focus() {
        let (mut sim, events) = default_sim(11);
        let aew = find(&spawned_entities(&events), Faction::Dynasty, "AEW-1");
        assert!(sim.entity(aew).unwrap().radar_enabled);
        let focus = Position::new(0.0, 0.0, 0.0);
        sim.tick(
            vec![
                Command::SetRadarStrength {
                    entity: aew,
                    strength: 0.0,
                },
                Command::SetRadarFocus { entity: aew, focus },
            ],
            FRAME_RATE,
        );
        let state = sim.entity(aew).unwrap();
        assert!(!state.radar_enabled);
        assert_eq!(state.radar_focus, Some(focus));
        sim.tick(vec![Command::ClearRadarFocus { entity: aew }], FRAME_RATE);
        assert_eq!(sim.entity(aew).unwrap().radar_focus, None);
    }

    #[test]
    fn test_transport_captures_island_flag() {
        let (mut sim, events) = default_sim(17);
        let transport = find(&spawned_entities(&events), Faction::Legacy, "Transport-1");
        let island = spawned_flags(&events)
            .into_iter()
            .find(|f| f.faction == Faction::Neutral)
            .unwrap();
        sim.tick(
            vec![Command::CaptureFlag {
                entity: transport,
                flag: island.handle,
            }],
            FRAME_RATE,
        );
        let mut capturing = false;
        for _ in 0..200 {
            sim.tick(Vec::new(), FRAME_RATE);
            if sim.entity(transport).unwrap().capturing {
                capturing = true;
                break;
            }
        }
        assert!(capturing);
        let state = sim.entity(transport).unwrap();
        assert!(state.position.horizontal_range_to(&island.position) < 2_000.0);
    }

    #[test]
    fn test_dead_unit_persists_before_despawn() {
        let (mut sim, events) = default_sim(23);
        let destroyer = find(&spawned_entities(&events), Faction::Dynasty, "Destroyer-2");
        sim.kill_unit(destroyer);

        let first = sim.tick(Vec::new(), FRAME_RATE);
        assert!(!first.iter().any(|e| matches!(
            e,
            SimEvent::Despawned { object: DespawnedObject::Entity { handle, .. } } if *handle == destroyer
        )));
        let state = sim.entity(destroyer).unwrap();
        assert!(!state.alive);

        let ticks = CORPSE_RETENTION_FRAMES / u64::from(FRAME_RATE) + 1;
        let mut despawned = false;
        for _ in 0..ticks {
            let events = sim.tick(Vec::new(), FRAME_RATE);
            despawned |= events.iter().any(|e| matches!(
                e,
                SimEvent::Despawned { object: DespawnedObject::Entity { handle, faction } }
                    if *handle == destroyer && *faction == Faction::Dynasty
            ));
        }
        assert!(despawned);
        assert!(sim.entity(destroyer).is_none());
    }

    #[test]
    fn test_victory_when_force_eliminated() {
        let mut sim = SandboxSimulation::new(&config(4));
        sim.start_force_laydown(vec![
            ForceLaydown {
                faction: Faction::Legacy,
                units: vec![unit("Lone", Domain::Land, Capabilities::default())],
            },
            ForceLaydown {
                faction: Faction::Dynasty,
                units: vec![unit("Lone", Domain::Land, Capabilities::default())],
            },
        ]);
        let events = sim.finalize_force_laydown();
        let lone = find(&spawned_entities(&events), Faction::Legacy, "Lone");
        sim.kill_unit(lone);
        let events = sim.tick(Vec::new(), FRAME_RATE);
        assert!(events.contains(&SimEvent::Victory {
            faction: Faction::Dynasty
        }));
        // Declared once only.
        let events = sim.tick(Vec::new(), FRAME_RATE);
        assert!(!events.iter().any(|e| matches!(e, SimEvent::Victory { .. })));
    }

    /// A Legacy interceptor and a Dynasty transport both flying to the island.
    fn intercept_sim() -> (SandboxSimulation, EntityHandle, EntityHandle) {
        let mut sim = SandboxSimulation::new(&config(8));
        let mut interceptor = unit(
            "Interceptor",
            Domain::Air,
            Capabilities {
                radar: true,
                ..Capabilities::default()
            },
        );
        interceptor.radar_range_km = 80.0;
        interceptor.weapons = vec![
            WeaponSpec {
                name: "AAM".into(),
                target_domains: vec![Domain::Air],
                ammo: 20,
                range_km: 50.0,
            },
            WeaponSpec {
                name: "Bomb".into(),
                target_domains: vec![Domain::Land],
                ammo: 2,
                range_km: 5.0,
            },
        ];
        sim.start_force_laydown(vec![
            ForceLaydown {
                faction: Faction::Legacy,
                units: vec![interceptor],
            },
            ForceLaydown {
                faction: Faction::Dynasty,
                units: vec![unit(
                    "Transport",
                    Domain::Air,
                    Capabilities {
                        capture: true,
                        ..Capabilities::default()
                    },
                )],
            },
        ]);
        let events = sim.finalize_force_laydown();
        let units = spawned_entities(&events);
        let island = spawned_flags(&events)
            .into_iter()
            .find(|f| f.faction == Faction::Neutral)
            .unwrap();
        let hunter = find(&units, Faction::Legacy, "Interceptor");
        let prey = find(&units, Faction::Dynasty, "Transport");
        sim.tick(
            vec![
                Command::CaptureFlag {
                    entity: hunter,
                    flag: island.handle,
                },
                Command::CaptureFlag {
                    entity: prey,
                    flag: island.handle,
                },
            ],
            FRAME_RATE,
        );
        (sim, hunter, prey)
    }

    #[test]
    fn test_contact_then_weapons_commit() {
        let (mut sim, hunter, prey) = intercept_sim();
        let mut group: Option<TargetGroupHandle> = None;
        for _ in 0..100 {
            for event in sim.tick(Vec::new(), FRAME_RATE) {
                if let SimEvent::AdversaryContact { group: g } = event {
                    if g.faction == Faction::Legacy {
                        assert_eq!(g.observed_faction, Faction::Dynasty);
                        group = Some(g.handle);
                    }
                }
            }
            if group.is_some() {
                break;
            }
        }
        let group = group.unwrap();

        // Only the air-capable mount is offered against an air group.
        let weapons = sim.select_weapons(hunter, group);
        assert_eq!(weapons.len(), 1);
        assert!(sim.select_weapons(prey, group).is_empty());

        sim.tick(
            vec![Command::CommitWeapons {
                entity: hunter,
                target: group,
                weapons: weapons.clone(),
                usage: WeaponUsage::TwoShotsPerAdversary,
                posture: EngagementPosture::Aggressive,
                throttle: 1.0,
                wez_scale: 1.0,
            }],
            FRAME_RATE,
        );
        for _ in 0..50 {
            if !sim.entity(prey).is_some_and(|p| p.alive) {
                break;
            }
            sim.tick(Vec::new(), FRAME_RATE);
        }
        let ammo = sim.entity(hunter).unwrap().weapons[0].ammo;
        assert!(ammo < 20, "no rounds fired");
        assert!(!sim.entity(prey).is_some_and(|p| p.alive));
    }

    #[test]
    fn test_replay_export_decodes() {
        let (mut sim, _) = default_sim(31);
        sim.tick(Vec::new(), FRAME_RATE);
        sim.tick(Vec::new(), FRAME_RATE);
        let json = sim.export_replay().unwrap();
        let replay: SimReplay = serde_json::from_str(&json).unwrap();
        assert_eq!(replay.seed, 31);
        assert_eq!(replay.frames.len(), 3);
        assert_eq!(replay.frames[2].frame, 2 * u64::from(FRAME_RATE));
    }
}
