//! Roadway and simulation behaviour tests

use std::collections::{HashMap, HashSet};

use assert_approx_eq::assert_approx_eq;
use highway_sim::simulation::{
    Dynamics, Roadway, SimParams, Simulation, Status, VehicleAttributes, VehicleId,
    REMOVAL_THRESHOLD, SPAWN_POSITION,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DYNAMICS: Dynamics = Dynamics {
    accel_coef: 10.0,
    decel_coef: 10.0,
};

fn place(roadway: &mut Roadway, position: f32, initial_speed: f32, current_speed: f32) -> VehicleId {
    roadway.add_vehicle(&VehicleAttributes {
        position,
        initial_speed,
        current_speed,
        dynamics: DYNAMICS,
    })
}

fn fixed_params(speed: f32, interval: i32) -> SimParams {
    SimParams {
        min_speed: speed,
        max_speed: speed,
        min_spawn_interval: interval,
        max_spawn_interval: interval,
        ..SimParams::default()
    }
}

#[test]
fn test_overlapping_vehicles_both_crash() {
    let mut roadway = Roadway::new();
    let mut rng = StdRng::seed_from_u64(1);
    let rear = place(&mut roadway, 0.0, 25.0, 25.0);
    let lead = place(&mut roadway, 2.0, 0.0, 0.0);

    let report = roadway.step(0.1, false, &SimParams::default(), &mut rng);

    assert_eq!(report.crashes, 1);
    let rear = roadway.vehicle(rear).expect("rear vehicle");
    let lead = roadway.vehicle(lead).expect("lead vehicle");
    assert_eq!(rear.status(), Status::Crashed);
    assert_eq!(lead.status(), Status::Crashed);
    assert_eq!(rear.position(), 0.0);
    assert_eq!(lead.position(), 2.0);
    assert!(rear.crash_timer() < lead.crash_timer());
}

#[test]
fn test_close_following_at_equal_speed_does_not_crash() {
    let mut roadway = Roadway::new();
    let mut rng = StdRng::seed_from_u64(1);
    let rear = place(&mut roadway, 0.0, 25.0, 25.0);
    let lead = place(&mut roadway, 5.01, 25.0, 25.0);

    let report = roadway.step(0.001, false, &SimParams::default(), &mut rng);

    assert_eq!(report.crashes, 0);
    let rear = roadway.vehicle(rear).expect("rear vehicle");
    let lead = roadway.vehicle(lead).expect("lead vehicle");
    assert_ne!(rear.status(), Status::Crashed);
    assert_ne!(lead.status(), Status::Crashed);
    assert!(rear.front() <= lead.position());
    assert!(rear.position() > 0.0);
}

#[test]
fn test_first_step_spawns_vehicle_at_start() {
    let mut sim = Simulation::with_seed(fixed_params(30.0, 5), 42);
    assert!(sim.roadway().is_empty());
    assert_eq!(sim.spawn_countdown(), 0);

    let report = sim.step(0.001);

    let vehicles = sim.roadway().vehicles();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(report.spawned, Some(vehicles[0].id()));
    assert_approx_eq!(vehicles[0].speed(), 15.0);
    assert_approx_eq!(vehicles[0].initial_speed(), 15.0);
    assert_eq!(vehicles[0].position(), SPAWN_POSITION);
    assert_eq!(sim.spawn_countdown(), 5);
}

#[test]
fn test_vehicle_past_threshold_is_removed() {
    let mut roadway = Roadway::new();
    let mut rng = StdRng::seed_from_u64(1);
    let leaving = place(&mut roadway, REMOVAL_THRESHOLD - 0.01, 25.0, 25.0);
    let staying = place(&mut roadway, 50.0, 25.0, 25.0);

    let report = roadway.step(0.1, false, &SimParams::default(), &mut rng);

    assert_eq!(report.removed, 1);
    assert!(roadway.vehicle(leaving).is_none());
    assert!(roadway.vehicle(staying).is_some());
    assert_eq!(roadway.len(), 1);
    assert_eq!(roadway.vehicles()[0].ahead(), None);
}

#[test]
fn test_no_spawn_while_entrance_is_blocked() {
    let mut roadway = Roadway::new();
    let mut rng = StdRng::seed_from_u64(3);
    place(&mut roadway, 10.0, 0.0, 0.0);
    assert!(!roadway.is_free());

    let report = roadway.step(0.1, true, &SimParams::default(), &mut rng);

    assert_eq!(report.spawned, None);
    assert_eq!(roadway.len(), 1);
}

#[test]
fn test_spawn_inserts_rearmost_and_relinks() {
    let mut roadway = Roadway::new();
    let mut rng = StdRng::seed_from_u64(3);
    let first = place(&mut roadway, 40.0, 10.0, 10.0);
    let second = place(&mut roadway, 80.0, 10.0, 10.0);

    let report = roadway.step(0.1, true, &SimParams::default(), &mut rng);

    let spawned = report.spawned.expect("road was free");
    let ids: Vec<VehicleId> = roadway.vehicles().iter().map(|v| v.id()).collect();
    assert_eq!(ids, vec![spawned, first, second]);
    let links: Vec<Option<usize>> = roadway.vehicles().iter().map(|v| v.ahead()).collect();
    assert_eq!(links, vec![Some(1), Some(2), None]);
}

#[test]
fn test_clear_empties_the_road() {
    let mut sim = Simulation::with_seed(SimParams::default(), 9);
    for _ in 0..3 {
        place(sim.roadway_mut(), 0.0, 10.0, 10.0);
        sim.step(0.5);
    }
    assert!(!sim.roadway().is_empty());

    sim.clear();

    assert!(sim.roadway().is_empty());
    assert!(sim.roadway().is_free());
}

#[test]
fn test_parameter_change_only_affects_new_vehicles() {
    let mut sim = Simulation::with_seed(fixed_params(30.0, 1), 5);
    sim.step(0.1);
    let original = sim.roadway().vehicles()[0].id();

    sim.set_parameters(30.0, 30.0, 1, 1, 20.0, 4.0);
    for _ in 0..1000 {
        sim.step(0.1);
        if sim.roadway().len() == 2 {
            break;
        }
    }

    let vehicles = sim.roadway().vehicles();
    assert_eq!(vehicles.len(), 2);
    let newer = &vehicles[0];
    let older = sim.roadway().vehicle(original).expect("original still on road");
    assert_eq!(older.dynamics(), Dynamics { accel_coef: 10.0, decel_coef: 10.0 });
    assert_eq!(newer.dynamics(), Dynamics { accel_coef: 20.0, decel_coef: 4.0 });
}

#[test]
fn test_delay_vehicle_holds_it_in_place() {
    let mut sim = Simulation::with_seed(fixed_params(30.0, 1_000_000), 5);
    let id = place(sim.roadway_mut(), 60.0, 10.0, 10.0);

    assert!(sim.delay_vehicle(id, 3));
    for _ in 0..3 {
        sim.step(0.1);
        let vehicle = sim.roadway().vehicle(id).expect("vehicle");
        assert_eq!(vehicle.position(), 60.0);
        assert_eq!(vehicle.speed(), 0.0);
        assert_eq!(vehicle.status(), Status::Slowing);
    }

    sim.step(0.1);
    assert!(sim.roadway().vehicle(id).expect("vehicle").position() > 60.0);
    assert!(!sim.delay_vehicle(VehicleId(9999), 3));
}

#[test]
fn test_negative_dt_is_treated_as_zero() {
    let mut sim = Simulation::with_seed(fixed_params(30.0, 1_000_000), 5);
    let id = place(sim.roadway_mut(), 60.0, 10.0, 10.0);

    sim.step(-1.0);
    sim.step(f32::NAN);

    assert_eq!(sim.roadway().vehicle(id).expect("vehicle").position(), 60.0);
    assert_eq!(sim.stats().ticks, 2);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = |seed| {
        let mut sim = Simulation::with_seed(SimParams::default(), seed);
        for _ in 0..3000 {
            sim.step(0.01);
        }
        sim.roadway()
            .vehicles()
            .iter()
            .map(|v| (v.id(), v.position(), v.speed()))
            .collect::<Vec<_>>()
    };

    let first = run(11);
    assert!(!first.is_empty());
    assert_eq!(first, run(11));
}

/// Run a busy road with a long hold on the lead vehicle and check the
/// kinematic invariants after every tick.
#[test]
fn test_invariants_hold_through_jam_and_crashes() {
    let params = SimParams {
        min_spawn_interval: 5,
        max_spawn_interval: 20,
        decel_coef: 2.0,
        ..SimParams::default()
    };
    let mut sim = Simulation::with_seed(params, 2024);
    let dt = 0.01;
    let mut previous: HashMap<VehicleId, (f32, Status)> = HashMap::new();
    let mut pending_overlaps: HashSet<(VehicleId, VehicleId)> = HashSet::new();

    for tick in 0..20_000 {
        if tick % 2500 == 1500 {
            if let Some(lead) = sim.roadway_mut().lead_mut() {
                lead.delay(400);
            }
        }

        sim.step(dt);

        let vehicles = sim.roadway().vehicles();
        for vehicle in vehicles {
            assert!(vehicle.speed() >= 0.0);
            if let Some(&(old_position, old_status)) = previous.get(&vehicle.id()) {
                assert!(vehicle.position() >= old_position);
                if old_status == Status::Crashed || vehicle.status() == Status::Crashed {
                    assert_eq!(vehicle.position(), old_position);
                }
            }
        }

        // An overlap may appear after a move, but must turn into a crash on
        // the following step.
        let mut overlaps = HashSet::new();
        for pair in vehicles.windows(2) {
            let (rear, front) = (&pair[0], &pair[1]);
            assert!(rear.position() <= front.position());
            let overlapping = rear.front() > front.position();
            let crashed =
                rear.status() == Status::Crashed || front.status() == Status::Crashed;
            if overlapping && !crashed {
                assert!(
                    !pending_overlaps.contains(&(rear.id(), front.id())),
                    "vehicles {:?} and {:?} still overlap a tick later without a crash",
                    rear.id(),
                    front.id()
                );
                overlaps.insert((rear.id(), front.id()));
            }
        }
        pending_overlaps = overlaps;

        previous = vehicles
            .iter()
            .map(|v| (v.id(), (v.position(), v.status())))
            .collect();
    }

    assert!(sim.stats().total_crashes > 0);
    assert!(sim.stats().total_spawned > 0);
    assert!(sim.stats().total_removed > 0);
}

#[test]
fn test_speed_never_overshoots_target() {
    let params = SimParams {
        min_spawn_interval: 5,
        max_spawn_interval: 10,
        ..SimParams::default()
    };
    let mut sim = Simulation::with_seed(params, 77);
    let mut previous: HashMap<VehicleId, (f32, Status)> = HashMap::new();

    for tick in 0..10_000 {
        if tick == 4000 {
            if let Some(lead) = sim.roadway_mut().lead_mut() {
                lead.delay(300);
            }
        }

        sim.step(0.01);

        for vehicle in sim.roadway().vehicles() {
            let Some(&(old_speed, old_status)) = previous.get(&vehicle.id()) else {
                continue;
            };
            if old_status == Status::Crashed || vehicle.status() == Status::Crashed {
                continue;
            }
            let target = vehicle.target_speed();
            let low = old_speed.min(target);
            let high = old_speed.max(target);
            assert!(
                vehicle.speed() >= low && vehicle.speed() <= high,
                "vehicle {:?} speed {} outside [{}, {}]",
                vehicle.id(),
                vehicle.speed(),
                low,
                high
            );
        }

        previous = sim
            .roadway()
            .vehicles()
            .iter()
            .map(|v| (v.id(), (v.speed(), v.status())))
            .collect();
    }
}

#[test]
fn test_params_validation() {
    assert!(SimParams::default().validate().is_ok());
    assert!(fixed_params(30.0, 1).validate().is_ok());

    let inverted_speed = SimParams {
        min_speed: 60.0,
        max_speed: 30.0,
        ..SimParams::default()
    };
    assert!(inverted_speed.validate().is_err());

    let inverted_interval = SimParams {
        min_spawn_interval: 40,
        max_spawn_interval: 20,
        ..SimParams::default()
    };
    assert!(inverted_interval.validate().is_err());

    let zero_interval = fixed_params(30.0, 0);
    assert!(zero_interval.validate().is_err());

    let no_brakes = SimParams {
        decel_coef: 0.0,
        ..SimParams::default()
    };
    assert!(no_brakes.validate().is_err());
}

#[test]
fn test_render_road_marks_vehicles_by_status() {
    let mut sim = Simulation::with_seed(fixed_params(30.0, 1_000_000), 1);
    sim.step(0.001);
    sim.clear();
    place(sim.roadway_mut(), 0.0, 10.0, 10.0);
    let crashed = place(sim.roadway_mut(), 100.0, 0.0, 0.0);
    place(sim.roadway_mut(), 96.0, 20.0, 20.0);
    sim.step(0.001);
    assert_eq!(
        sim.roadway().vehicle(crashed).map(|v| v.status()),
        Some(Status::Crashed)
    );

    let strip = sim.render_road(150);

    assert_eq!(strip.chars().count(), 150);
    assert_eq!(strip.chars().next(), Some('='));
    assert_eq!(strip.chars().nth(100), Some('X'));
    assert_eq!(strip.chars().nth(149), Some('.'));
}

#[test]
fn test_vehicle_id_displays_as_plain_number() {
    assert_eq!(VehicleId(7).to_string(), "7");
    assert_eq!(format!("Vehicle {}", VehicleId(42)), "Vehicle 42");
}
