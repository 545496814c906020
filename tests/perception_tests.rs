#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::Array1;
use predprey::simulation::agent::{Agent, AgentKind};
use predprey::simulation::ecosystem::Ecosystem;
use predprey::simulation::error::{Collection, SimulationError};
use predprey::simulation::params::{CapacityPolicy, Params};
use predprey::simulation::perception::{self, Perception};

fn create_test_params() -> Params {
    Params {
        num_predators: 2,
        num_prey: 3,
        num_food: 2,
        world_width: 400.0,
        world_height: 200.0,
        rng_seed: Some(5),
        ..Params::default()
    }
}

fn place(agent: &mut Agent, x: f32, y: f32, vx: f32, vy: f32) {
    agent.pos = Array1::from_vec(vec![x, y]);
    agent.vel = Array1::from_vec(vec![vx, vy]);
}

fn arranged_ecosystem() -> Ecosystem {
    let mut ecosystem: Ecosystem = Ecosystem::new(create_test_params()).unwrap();
    place(&mut ecosystem.predators[0], 100.0, 50.0, 0.5, -0.5);
    place(&mut ecosystem.predators[1], 300.0, 150.0, 0.0, 0.0);
    place(&mut ecosystem.prey[0], 40.0, 20.0, 0.0, 0.0);
    place(&mut ecosystem.prey[1], 60.0, 20.0, 0.0, 0.0);
    place(&mut ecosystem.prey[2], 380.0, 180.0, 0.0, 0.0);
    ecosystem.food[0].pos = Array1::from_vec(vec![200.0, 100.0]);
    ecosystem.food[1].pos = Array1::from_vec(vec![0.0, 0.0]);
    ecosystem
}

#[test]
fn test_observation_size_formula() {
    let params = create_test_params();
    assert_eq!(params.observation_size(), 12 + 2 * (2 + 2 + 3));
}

#[test]
fn test_predator_observation_layout() {
    let ecosystem = arranged_ecosystem();

    let obs = perception::encode(&ecosystem, AgentKind::Predator, 0).unwrap();

    let expected = [
        // own position and velocity
        0.25, 0.25, 0.5, -0.5, //
        // nearest predator
        0.75, 0.75, //
        // health, time alive ratio, world size, one-hot
        1.0, 0.0, 400.0, 200.0, 0.0, 1.0, //
        // food
        0.5, 0.5, 0.0, 0.0, //
        // predators
        0.25, 0.25, 0.75, 0.75, //
        // prey
        0.1, 0.1, 0.15, 0.1, 0.95, 0.9,
    ];
    assert_eq!(obs.len(), expected.len());
    for (i, (got, want)) in obs.iter().zip(expected).enumerate() {
        assert!((got - want).abs() < 1e-6, "slot {i}: got {got}, want {want}");
    }
}

#[test]
fn test_prey_observation_uses_prey_neighbour() {
    let ecosystem = arranged_ecosystem();

    let obs = perception::encode(&ecosystem, AgentKind::Prey, 0).unwrap();

    // nearest prey is the one at (60, 20)
    assert!((obs[4] - 0.15).abs() < 1e-6);
    assert!((obs[5] - 0.1).abs() < 1e-6);
    // prey health 1000 / 500
    assert!((obs[6] - 2.0).abs() < 1e-6);
    assert_eq!(obs[10], 1.0);
    assert_eq!(obs[11], 0.0);
}

#[test]
fn test_lone_agent_has_zero_neighbour() {
    let mut ecosystem = arranged_ecosystem();
    ecosystem.predators.truncate(1);

    let obs = perception::encode(&ecosystem, AgentKind::Predator, 0).unwrap();

    assert_eq!(obs[4], 0.0);
    assert_eq!(obs[5], 0.0);
}

#[test]
fn test_time_alive_ratio() {
    let mut ecosystem = arranged_ecosystem();
    ecosystem.max_time_alive = 10;
    ecosystem.prey[1].time_alive = 5;

    let obs = perception::encode(&ecosystem, AgentKind::Prey, 1).unwrap();

    assert!((obs[7] - 0.5).abs() < 1e-6);
}

#[test]
fn test_missing_entities_are_zero_padded() {
    let mut ecosystem = arranged_ecosystem();
    ecosystem.prey.truncate(1);
    let params = ecosystem.params.clone();

    let obs = perception::encode(&ecosystem, AgentKind::Prey, 0).unwrap();

    assert_eq!(obs.len(), params.observation_size());
    // food (4) + predators (4) + one prey (2), then padding
    let used = 12 + 4 + 4 + 2;
    assert!(obs.iter().skip(used).all(|&v| v == 0.0));
    assert!((obs[used - 2] - 0.1).abs() < 1e-6);
}

#[test]
fn test_length_is_constant_during_a_run() {
    let params = Params {
        world_width: 120.0,
        world_height: 120.0,
        breeding_enabled: true,
        ..create_test_params()
    };
    let expected_len = params.observation_size();
    let mut ecosystem: Ecosystem = Ecosystem::new(params).unwrap();

    for _ in 0..400 {
        let perception = Perception::new(&ecosystem).unwrap();
        for kind in [AgentKind::Predator, AgentKind::Prey] {
            for i in 0..ecosystem.agents(kind).len() {
                let obs = perception.encode(&ecosystem, kind, i).unwrap();
                assert_eq!(obs.len(), expected_len);
            }
        }
        ecosystem.step().unwrap();
    }
}

#[test]
fn test_over_capacity_is_rejected() {
    let mut ecosystem = arranged_ecosystem();
    let extra = ecosystem.food[0].clone();
    ecosystem.food.push(extra);

    let err = perception::encode(&ecosystem, AgentKind::Prey, 0).unwrap_err();

    assert_eq!(
        err,
        SimulationError::CapacityExceeded {
            collection: Collection::Food,
            live: 3,
            capacity: 2,
        }
    );
}

#[test]
fn test_over_capacity_is_truncated_when_configured() {
    let mut ecosystem = arranged_ecosystem();
    ecosystem.params.capacity_policy = CapacityPolicy::Truncate;
    ecosystem.spawn_random(AgentKind::Prey);
    let params = ecosystem.params.clone();

    let obs = perception::encode(&ecosystem, AgentKind::Prey, 3).unwrap();

    assert_eq!(obs.len(), params.observation_size());
    // only the first three prey are listed
    let prey_slots = obs.slice(ndarray::s![obs.len() - 6..]);
    assert_eq!(prey_slots.to_vec(), vec![0.1, 0.1, 0.15, 0.1, 0.95, 0.9]);
}
