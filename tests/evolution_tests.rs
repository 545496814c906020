#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::Array1;
use predprey::simulation::agent::{Agent, AgentId, AgentKind};
use predprey::simulation::error::{Collection, SimulationError};
use predprey::simulation::event_log::{DeathCause, DeathLog, DeathRecord};
use predprey::simulation::evolution::{Elite, EvolutionEngine, fitness};
use predprey::simulation::params::EliteSelection;
use predprey::simulation::spatial::{SpatialIndex, nearest_in};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn agent_at(id: u64, kind: AgentKind, x: f32, y: f32, rng: &mut SmallRng) -> Agent<u32> {
    Agent::new(AgentId(id), kind, Array1::from_vec(vec![x, y]), id as u32, rng)
}

fn record(id: u64) -> DeathRecord {
    DeathRecord {
        tick: id,
        generation: 1,
        id: AgentId(id),
        kind: AgentKind::Prey,
        time_alive: 0,
        fitness: 1.0,
        cause: DeathCause::Starvation,
    }
}

#[test]
fn test_fitness_uses_nearest_same_kind_distance() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut agents = vec![
        agent_at(0, AgentKind::Prey, 0.0, 0.0, &mut rng),
        agent_at(1, AgentKind::Prey, 3.0, 4.0, &mut rng),
        agent_at(2, AgentKind::Prey, 100.0, 0.0, &mut rng),
    ];
    agents[0].time_alive = 7;

    assert!((fitness(&agents, 0) - 7.2).abs() < 1e-6);
}

#[test]
fn test_fitness_without_neighbour_or_at_zero_distance() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut alone = vec![agent_at(0, AgentKind::Predator, 5.0, 5.0, &mut rng)];
    alone[0].time_alive = 3;
    assert_eq!(fitness(&alone, 0), 4.0);

    let stacked = vec![
        agent_at(0, AgentKind::Predator, 5.0, 5.0, &mut rng),
        agent_at(1, AgentKind::Predator, 5.0, 5.0, &mut rng),
    ];
    assert_eq!(fitness(&stacked, 1), 1.0);
}

#[test]
fn test_disabled_selection_keeps_no_candidates() {
    let mut engine: EvolutionEngine<u32> = EvolutionEngine::new(EliteSelection::Disabled);

    engine.record_death(AgentKind::Prey, 10.0, &1);
    engine.select_elites();

    assert!(engine.candidates(AgentKind::Prey).is_empty());
    assert!(engine.elites(AgentKind::Prey).is_empty());
    assert_eq!(engine.best_fitness(), Some(10.0));
}

#[test]
fn test_top_k_keeps_fittest_deaths() {
    let mut engine: EvolutionEngine<u32> = EvolutionEngine::new(EliteSelection::TopK { k: 2 });

    for (fitness, policy) in [(3.0, 3), (9.0, 9), (1.0, 1), (5.0, 5)] {
        engine.record_death(AgentKind::Predator, fitness, &policy);
    }
    engine.record_death(AgentKind::Prey, 2.0, &2);

    let kept: Vec<u32> = engine
        .candidates(AgentKind::Predator)
        .iter()
        .map(|e| e.policy)
        .collect();
    assert_eq!(kept, vec![9, 5]);
    assert_eq!(engine.candidates(AgentKind::Prey).len(), 1);
    assert_eq!(engine.best_fitness(), Some(9.0));

    engine.select_elites();
    assert!(engine.candidates(AgentKind::Predator).is_empty());
    assert_eq!(engine.elites(AgentKind::Predator).len(), 2);

    let mut rng = SmallRng::seed_from_u64(3);
    for _ in 0..20 {
        let parent = *engine.pick_parent(AgentKind::Predator, &mut rng).unwrap();
        assert!(parent == 9 || parent == 5);
    }

    engine.clear();
    assert!(engine.elites(AgentKind::Predator).is_empty());
    assert!(engine.pick_parent(AgentKind::Predator, &mut rng).is_none());
    assert_eq!(engine.best_fitness(), None);
}

#[test]
fn test_promote_installs_elites() {
    let mut engine: EvolutionEngine<u32> = EvolutionEngine::new(EliteSelection::Disabled);

    engine.promote(
        AgentKind::Prey,
        [Elite {
            fitness: 1.0,
            policy: 77,
        }],
    );

    let mut rng = SmallRng::seed_from_u64(4);
    assert_eq!(engine.pick_parent(AgentKind::Prey, &mut rng), Some(&77));
    assert!(engine.pick_parent(AgentKind::Predator, &mut rng).is_none());
}

#[test]
fn test_death_log_keeps_newest_records() {
    let mut log = DeathLog::new(3);

    for id in 0..5 {
        log.log(record(id));
    }

    assert_eq!(log.total(), 5);
    let ids: Vec<u64> = log.records().iter().map(|r| r.id.0).collect();
    assert_eq!(ids, vec![4, 3, 2]);
    assert!(log.contains(AgentId(2)));
    assert!(!log.contains(AgentId(1)));
}

#[test]
fn test_spatial_index_skips_self() {
    let mut rng = SmallRng::seed_from_u64(5);
    let predators = vec![
        agent_at(0, AgentKind::Predator, 10.0, 10.0, &mut rng),
        agent_at(1, AgentKind::Predator, 50.0, 10.0, &mut rng),
        agent_at(2, AgentKind::Predator, 12.0, 10.0, &mut rng),
    ];
    let prey = vec![agent_at(3, AgentKind::Prey, 0.0, 0.0, &mut rng)];

    let index = SpatialIndex::build(&predators, &prey).unwrap();

    let neighbor = index
        .nearest_same_kind(AgentKind::Predator, 0, &predators[0].pos)
        .unwrap()
        .unwrap();
    assert_eq!(neighbor.index, 2);
    assert!((neighbor.distance - 2.0).abs() < 1e-6);
    assert!(
        index
            .nearest_same_kind(AgentKind::Prey, 0, &prey[0].pos)
            .unwrap()
            .is_none()
    );

    assert_eq!(nearest_in(&predators, 1).map(|n| n.index), Some(2));
}

#[test]
fn test_spatial_index_rejects_non_finite_query() {
    let mut rng = SmallRng::seed_from_u64(6);
    let predators = vec![
        agent_at(0, AgentKind::Predator, 10.0, 10.0, &mut rng),
        agent_at(1, AgentKind::Predator, 20.0, 10.0, &mut rng),
    ];
    let index = SpatialIndex::build(&predators, &[]).unwrap();
    let broken = Array1::from_vec(vec![f32::NAN, 10.0]);

    let result = index.nearest_same_kind(AgentKind::Predator, 0, &broken);

    assert!(matches!(result, Err(SimulationError::SpatialIndex(_))));
}

#[test]
fn test_agent_kind_maps_to_collection() {
    assert_eq!(Collection::from(AgentKind::Predator), Collection::Predators);
    assert_eq!(Collection::from(AgentKind::Prey), Collection::Prey);
}
