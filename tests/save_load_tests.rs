#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use predprey::simulation::error::ConfigError;
use predprey::simulation::params::{ActionMode, CapacityPolicy, EliteSelection, Params};
use std::fs;

fn create_test_params() -> Params {
    Params {
        num_predators: 3,
        num_prey: 12,
        num_food: 40,
        world_width: 640.0,
        world_height: 480.0,
        action_mode: ActionMode::Centered,
        action_scale: 0.25,
        breeding_enabled: true,
        elite_selection: EliteSelection::TopK { k: 4 },
        capacity_policy: CapacityPolicy::Truncate,
        hidden_size: 12,
        weight_scale: 1.0,
        death_log_capacity: 32,
        rng_seed: Some(99),
    }
}

#[test]
fn test_save_and_load() {
    let params = create_test_params();
    let save_path = "test_params_roundtrip.json";

    params.save_to_file(save_path).expect("Failed to save params");
    let loaded = Params::load_from_file(save_path).expect("Failed to load params");

    assert_eq!(loaded, params);

    fs::remove_file(save_path).ok();
}

#[test]
fn test_missing_fields_take_defaults() {
    let path = "test_params_partial.json";
    fs::write(path, r#"{ "num_prey": 3, "breeding_enabled": true }"#).expect("Failed to write test file");

    let loaded = Params::load_from_file(path).expect("Failed to load params");

    assert_eq!(loaded.num_prey, 3);
    assert!(loaded.breeding_enabled);
    assert_eq!(loaded.num_predators, Params::default().num_predators);
    assert_eq!(loaded.action_mode, ActionMode::Nudge);
    assert_eq!(loaded.elite_selection, EliteSelection::Disabled);

    fs::remove_file(path).ok();
}

#[test]
fn test_save_creates_valid_json() {
    let params = create_test_params();
    let save_path = "test_params_valid.json";

    params.save_to_file(save_path).expect("Failed to save");

    let json_content = fs::read_to_string(save_path).expect("Failed to read save file");
    let parsed: serde_json::Value = serde_json::from_str(&json_content).expect("Invalid JSON");

    assert_eq!(parsed["num_predators"], 3);
    assert_eq!(parsed["elite_selection"]["TopK"]["k"], 4);
    assert_eq!(parsed["rng_seed"], 99);

    fs::remove_file(save_path).ok();
}

#[test]
fn test_load_nonexistent_file() {
    let result = Params::load_from_file("nonexistent_params_file.json");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_load_invalid_json() {
    let invalid_path = "test_params_invalid.json";
    fs::write(invalid_path, "{ this is not valid json }").expect("Failed to write test file");

    let result = Params::load_from_file(invalid_path);
    assert!(matches!(result, Err(ConfigError::Json(_))));

    fs::remove_file(invalid_path).ok();
}

#[test]
fn test_load_rejects_invalid_values() {
    let path = "test_params_out_of_range.json";
    fs::write(path, r#"{ "world_height": -5.0 }"#).expect("Failed to write test file");

    let result = Params::load_from_file(path);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    fs::remove_file(path).ok();
}

#[test]
fn test_validate() {
    assert!(Params::default().validate().is_ok());

    let zero_pool = Params {
        elite_selection: EliteSelection::TopK { k: 0 },
        ..Params::default()
    };
    assert!(zero_pool.validate().is_err());

    let no_hidden = Params {
        hidden_size: 0,
        ..Params::default()
    };
    assert!(no_hidden.validate().is_err());

    let empty_world = Params {
        num_predators: 0,
        num_prey: 0,
        num_food: 0,
        ..Params::default()
    };
    assert!(empty_world.validate().is_ok());
}
