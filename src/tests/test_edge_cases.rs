use crate::agent::{PolicyExtractor, QLearningTrainer, QTable};
use crate::config::{GridConfig, QLearningConfig};
use crate::error::GridError;
use crate::grid::GridModel;
use crate::types::Action;

#[test]
fn test_configuration_errors_surface_before_training() {
    let layouts = [
        GridConfig::new(15, 15, Some(4), Some(9)),
        GridConfig::new(15, 11, Some(11), Some(9)),
        GridConfig::new(15, 11, Some(4), Some(4)),
        GridConfig::new(15, 11, Some(4), Some(20)),
        GridConfig { rows: 1, ..GridConfig::default() },
    ];

    for layout in layouts {
        let err = GridModel::new(&layout).unwrap_err();
        assert!(err.is_configuration_error(), "{:?} -> {}", layout, err);
    }
}

#[test]
fn test_error_messages_name_the_problem() {
    let err = GridConfig::new(15, 11, Some(4), Some(4)).validate().unwrap_err();
    assert_eq!(err.to_string(), "Cells 'forbidden' and 'wall' both occupy cell 4");

    let err = GridError::InvalidMode("x".to_string());
    assert_eq!(err.to_string(), "Invalid mode 'x': expected 'policy' or 'query'");

    let err = GridError::NoValidActions { state: 9 };
    assert!(!err.is_configuration_error());
}

#[test]
fn test_grid_without_wall_or_forbidden() {
    let config = QLearningConfig {
        seed: Some(21),
        ..QLearningConfig::new(GridConfig::new(15, 11, None, None))
    };
    let grid = GridModel::new(&config.grid).unwrap();
    assert_eq!(grid.terminal_states(), vec![15, 11]);
    assert!(!grid.is_special(4));
    assert!(!grid.is_special(9));

    let mut trainer = QLearningTrainer::new(&grid, &config).unwrap();
    let report = trainer.train().unwrap();
    assert_eq!(report.metrics.forbidden_episodes, 0);
}

#[test]
fn test_gamma_zero_values_are_immediate_rewards() {
    let mut config = QLearningConfig {
        seed: Some(12),
        ..QLearningConfig::default()
    };
    config.learning.gamma = 0.0;
    config.learning.alpha = 1.0;
    let grid = GridModel::new(&config.grid).unwrap();
    let mut trainer = QLearningTrainer::new(&grid, &config).unwrap();
    trainer.train().unwrap();

    // Without discounting every visited non-terminal move is worth the step cost
    let table = trainer.q_table();
    for state in 0..grid.num_states() {
        if grid.is_terminal(state) {
            continue;
        }
        for action in grid.valid_actions(state) {
            let value = table.get(state, action);
            assert!(value == 0.0 || value == -0.1, "({}, {:?}) = {}", state, action, value);
        }
    }
}

#[test]
fn test_policy_on_empty_table_uses_first_valid_action() {
    let grid = GridModel::new(&GridConfig::default()).unwrap();
    let table = QTable::new(grid.num_states());
    let policy = PolicyExtractor::new(&grid, &table);

    assert_eq!(policy.optimal_action(0).unwrap(), Some(Action::North));
    assert_eq!(policy.optimal_action(12).unwrap(), Some(Action::East));
    assert_eq!(policy.optimal_action(6).unwrap(), Some(Action::West));
}
