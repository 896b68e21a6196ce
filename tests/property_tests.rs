#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use gridq::agent::{PathStep, PolicyExtractor, QLearningTrainer, QTable};
    use gridq::builders::QLearningConfigBuilder;
    use gridq::config::GridConfig;
    use gridq::grid::{GridModel, STEP_COST};
    use gridq::types::{Action, Transition};

    // Strategy for valid layouts: dimensions plus five distinct cells
    // (start, goal1, goal2, forbidden, wall)
    fn layout_strategy() -> impl Strategy<Value = GridConfig> {
        (2usize..=6, 3usize..=6).prop_flat_map(|(rows, cols)| {
            Just((0..rows * cols).collect::<Vec<usize>>())
                .prop_shuffle()
                .prop_map(move |cells| GridConfig {
                    rows,
                    cols,
                    start: cells[0],
                    goal1: cells[1],
                    goal2: cells[2],
                    forbidden: Some(cells[3]),
                    wall: Some(cells[4]),
                })
        })
    }

    proptest! {
        #[test]
        fn test_transitions_follow_geometry(layout in layout_strategy()) {
            let grid = GridModel::new(&layout).unwrap();

            for state in 0..grid.num_states() {
                let (row, col) = grid.cell_position(state);
                for action in Action::ALL {
                    let transition = grid.transition(state, action);

                    if grid.is_terminal(state) {
                        let expected = if action == Action::EXIT {
                            Transition::Exit
                        } else {
                            Transition::Invalid
                        };
                        prop_assert_eq!(transition, expected);
                        continue;
                    }
                    if grid.is_wall(state) {
                        prop_assert_eq!(transition, Transition::Invalid);
                        continue;
                    }

                    let leaves_grid = match action {
                        Action::West => col == 0,
                        Action::North => row + 1 == grid.rows(),
                        Action::East => col + 1 == grid.cols(),
                        Action::South => row == 0,
                    };
                    prop_assert_eq!(transition.is_valid(), !leaves_grid);
                    if let Transition::To(target) = transition {
                        let (trow, tcol) = grid.cell_position(target);
                        prop_assert_eq!(row.abs_diff(trow) + col.abs_diff(tcol), 1);
                    }
                }
            }
        }

        #[test]
        fn test_rewards_match_cell_kind(layout in layout_strategy()) {
            let grid = GridModel::new(&layout).unwrap();

            for state in 0..grid.num_states() {
                for action in Action::ALL {
                    match grid.reward(state, action) {
                        Ok(reward) if grid.is_goal(state) => prop_assert_eq!(reward, 100.0),
                        Ok(reward) if grid.is_terminal(state) => prop_assert_eq!(reward, -100.0),
                        Ok(reward) => prop_assert_eq!(reward, STEP_COST),
                        Err(_) => prop_assert!(!grid.transition(state, action).is_valid()),
                    }
                }
            }
        }

        #[test]
        fn test_best_action_is_always_valid(layout in layout_strategy(), exclude in 0usize..36) {
            let grid = GridModel::new(&layout).unwrap();
            let table = QTable::new(grid.num_states());

            for state in 0..grid.num_states() {
                if grid.is_special(state) {
                    continue;
                }
                let (action, _) = table.best_action(&grid, state, Some(exclude)).unwrap();
                let transition = grid.transition(state, action);
                prop_assert!(transition.is_valid());
                prop_assert_ne!(transition.target(), Some(exclude));
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn test_short_training_keeps_invariants(seed in any::<u64>(), gamma in 0.0f64..0.9) {
            let config = QLearningConfigBuilder::new()
                .goals(15, 11)
                .forbidden(4)
                .wall(9)
                .gamma(gamma)
                .max_episodes(50)
                .seed(seed)
                .build()
                .unwrap();
            let grid = GridModel::new(&config.grid).unwrap();
            let mut trainer = QLearningTrainer::new(&grid, &config).unwrap();
            trainer.train().unwrap();
            let table = trainer.q_table();

            for state in 0..grid.num_states() {
                for action in Action::ALL {
                    let value = table.get(state, action);
                    if grid.transition(state, action).is_valid() {
                        prop_assert!(value.is_finite());
                        prop_assert!(
                            (-100.0..=100.0).contains(&value),
                            "({}, {:?}) = {}",
                            state, action, value
                        );
                    } else {
                        prop_assert_eq!(value, 0.0);
                    }
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(4))]

        #[test]
        fn test_open_grid_path_within_diameter(seed in any::<u64>()) {
            let config = QLearningConfigBuilder::new()
                .goals(15, 11)
                .gamma(0.9)
                .seed(seed)
                .build()
                .unwrap();
            let grid = GridModel::new(&config.grid).unwrap();
            let mut trainer = QLearningTrainer::new(&grid, &config).unwrap();
            trainer.train().unwrap();
            let table = trainer.into_q_table();

            let policy = PolicyExtractor::new(&grid, &table);
            let mut trace = policy.trace_path_bounded(grid.start(), grid.diameter());
            let steps = trace.by_ref().collect::<gridq::Result<Vec<PathStep>>>();
            prop_assert!(steps.is_ok(), "{:?}", steps);
            prop_assert!(grid.is_goal(trace.current()));
        }
    }
}
