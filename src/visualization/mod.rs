pub mod text_plots;

pub use text_plots::{plot_episode_lengths, plot_episode_returns, policy_map, training_summary};
