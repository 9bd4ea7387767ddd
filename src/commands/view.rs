//! `cardboard view`: open the interactive card canvas.

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::board::model::CardBoard;
use crate::config::{self, Config};
use crate::logging;
use crate::tui::canvas;

pub fn run(seed: Option<u64>, config_path: Option<&Path>, log_dir: Option<&Path>) -> Result<()> {
    let config = config::load(config_path)?;
    if let Some(dir) = log_dir {
        logging::init_logging(&config.log_level, dir)?;
    }
    let board = build_board(seed, &config);
    info!(
        "starting view (seed: {}, spawn extent: {})",
        seed.map(|s| s.to_string()).unwrap_or_else(|| "random".to_string()),
        config.spawn_extent
    );
    canvas::run(board, config)
}

fn build_board(seed: Option<u64>, config: &Config) -> CardBoard {
    let board = match seed {
        Some(seed) => CardBoard::seeded(seed),
        None => CardBoard::from_entropy(),
    };
    board.with_spawn_extent(config.spawn_extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_boards_repeat_spawn_positions() {
        let config = Config {
            spawn_extent: 50.0,
            ..Config::default()
        };
        let mut a = build_board(Some(9), &config);
        let mut b = build_board(Some(9), &config);
        let ia = a.add_card();
        let ib = b.add_card();
        assert_eq!(a.cards()[ia].position, b.cards()[ib].position);
        assert!(a.cards()[ia].position.x < 50.0);
    }

    #[test]
    fn unseeded_board_still_has_seed_cards() {
        let board = build_board(None, &Config::default());
        assert_eq!(board.len(), 2);
    }
}
