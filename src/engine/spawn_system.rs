use super::*;

use crate::grid::center_of;
use crate::types::Archetype;

use super::utils::adversary_id;

const PLAYER_ROW_OFFSET: i32 = 3;
const PATROL_ROW_OFFSET: i32 = -3;
const AMBUSH_ROW_OFFSET: i32 = 1;
const AMBUSH_COL_OFFSET: i32 = 5;

/// Player and adversaries for a fresh level, each placed on the nearest open
/// cell to its layout anchor.
pub(super) fn spawn_entities(grid: &Grid, config: &GameConfig) -> (Player, Cell, Vec<Adversary>) {
    let mid_row = grid.rows() / 2;
    let mid_col = grid.cols() / 2;

    let player_spawn = grid.find_spawn_position(mid_row + PLAYER_ROW_OFFSET, mid_col);
    let player = Player::new(center_of(player_spawn), config.speed_multiplier);

    let home = center_of(Cell::new(mid_row, mid_col));
    let anchors = [
        (Archetype::Patrol, mid_row + PATROL_ROW_OFFSET, mid_col),
        (
            Archetype::Ambush,
            mid_row + AMBUSH_ROW_OFFSET,
            mid_col + AMBUSH_COL_OFFSET,
        ),
    ];
    let adversaries = anchors
        .iter()
        .enumerate()
        .map(|(index, &(archetype, row, col))| {
            let cell = grid.find_spawn_position(row, col);
            Adversary::new(
                adversary_id(index),
                archetype,
                center_of(cell),
                home,
                config.speed_multiplier,
                config.flee_duration_secs,
                config.penalty_duration_secs,
            )
        })
        .collect();

    (player, player_spawn, adversaries)
}
