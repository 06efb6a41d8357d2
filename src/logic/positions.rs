//! Position distribution: fixed role counts per roster size, random role holders.

use crate::config::{
    STARTER_DEFENDER_RATIO, STARTER_MIDFIELDER_RATIO, SUBSTITUTE_DEFENDER_RATIO,
    SUBSTITUTE_GOALKEEPER_RATIO, SUBSTITUTE_MIDFIELDER_RATIO,
};
use crate::models::Position;
use rand::seq::SliceRandom;
use rand::Rng;
use std::iter::repeat;

fn share(size: usize, ratio: f64) -> usize {
    (size as f64 * ratio).floor() as usize
}

fn build(size: usize, goalkeepers: usize, defenders: usize, midfielders: usize, min_forwards: usize) -> Vec<Position> {
    let mut positions: Vec<Position> = repeat(Position::Goalkeeper)
        .take(goalkeepers)
        .chain(repeat(Position::Defender).take(defenders))
        .chain(repeat(Position::Midfielder).take(midfielders))
        .collect();
    let forwards = size.saturating_sub(positions.len()).max(min_forwards);
    positions.extend(repeat(Position::Forward).take(forwards));
    positions.truncate(size);
    positions
}

/// Positions for `size` starters: 1 GK, then at least one each of DF/MF/FW, truncated to `size`.
pub fn starter_positions(size: usize) -> Vec<Position> {
    build(
        size,
        1,
        share(size, STARTER_DEFENDER_RATIO).max(1),
        share(size, STARTER_MIDFIELDER_RATIO).max(1),
        1,
    )
}

/// Positions for `size` substitutes; no role is guaranteed.
pub fn substitute_positions(size: usize) -> Vec<Position> {
    if size == 0 {
        return Vec::new();
    }
    build(
        size,
        share(size, SUBSTITUTE_GOALKEEPER_RATIO),
        share(size, SUBSTITUTE_DEFENDER_RATIO),
        share(size, SUBSTITUTE_MIDFIELDER_RATIO),
        0,
    )
}

/// Shuffle `roster` once and pair each member with the next position from `positions`.
pub fn assign_positions<T, R: Rng + ?Sized>(
    mut roster: Vec<T>,
    positions: fn(usize) -> Vec<Position>,
    rng: &mut R,
) -> Vec<(T, Position)> {
    roster.shuffle(rng);
    let slots = positions(roster.len());
    roster.into_iter().zip(slots).collect()
}
