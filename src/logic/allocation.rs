//! Team allocation against a store: legacy two-team split over all players, and
//! match-scoped allocation into the match's one or two allocatable teams.

use crate::logic::balance::{balance_two_teams, refine_by_swaps, select_single_team, Lineup};
use crate::logic::positions::{assign_positions, starter_positions, substitute_positions};
use crate::models::{
    MatchId, MatchPlayerId, MatchPlayerUpdate, MatchTeam, PlayerId, Position, Rated, SignupPlayer,
    Team, TeamId,
};
use crate::store::{ClubStore, StoreError};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

/// Why an allocation did not happen (or stopped part-way on a store failure).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AllocationError {
    /// Fewer eligible players than the number of teams being filled.
    NotEnoughPlayers { required: usize, available: usize },
    MatchNotFound(MatchId),
    /// Allocation needs exactly 1 or 2 teams flagged for allocation.
    InvalidTeamCount(usize),
    /// Two teams are flagged but this team number is not among them.
    MissingTeam(Team),
    /// A store call failed; writes made before it are not rolled back.
    Store(StoreError),
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationError::NotEnoughPlayers { required, available } => write!(
                f,
                "Need at least {} player(s) to allocate (have {})",
                required, available
            ),
            AllocationError::MatchNotFound(_) => write!(f, "Match not found"),
            AllocationError::InvalidTeamCount(n) => write!(
                f,
                "Invalid number of allocated teams: {}. Expected 1 or 2.",
                n
            ),
            AllocationError::MissingTeam(_) => {
                write!(f, "Both team 1 and team 2 must be allocated")
            }
            AllocationError::Store(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for AllocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocationError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for AllocationError {
    fn from(e: StoreError) -> Self {
        AllocationError::Store(e)
    }
}

/// What a successful allocation did.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub message: &'static str,
    /// Starter total per filled team, in team-number order.
    pub starter_totals: Vec<u64>,
    pub starters: usize,
    pub substitutes: usize,
    /// Accepted refinement swaps (two-team match allocation only).
    pub swaps: usize,
}

impl AllocationSummary {
    fn from_lineups<T: Rated>(message: &'static str, lineups: &[&Lineup<T>], swaps: usize) -> Self {
        Self {
            message,
            starter_totals: lineups.iter().map(|l| l.starter_score()).collect(),
            starters: lineups.iter().map(|l| l.starters.len()).sum(),
            substitutes: lineups.iter().map(|l| l.substitutes.len()).sum(),
            swaps,
        }
    }

    pub fn message(&self) -> &str {
        self.message
    }
}

/// Split every club player into team 1 and team 2 and hand out positions.
///
/// Greedy balance only (no swap refinement). `cap` limits starters per team and defaults
/// to ceil(n / 2); overflow players become substitutes.
pub fn allocate_two_teams<S, R>(
    store: &mut S,
    cap: Option<usize>,
    rng: &mut R,
) -> Result<AllocationSummary, AllocationError>
where
    S: ClubStore + ?Sized,
    R: Rng + ?Sized,
{
    let players = store.all_players()?;
    if players.len() < 2 {
        return Err(AllocationError::NotEnoughPlayers {
            required: 2,
            available: players.len(),
        });
    }

    let split = balance_two_teams(players, cap);
    let summary =
        AllocationSummary::from_lineups("Teams allocated", &[&split.team_1, &split.team_2], 0);

    for (team, lineup) in [(Team::One, split.team_1), (Team::Two, split.team_2)] {
        for (is_starter, roster, positions) in rosters(lineup) {
            for (player, position) in assign_positions(roster, positions, rng) {
                store.update_player_team(player.id, Some(team), Some(position), is_starter)?;
            }
        }
    }

    log::info!(
        "Allocated {} players into two teams (starter totals {:?})",
        summary.starters + summary.substitutes,
        summary.starter_totals
    );
    Ok(summary)
}

enum Targets {
    Single(TeamId),
    Pair(TeamId, TeamId),
}

/// Allocate a match's players into its allocatable team(s).
///
/// Validates before writing anything: the match must exist, exactly 1 or 2 teams must be
/// flagged `should_allocate`, and the pool (signed-up plus currently assigned players) must
/// hold at least one player per team. Then every record on any of the match's teams is reset
/// to unassigned and the whole pool is re-partitioned, so repeated runs never create
/// duplicate records.
pub fn allocate_match_teams<S, R>(
    store: &mut S,
    match_id: MatchId,
    rng: &mut R,
) -> Result<AllocationSummary, AllocationError>
where
    S: ClubStore + ?Sized,
    R: Rng + ?Sized,
{
    let fixture = store
        .find_match(match_id)?
        .ok_or(AllocationError::MatchNotFound(match_id))?;
    let teams = store.match_teams(match_id)?;
    let targets = resolve_targets(&teams)?;
    let required = match targets {
        Targets::Single(_) => 1,
        Targets::Pair(..) => 2,
    };

    let available = store
        .match_players(match_id, None)?
        .iter()
        .filter(|mp| match mp.record.team_id {
            None => true,
            Some(team_id) => teams.iter().any(|t| t.id == team_id),
        })
        .count();
    if available < required {
        return Err(AllocationError::NotEnoughPlayers {
            required,
            available,
        });
    }

    for team in &teams {
        for mp in store.match_players(match_id, Some(team.id))? {
            store.update_match_player(mp.record.id, &MatchPlayerUpdate::unassign())?;
        }
    }

    let pool = store.match_signup_players(match_id)?;
    let existing: HashMap<PlayerId, MatchPlayerId> = store
        .match_players(match_id, None)?
        .iter()
        .map(|mp| (mp.record.player_id, mp.record.id))
        .collect();
    let cap = fixture.max_players_per_team;
    log::debug!(
        "Allocating match {}: {} players, {} team(s), cap {:?}",
        match_id,
        pool.len(),
        required,
        cap
    );

    let summary = match targets {
        Targets::Single(team_id) => {
            let lineup = select_single_team(pool, cap);
            let summary = AllocationSummary::from_lineups("Team allocated", &[&lineup], 0);
            write_match_lineup(store, match_id, team_id, lineup, &existing, rng)?;
            summary
        }
        Targets::Pair(team_1, team_2) => {
            let mut split = balance_two_teams(pool, cap);
            let swaps = refine_by_swaps(&mut split);
            let summary = AllocationSummary::from_lineups(
                "Teams allocated",
                &[&split.team_1, &split.team_2],
                swaps,
            );
            write_match_lineup(store, match_id, team_1, split.team_1, &existing, rng)?;
            write_match_lineup(store, match_id, team_2, split.team_2, &existing, rng)?;
            summary
        }
    };

    log::info!(
        "Match {} allocated: {} starters, {} substitutes, starter totals {:?}",
        match_id,
        summary.starters,
        summary.substitutes,
        summary.starter_totals
    );
    Ok(summary)
}

fn resolve_targets(teams: &[MatchTeam]) -> Result<Targets, AllocationError> {
    let allocated: Vec<&MatchTeam> = teams.iter().filter(|t| t.should_allocate).collect();
    match allocated.as_slice() {
        [only] => Ok(Targets::Single(only.id)),
        [_, _] => {
            let find = |number: Team| {
                allocated
                    .iter()
                    .find(|t| t.number == number)
                    .map(|t| t.id)
                    .ok_or(AllocationError::MissingTeam(number))
            };
            Ok(Targets::Pair(find(Team::One)?, find(Team::Two)?))
        }
        other => Err(AllocationError::InvalidTeamCount(other.len())),
    }
}

type PositionFn = fn(usize) -> Vec<Position>;

/// (is_starter, roster, position table) for each half of a lineup.
fn rosters<T>(lineup: Lineup<T>) -> [(bool, Vec<T>, PositionFn); 2] {
    [
        (true, lineup.starters, starter_positions as PositionFn),
        (false, lineup.substitutes, substitute_positions as PositionFn),
    ]
}

/// Write one team's lineup: update the player's record in place, or create it if missing.
fn write_match_lineup<S, R>(
    store: &mut S,
    match_id: MatchId,
    team_id: TeamId,
    lineup: Lineup<SignupPlayer>,
    existing: &HashMap<PlayerId, MatchPlayerId>,
    rng: &mut R,
) -> Result<(), StoreError>
where
    S: ClubStore + ?Sized,
    R: Rng + ?Sized,
{
    for (is_starter, roster, positions) in rosters(lineup) {
        for (player, position) in assign_positions(roster, positions, rng) {
            match existing.get(&player.player_id()) {
                Some(&record_id) => store.update_match_player(
                    record_id,
                    &MatchPlayerUpdate::assign(team_id, position, is_starter),
                )?,
                None => {
                    store.add_match_player(
                        match_id,
                        player.player_id(),
                        Some(team_id),
                        Some(position),
                        is_starter,
                    )?;
                }
            }
        }
    }
    Ok(())
}
