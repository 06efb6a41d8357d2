//! Matches, their teams, and per-match player assignment records.

use crate::logic::scoring;
use crate::models::attributes::PlayerAttributes;
use crate::models::player::{PlayerId, Position, Rated};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;
/// Unique identifier for a team within a match.
pub type TeamId = Uuid;
/// Unique identifier for a (match, player) assignment record.
pub type MatchPlayerId = Uuid;

/// Team slot: team 1 or team 2.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    One,
    Two,
}

impl Team {
    pub fn number(self) -> u8 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "team {}", self.number())
    }
}

/// A scheduled match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub location: Option<String>,
    /// Starters per team; None means no cap.
    pub max_players_per_team: Option<usize>,
}

impl Match {
    pub fn new(max_players_per_team: Option<usize>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: None,
            start_time: None,
            location: None,
            max_players_per_team,
        }
    }
}

/// One side of a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchTeam {
    pub id: TeamId,
    pub match_id: MatchId,
    pub number: Team,
    pub name: String,
    pub jersey_color: Option<String>,
    /// Only teams with this flag take part in allocation.
    pub should_allocate: bool,
    pub score: u32,
}

impl MatchTeam {
    pub fn new(match_id: MatchId, number: Team, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            number,
            name: name.into(),
            jersey_color: None,
            should_allocate: true,
            score: 0,
        }
    }
}

/// Where a match-player record currently stands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    /// Signed up, not on a team.
    Unassigned,
    Starter,
    Substitute,
}

/// A player's participation in one match. At most one per (match, player).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchPlayer {
    pub id: MatchPlayerId,
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub team_id: Option<TeamId>,
    pub position: Option<Position>,
    pub is_starter: bool,
    pub rating: Option<f32>,
}

impl MatchPlayer {
    /// A fresh signup: no team, no position, not a starter.
    pub fn signup(match_id: MatchId, player_id: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            player_id,
            team_id: None,
            position: None,
            is_starter: false,
            rating: None,
        }
    }

    pub fn state(&self) -> AssignmentState {
        match (self.team_id, self.is_starter) {
            (None, _) => AssignmentState::Unassigned,
            (Some(_), true) => AssignmentState::Starter,
            (Some(_), false) => AssignmentState::Substitute,
        }
    }

    /// Apply a partial update; `Unchanged` fields keep their value.
    pub fn apply(&mut self, update: &MatchPlayerUpdate) {
        update.team_id.apply_to(&mut self.team_id);
        update.position.apply_to(&mut self.position);
        update.rating.apply_to(&mut self.rating);
        if let Some(is_starter) = update.is_starter {
            self.is_starter = is_starter;
        }
    }
}

/// Partial update of a nullable field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op", content = "value")]
pub enum FieldUpdate<T> {
    /// Leave the stored value as is.
    Unchanged,
    /// Set the field to absent.
    Clear,
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Unchanged
    }
}

impl<T: Clone> FieldUpdate<T> {
    pub fn apply_to(&self, field: &mut Option<T>) {
        match self {
            FieldUpdate::Unchanged => {}
            FieldUpdate::Clear => *field = None,
            FieldUpdate::Set(v) => *field = Some(v.clone()),
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// `Some` sets, `None` clears.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldUpdate::Set(v),
            None => FieldUpdate::Clear,
        }
    }
}

/// Fields of a match-player record to change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchPlayerUpdate {
    #[serde(default)]
    pub team_id: FieldUpdate<TeamId>,
    #[serde(default)]
    pub position: FieldUpdate<Position>,
    #[serde(default)]
    pub is_starter: Option<bool>,
    #[serde(default)]
    pub rating: FieldUpdate<f32>,
}

impl MatchPlayerUpdate {
    /// Back to `Unassigned`: no team, no position, not a starter.
    pub fn unassign() -> Self {
        Self {
            team_id: FieldUpdate::Clear,
            position: FieldUpdate::Clear,
            is_starter: Some(false),
            rating: FieldUpdate::Unchanged,
        }
    }

    pub fn assign(team_id: TeamId, position: Position, is_starter: bool) -> Self {
        Self {
            team_id: FieldUpdate::Set(team_id),
            position: FieldUpdate::Set(position),
            is_starter: Some(is_starter),
            rating: FieldUpdate::Unchanged,
        }
    }
}

/// A match-player record joined with the player's name and attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignupPlayer {
    pub record: MatchPlayer,
    pub name: String,
    pub attributes: PlayerAttributes,
}

impl SignupPlayer {
    pub fn player_id(&self) -> PlayerId {
        self.record.player_id
    }
}

impl Rated for SignupPlayer {
    fn overall_score(&self) -> u32 {
        scoring::overall_score(&self.attributes)
    }
}
