//! Player, field positions, and the score view used by the API.

use crate::logic::scoring::{self, CategoryScores};
use crate::models::attributes::PlayerAttributes;
use crate::models::fixture::Team;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player.
pub type PlayerId = Uuid;

/// Field position handed out by the allocation engine.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        };
        f.write_str(label)
    }
}

/// Anything the allocation engine can rank by overall score.
pub trait Rated {
    fn overall_score(&self) -> u32;
}

/// A club player with attributes and a (legacy, match-independent) team assignment.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub attributes: PlayerAttributes,
    /// None when not on a team.
    pub team: Option<Team>,
    pub position: Option<Position>,
    pub is_starter: bool,
}

impl Player {
    /// Create an unassigned player with default (all 10) attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attributes(name, PlayerAttributes::default())
    }

    pub fn with_attributes(name: impl Into<String>, attributes: PlayerAttributes) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            attributes,
            team: None,
            position: None,
            is_starter: false,
        }
    }

    pub fn category_scores(&self) -> CategoryScores {
        CategoryScores::from_attributes(&self.attributes)
    }

    /// Overwrite the team assignment (never accumulates).
    pub fn assign(&mut self, team: Option<Team>, position: Option<Position>, is_starter: bool) {
        self.team = team;
        self.position = position;
        self.is_starter = is_starter;
    }

    pub fn clear_assignment(&mut self) {
        self.assign(None, None, false);
    }

    /// Scores view (for API responses).
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary::from_player(self)
    }
}

impl Rated for Player {
    fn overall_score(&self) -> u32 {
        scoring::overall_score(&self.attributes)
    }
}

/// Player with derived scores flattened in (for API / display).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub team: Option<Team>,
    pub position: Option<Position>,
    pub is_starter: bool,
    pub scores: CategoryScores,
    pub overall: u32,
}

impl PlayerSummary {
    pub fn from_player(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            team: p.team,
            position: p.position,
            is_starter: p.is_starter,
            scores: p.category_scores(),
            overall: p.overall_score(),
        }
    }
}
