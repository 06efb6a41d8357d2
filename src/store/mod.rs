//! Persistence seam: what the allocation engine reads from and writes back to.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    Match, MatchId, MatchPlayerId, MatchPlayerUpdate, MatchTeam, Player, PlayerId, Position,
    SignupPlayer, Team, TeamId,
};

/// Errors reported by a store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    PlayerNotFound(PlayerId),
    MatchNotFound(MatchId),
    TeamNotFound(TeamId),
    MatchPlayerNotFound(MatchPlayerId),
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// The player already has a record for this match.
    DuplicateSignup { match_id: MatchId, player_id: PlayerId },
    /// The match already has a team with this number.
    DuplicateTeamNumber(Team),
    EmptyName,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            StoreError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            StoreError::TeamNotFound(id) => write!(f, "Team {} not found", id),
            StoreError::MatchPlayerNotFound(id) => write!(f, "Match player {} not found", id),
            StoreError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            StoreError::DuplicateSignup { .. } => {
                write!(f, "Player is already signed up for this match")
            }
            StoreError::DuplicateTeamNumber(team) => {
                write!(f, "Match already has {}", team)
            }
            StoreError::EmptyName => write!(f, "Name cannot be empty"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Reads and writes the allocation engine needs. Every call is fallible; the engine
/// propagates the first failure and does not roll back earlier writes.
pub trait ClubStore {
    /// Every club player (legacy, match-independent allocation).
    fn all_players(&self) -> Result<Vec<Player>, StoreError>;

    /// Overwrite a player's legacy team assignment.
    fn update_player_team(
        &mut self,
        id: PlayerId,
        team: Option<Team>,
        position: Option<Position>,
        is_starter: bool,
    ) -> Result<(), StoreError>;

    fn find_match(&self, id: MatchId) -> Result<Option<Match>, StoreError>;

    /// Teams of a match, ordered by team number.
    fn match_teams(&self, match_id: MatchId) -> Result<Vec<MatchTeam>, StoreError>;

    /// Match-player records, optionally only those on `team_id`.
    fn match_players(
        &self,
        match_id: MatchId,
        team_id: Option<TeamId>,
    ) -> Result<Vec<SignupPlayer>, StoreError>;

    /// Records of the match that are not on any team, ordered by player name.
    fn match_signup_players(&self, match_id: MatchId) -> Result<Vec<SignupPlayer>, StoreError>;

    fn update_match_player(
        &mut self,
        id: MatchPlayerId,
        update: &MatchPlayerUpdate,
    ) -> Result<(), StoreError>;

    /// Create the record for (match, player). Fails if one already exists.
    fn add_match_player(
        &mut self,
        match_id: MatchId,
        player_id: PlayerId,
        team_id: Option<TeamId>,
        position: Option<Position>,
        is_starter: bool,
    ) -> Result<MatchPlayerId, StoreError>;
}
