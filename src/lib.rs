//! Club team manager: library with models, scoring and allocation logic, and the store seam.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::AppConfig;
pub use logic::{
    adjust_category_by_score, adjust_category_by_single_attr, allocate_match_teams,
    allocate_two_teams, balance_two_teams, category_score, gk_score, mental_score, overall_score,
    physical_score, refine_by_swaps, select_single_team, set_category_score, set_overall_score,
    technical_score, AllocationError, AllocationSummary, CategoryScores, Lineup, TwoTeamSplit,
};
pub use models::{
    AssignmentState, Attribute, AttributeMap, Category, FieldUpdate, Match, MatchId, MatchPlayer,
    MatchPlayerId, MatchPlayerUpdate, MatchTeam, Player, PlayerAttributes, PlayerId,
    PlayerSummary, Position, Rated, SignupPlayer, Team, TeamId,
};
pub use store::{ClubStore, MemoryStore, StoreError};
