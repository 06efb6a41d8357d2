//! Data structures for the club: players, attributes, matches and assignments.

mod attributes;
mod fixture;
mod player;

pub use attributes::{
    Attribute, AttributeMap, Category, PlayerAttributes, GK_ATTRS, MENTAL_ATTRS, PHYSICAL_ATTRS,
    TECHNICAL_ATTRS,
};
pub use fixture::{
    AssignmentState, FieldUpdate, Match, MatchId, MatchPlayer, MatchPlayerId, MatchPlayerUpdate,
    MatchTeam, SignupPlayer, Team, TeamId,
};
pub use player::{Player, PlayerId, PlayerSummary, Position, Rated};
