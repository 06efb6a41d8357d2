//! Business logic: scoring, balancing, positions and store-backed allocation.

pub mod allocation;
pub mod balance;
pub mod positions;
pub mod scoring;

pub use allocation::{allocate_match_teams, allocate_two_teams, AllocationError, AllocationSummary};
pub use balance::{
    balance_two_teams, default_cap, rank, refine_by_swaps, select_single_team, Lineup,
    TwoTeamSplit,
};
pub use positions::{assign_positions, starter_positions, substitute_positions};
pub use scoring::{
    adjust_category_by_score, adjust_category_by_single_attr, category_score, gk_score,
    mental_score, overall_score, physical_score, set_category_score, set_overall_score,
    technical_score, CategoryScores,
};
