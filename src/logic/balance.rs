//! Partitioning a ranked pool into lineups: greedy two-team balance, swap refinement,
//! and single-team selection. Pure; no store access.

use crate::config::ALLOCATION_MAX_ITERATIONS;
use crate::models::Rated;

/// Starters and substitutes of one team.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lineup<T> {
    pub starters: Vec<T>,
    pub substitutes: Vec<T>,
}

impl<T> Default for Lineup<T> {
    fn default() -> Self {
        Self {
            starters: Vec::new(),
            substitutes: Vec::new(),
        }
    }
}

impl<T: Rated> Lineup<T> {
    pub fn len(&self) -> usize {
        self.starters.len() + self.substitutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the starters' overall scores.
    pub fn starter_score(&self) -> u64 {
        self.starters.iter().map(|p| u64::from(p.overall_score())).sum()
    }
}

/// Result of splitting a pool into team 1 and team 2.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TwoTeamSplit<T> {
    pub team_1: Lineup<T>,
    pub team_2: Lineup<T>,
}

impl<T: Rated> TwoTeamSplit<T> {
    /// |team 1 starter total - team 2 starter total|
    pub fn starter_gap(&self) -> u64 {
        self.team_1.starter_score().abs_diff(self.team_2.starter_score())
    }
}

/// Default starters-per-team cap for two teams: ceil(n / 2).
pub fn default_cap(pool_size: usize) -> usize {
    pool_size.div_ceil(2)
}

/// `Some(0)` means "no cap", the same as `None`.
fn effective_cap(cap: Option<usize>) -> Option<usize> {
    cap.filter(|&c| c > 0)
}

/// Sort by overall score, highest first. Stable: equal scores keep input order.
pub fn rank<T: Rated>(players: Vec<T>) -> Vec<T> {
    let mut scored: Vec<(u32, T)> = players.into_iter().map(|p| (p.overall_score(), p)).collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, p)| p).collect()
}

/// Greedy split into two teams of at most `cap` starters each (default ceil(n / 2)).
/// A cap of 0 counts as no cap.
///
/// Each player, best first, joins the team with room; when both have room, the one with the
/// lower starter total (team 1 on ties). Players left over once both teams are full become
/// substitutes, alternating team 1, team 2, ... in ranked order.
pub fn balance_two_teams<T: Rated>(players: Vec<T>, cap: Option<usize>) -> TwoTeamSplit<T> {
    let cap = effective_cap(cap).unwrap_or_else(|| default_cap(players.len()));
    let mut team_1 = Lineup::default();
    let mut team_2 = Lineup::default();
    let (mut score_1, mut score_2) = (0u64, 0u64);
    let mut deferred = Vec::new();

    for player in rank(players) {
        let score = u64::from(player.overall_score());
        let room_1 = team_1.starters.len() < cap;
        let room_2 = team_2.starters.len() < cap;
        match (room_1, room_2) {
            (true, true) if score_1 <= score_2 => {
                score_1 += score;
                team_1.starters.push(player);
            }
            (true, true) | (false, true) => {
                score_2 += score;
                team_2.starters.push(player);
            }
            (true, false) => {
                score_1 += score;
                team_1.starters.push(player);
            }
            (false, false) => deferred.push(player),
        }
    }

    for (idx, player) in deferred.into_iter().enumerate() {
        if idx % 2 == 0 {
            team_1.substitutes.push(player);
        } else {
            team_2.substitutes.push(player);
        }
    }

    TwoTeamSplit { team_1, team_2 }
}

/// Swap starters between the teams while a swap strictly narrows the starter gap.
///
/// Scans team 1 starters (outer) against team 2 starters (inner) and takes the first
/// improving pair; swapped players move to the end of their new list and the scan restarts.
/// Stops after a scan with no improvement or `ALLOCATION_MAX_ITERATIONS` scans.
/// Returns the number of swaps made.
pub fn refine_by_swaps<T: Rated>(split: &mut TwoTeamSplit<T>) -> usize {
    let starters_1 = &mut split.team_1.starters;
    let starters_2 = &mut split.team_2.starters;
    let mut scores_1: Vec<i64> = starters_1.iter().map(|p| i64::from(p.overall_score())).collect();
    let mut scores_2: Vec<i64> = starters_2.iter().map(|p| i64::from(p.overall_score())).collect();
    let mut total_1: i64 = scores_1.iter().sum();
    let mut total_2: i64 = scores_2.iter().sum();
    let mut gap = (total_1 - total_2).abs();

    let mut swaps = 0;
    let mut iterations = 0;
    let mut improved = true;
    while improved && iterations < ALLOCATION_MAX_ITERATIONS {
        improved = false;
        iterations += 1;

        'scan: for i in 0..scores_1.len() {
            for j in 0..scores_2.len() {
                let new_1 = total_1 - scores_1[i] + scores_2[j];
                let new_2 = total_2 - scores_2[j] + scores_1[i];
                let new_gap = (new_1 - new_2).abs();
                if new_gap < gap {
                    let p1 = starters_1.remove(i);
                    let p2 = starters_2.remove(j);
                    let s1 = scores_1.remove(i);
                    let s2 = scores_2.remove(j);
                    starters_1.push(p2);
                    starters_2.push(p1);
                    scores_1.push(s2);
                    scores_2.push(s1);

                    total_1 = new_1;
                    total_2 = new_2;
                    gap = new_gap;
                    swaps += 1;
                    improved = true;
                    log::debug!("swap accepted: starter gap now {gap}");
                    break 'scan;
                }
            }
        }
    }
    swaps
}

/// Best `cap` players (all if no cap, or a cap of 0) start; the rest are substitutes.
pub fn select_single_team<T: Rated>(players: Vec<T>, cap: Option<usize>) -> Lineup<T> {
    let mut starters = rank(players);
    let cap = effective_cap(cap).unwrap_or(starters.len());
    let substitutes = if cap < starters.len() {
        starters.split_off(cap)
    } else {
        Vec::new()
    };
    Lineup {
        starters,
        substitutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    struct Fixed(u32);

    impl Rated for Fixed {
        fn overall_score(&self) -> u32 {
            self.0
        }
    }

    fn fixed(scores: &[u32]) -> Vec<Fixed> {
        scores.iter().copied().map(Fixed).collect()
    }

    fn scores(players: &[Fixed]) -> Vec<u32> {
        players.iter().map(|p| p.0).collect()
    }

    #[test]
    fn rank_is_stable_for_ties() {
        #[derive(Debug)]
        struct Named(&'static str, u32);
        impl Rated for Named {
            fn overall_score(&self) -> u32 {
                self.1
            }
        }
        let ranked = rank(vec![Named("a", 50), Named("b", 90), Named("c", 50), Named("d", 50)]);
        let names: Vec<_> = ranked.iter().map(|n| n.0).collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn greedy_split_of_five() {
        let split = balance_two_teams(fixed(&[50, 70, 90, 60, 80]), None);
        assert_eq!(scores(&split.team_1.starters), vec![90, 60, 50]);
        assert_eq!(scores(&split.team_2.starters), vec![80, 70]);
        assert!(split.team_1.substitutes.is_empty());
        assert_eq!(split.starter_gap(), 50);
    }

    #[test]
    fn swaps_narrow_the_gap() {
        let mut split = balance_two_teams(fixed(&[90, 80, 70, 60, 50]), None);
        let swaps = refine_by_swaps(&mut split);
        assert_eq!(swaps, 2);
        assert_eq!(scores(&split.team_1.starters), vec![60, 50, 70]);
        assert_eq!(scores(&split.team_2.starters), vec![90, 80]);
        assert_eq!(split.starter_gap(), 10);
    }

    #[test]
    fn overflow_alternates_substitutes() {
        let split = balance_two_teams(fixed(&[100, 90, 80, 70, 60, 50, 40]), Some(2));
        assert_eq!(split.team_1.starters.len(), 2);
        assert_eq!(split.team_2.starters.len(), 2);
        assert_eq!(scores(&split.team_1.substitutes), vec![60, 40]);
        assert_eq!(scores(&split.team_2.substitutes), vec![50]);
    }

    #[test]
    fn full_team_forces_the_other() {
        // cap 1: 100 -> team 1, then team 1 is full so 10 -> team 2 regardless of totals
        let split = balance_two_teams(fixed(&[100, 10]), Some(1));
        assert_eq!(scores(&split.team_1.starters), vec![100]);
        assert_eq!(scores(&split.team_2.starters), vec![10]);
    }

    #[test]
    fn balanced_input_needs_no_swaps() {
        let mut split = balance_two_teams(fixed(&[10, 10, 10, 10]), None);
        assert_eq!(refine_by_swaps(&mut split), 0);
        assert_eq!(split.starter_gap(), 0);
    }

    #[test]
    fn single_team_with_and_without_cap() {
        let lineup = select_single_team(fixed(&[25, 100, 50, 75]), Some(2));
        assert_eq!(scores(&lineup.starters), vec![100, 75]);
        assert_eq!(scores(&lineup.substitutes), vec![50, 25]);

        let lineup = select_single_team(fixed(&[25, 100]), None);
        assert_eq!(lineup.starters.len(), 2);
        assert!(lineup.substitutes.is_empty());

        let lineup = select_single_team(fixed(&[100]), Some(1));
        assert_eq!(lineup.starters.len(), 1);
        assert!(lineup.substitutes.is_empty());
    }

    #[test]
    fn zero_cap_means_no_cap() {
        let split = balance_two_teams(fixed(&[90, 80, 70, 60]), Some(0));
        assert_eq!(split.team_1.starters.len(), 2);
        assert_eq!(split.team_2.starters.len(), 2);
        assert_eq!(split.team_1.len() + split.team_2.len(), 4);
        assert!(split.team_1.substitutes.is_empty() && split.team_2.substitutes.is_empty());

        let lineup = select_single_team(fixed(&[25, 100, 50]), Some(0));
        assert_eq!(scores(&lineup.starters), vec![100, 50, 25]);
        assert!(lineup.substitutes.is_empty());
    }
}
