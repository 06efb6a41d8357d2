//! In-memory store: players, matches, teams and match-player records.

use crate::models::{
    Match, MatchId, MatchPlayer, MatchPlayerId, MatchPlayerUpdate, MatchTeam, Player,
    PlayerAttributes, PlayerId, Position, SignupPlayer, Team, TeamId,
};
use crate::store::{ClubStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the club keeps, held in memory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    players: Vec<Player>,
    matches: HashMap<MatchId, Match>,
    teams: Vec<MatchTeam>,
    match_players: Vec<MatchPlayer>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. Names are trimmed and must be unique (case-insensitive).
    pub fn add_player(
        &mut self,
        name: &str,
        attributes: PlayerAttributes,
    ) -> Result<PlayerId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.players.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(StoreError::DuplicatePlayerName);
        }
        let player = Player::with_attributes(name, attributes);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, StoreError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::PlayerNotFound(id))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn update_player_attributes(
        &mut self,
        id: PlayerId,
        attributes: PlayerAttributes,
    ) -> Result<(), StoreError> {
        self.player_mut(id)?.attributes = attributes;
        Ok(())
    }

    /// Delete a player and their match records.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), StoreError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::PlayerNotFound(id))?;
        self.players.remove(idx);
        self.match_players.retain(|mp| mp.player_id != id);
        Ok(())
    }

    /// Clear every player's legacy team, position and starter flag.
    pub fn reset_teams(&mut self) -> usize {
        for p in &mut self.players {
            p.clear_assignment();
        }
        log::info!("Reset teams: {} players updated", self.players.len());
        self.players.len()
    }

    /// Exchange the legacy team, position and starter flag of two players.
    pub fn swap_players(&mut self, a: PlayerId, b: PlayerId) -> Result<(), StoreError> {
        let pa = self.player(a).ok_or(StoreError::PlayerNotFound(a))?;
        let (team_a, pos_a, starter_a) = (pa.team, pa.position, pa.is_starter);
        let pb = self.player(b).ok_or(StoreError::PlayerNotFound(b))?;
        let (team_b, pos_b, starter_b) = (pb.team, pb.position, pb.is_starter);
        self.player_mut(a)?.assign(team_b, pos_b, starter_b);
        self.player_mut(b)?.assign(team_a, pos_a, starter_a);
        log::debug!("Swapped teams/positions for players {} and {}", a, b);
        Ok(())
    }

    pub fn add_match(&mut self, m: Match) -> MatchId {
        let id = m.id;
        self.matches.insert(id, m);
        id
    }

    /// Add a match together with its teams. Nothing is stored unless every team belongs to
    /// the match and team numbers are distinct.
    pub fn add_match_with_teams(
        &mut self,
        m: Match,
        teams: Vec<MatchTeam>,
    ) -> Result<MatchId, StoreError> {
        for (i, team) in teams.iter().enumerate() {
            if team.match_id != m.id {
                return Err(StoreError::MatchNotFound(team.match_id));
            }
            if teams[..i].iter().any(|t| t.number == team.number) {
                return Err(StoreError::DuplicateTeamNumber(team.number));
            }
        }
        let id = self.add_match(m);
        self.teams.extend(teams);
        Ok(id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(&id)
    }

    /// Add a team to an existing match. At most one team per number.
    pub fn add_match_team(&mut self, team: MatchTeam) -> Result<TeamId, StoreError> {
        if !self.matches.contains_key(&team.match_id) {
            return Err(StoreError::MatchNotFound(team.match_id));
        }
        if self
            .teams
            .iter()
            .any(|t| t.match_id == team.match_id && t.number == team.number)
        {
            return Err(StoreError::DuplicateTeamNumber(team.number));
        }
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    pub fn match_team_mut(&mut self, id: TeamId) -> Result<&mut MatchTeam, StoreError> {
        self.teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TeamNotFound(id))
    }

    /// Sign a player up for a match (creates an `Unassigned` record).
    pub fn sign_up(
        &mut self,
        match_id: MatchId,
        player_id: PlayerId,
    ) -> Result<MatchPlayerId, StoreError> {
        self.add_match_player(match_id, player_id, None, None, false)
    }

    /// Delete one match-player record, returning it.
    pub fn remove_match_player(&mut self, id: MatchPlayerId) -> Result<MatchPlayer, StoreError> {
        let idx = self
            .match_players
            .iter()
            .position(|mp| mp.id == id)
            .ok_or(StoreError::MatchPlayerNotFound(id))?;
        Ok(self.match_players.remove(idx))
    }

    /// Delete every record of the match that is not on a team. Returns how many went.
    pub fn clear_signups(&mut self, match_id: MatchId) -> usize {
        let before = self.match_players.len();
        self.match_players
            .retain(|mp| mp.match_id != match_id || mp.team_id.is_some());
        let removed = before - self.match_players.len();
        log::info!("Cleared {} signups from match {}", removed, match_id);
        removed
    }

    pub fn match_player(&self, id: MatchPlayerId) -> Option<&MatchPlayer> {
        self.match_players.iter().find(|mp| mp.id == id)
    }

    fn match_player_mut(&mut self, id: MatchPlayerId) -> Result<&mut MatchPlayer, StoreError> {
        self.match_players
            .iter_mut()
            .find(|mp| mp.id == id)
            .ok_or(StoreError::MatchPlayerNotFound(id))
    }

    /// Number of match-player records for a match.
    pub fn match_record_count(&self, match_id: MatchId) -> usize {
        self.match_players
            .iter()
            .filter(|mp| mp.match_id == match_id)
            .count()
    }

    /// Exchange team, position and starter flag of two match-player records.
    pub fn swap_match_players(
        &mut self,
        a: MatchPlayerId,
        b: MatchPlayerId,
    ) -> Result<(), StoreError> {
        let ra = self.match_player(a).ok_or(StoreError::MatchPlayerNotFound(a))?;
        let update_b = MatchPlayerUpdate {
            team_id: ra.team_id.into(),
            position: ra.position.into(),
            is_starter: Some(ra.is_starter),
            ..Default::default()
        };
        let rb = self.match_player(b).ok_or(StoreError::MatchPlayerNotFound(b))?;
        let update_a = MatchPlayerUpdate {
            team_id: rb.team_id.into(),
            position: rb.position.into(),
            is_starter: Some(rb.is_starter),
            ..Default::default()
        };
        self.match_player_mut(a)?.apply(&update_a);
        self.match_player_mut(b)?.apply(&update_b);
        Ok(())
    }

    fn joined(&self, record: &MatchPlayer) -> Option<SignupPlayer> {
        self.player(record.player_id).map(|p| SignupPlayer {
            record: record.clone(),
            name: p.name.clone(),
            attributes: p.attributes.clone(),
        })
    }
}

impl ClubStore for MemoryStore {
    fn all_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.players.clone())
    }

    fn update_player_team(
        &mut self,
        id: PlayerId,
        team: Option<Team>,
        position: Option<Position>,
        is_starter: bool,
    ) -> Result<(), StoreError> {
        self.player_mut(id)?.assign(team, position, is_starter);
        Ok(())
    }

    fn find_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        Ok(self.matches.get(&id).cloned())
    }

    fn match_teams(&self, match_id: MatchId) -> Result<Vec<MatchTeam>, StoreError> {
        let mut teams: Vec<MatchTeam> = self
            .teams
            .iter()
            .filter(|t| t.match_id == match_id)
            .cloned()
            .collect();
        teams.sort_by_key(|t| t.number);
        Ok(teams)
    }

    fn match_players(
        &self,
        match_id: MatchId,
        team_id: Option<TeamId>,
    ) -> Result<Vec<SignupPlayer>, StoreError> {
        Ok(self
            .match_players
            .iter()
            .filter(|mp| mp.match_id == match_id)
            .filter(|mp| team_id.is_none() || mp.team_id == team_id)
            .filter_map(|mp| self.joined(mp))
            .collect())
    }

    fn match_signup_players(&self, match_id: MatchId) -> Result<Vec<SignupPlayer>, StoreError> {
        let mut signups: Vec<SignupPlayer> = self
            .match_players
            .iter()
            .filter(|mp| mp.match_id == match_id && mp.team_id.is_none())
            .filter_map(|mp| self.joined(mp))
            .collect();
        signups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(signups)
    }

    fn update_match_player(
        &mut self,
        id: MatchPlayerId,
        update: &MatchPlayerUpdate,
    ) -> Result<(), StoreError> {
        if let crate::models::FieldUpdate::Set(team_id) = update.team_id {
            if !self.teams.iter().any(|t| t.id == team_id) {
                return Err(StoreError::TeamNotFound(team_id));
            }
        }
        self.match_player_mut(id)?.apply(update);
        Ok(())
    }

    fn add_match_player(
        &mut self,
        match_id: MatchId,
        player_id: PlayerId,
        team_id: Option<TeamId>,
        position: Option<Position>,
        is_starter: bool,
    ) -> Result<MatchPlayerId, StoreError> {
        if !self.matches.contains_key(&match_id) {
            return Err(StoreError::MatchNotFound(match_id));
        }
        if self.player(player_id).is_none() {
            return Err(StoreError::PlayerNotFound(player_id));
        }
        if self
            .match_players
            .iter()
            .any(|mp| mp.match_id == match_id && mp.player_id == player_id)
        {
            return Err(StoreError::DuplicateSignup {
                match_id,
                player_id,
            });
        }
        let mut record = MatchPlayer::signup(match_id, player_id);
        record.team_id = team_id;
        record.position = position;
        record.is_starter = is_starter;
        let id = record.id;
        self.match_players.push(record);
        Ok(id)
    }
}
