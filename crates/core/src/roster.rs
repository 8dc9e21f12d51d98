use crate::RngState;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("invalid setup: {0}")]
    InvalidSetup(String),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("no eligible participant to pick")]
    NoEligibleParticipant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: i64,
    #[serde(default)]
    pub partner: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Couple(pub PlayerId, pub PlayerId);

impl Couple {
    pub fn contains(&self, id: PlayerId) -> bool {
        self.0 == id || self.1 == id
    }
}

/// Leader summary shown beside the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    CoupleLead { couple: Couple, total: i64 },
    PlayerLead(PlayerId),
    JustStarted,
    Empty,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
    couples: Vec<Couple>,
}

impl Roster {
    pub fn setup(names: &[String], pairings: &[(usize, usize)]) -> Result<Self, RosterError> {
        if names.is_empty() {
            return Err(RosterError::InvalidSetup("at least one player is required".into()));
        }
        let mut players: Vec<Player> = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let name = name.trim();
                Player {
                    id: PlayerId(idx as u32 + 1),
                    name: if name.is_empty() {
                        format!("Player {}", idx + 1)
                    } else {
                        name.to_string()
                    },
                    score: 0,
                    partner: None,
                }
            })
            .collect();

        let mut couples = Vec::with_capacity(pairings.len());
        for &(a, b) in pairings {
            if a >= players.len() || b >= players.len() {
                return Err(RosterError::InvalidSetup(format!(
                    "pairing ({a}, {b}) is out of range for {} players",
                    players.len()
                )));
            }
            if a == b {
                return Err(RosterError::InvalidSetup(format!(
                    "player {} cannot be paired with themself",
                    players[a].name
                )));
            }
            for idx in [a, b] {
                if players[idx].partner.is_some() {
                    return Err(RosterError::InvalidSetup(format!(
                        "player {} already has a partner",
                        players[idx].name
                    )));
                }
            }
            let (id_a, id_b) = (players[a].id, players[b].id);
            players[a].partner = Some(id_b);
            players[b].partner = Some(id_a);
            couples.push(Couple(id_a, id_b));
        }
        Ok(Self { players, couples })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn couples(&self) -> &[Couple] {
        &self.couples
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|player| player.id).collect()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, RosterError> {
        self.get(id).ok_or(RosterError::UnknownPlayer(id))
    }

    pub fn at(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn partner_of(&self, id: PlayerId) -> Option<&Player> {
        self.get(id)?.partner.and_then(|partner| self.get(partner))
    }

    pub fn couple_of(&self, id: PlayerId) -> Option<Couple> {
        self.couples.iter().copied().find(|couple| couple.contains(id))
    }

    pub fn couple_total(&self, couple: Couple) -> Option<i64> {
        let a = self.get(couple.0)?;
        let b = self.get(couple.1)?;
        Some(a.score.saturating_add(b.score))
    }

    pub fn update_score(&mut self, id: PlayerId, delta: i64) -> Result<i64, RosterError> {
        let player = self
            .players
            .iter_mut()
            .find(|player| player.id == id)
            .ok_or(RosterError::UnknownPlayer(id))?;
        player.score = player.score.saturating_add(delta);
        Ok(player.score)
    }

    pub fn reset_scores(&mut self) {
        for player in &mut self.players {
            player.score = 0;
        }
    }

    pub fn leading_player(&self) -> Option<&Player> {
        let mut best: Option<&Player> = None;
        for player in &self.players {
            if best.map_or(true, |leader| player.score > leader.score) {
                best = Some(player);
            }
        }
        best.filter(|leader| leader.score > 0)
    }

    pub fn leading_couple(&self) -> Option<(Couple, i64)> {
        let mut best: Option<(Couple, i64)> = None;
        for &couple in &self.couples {
            let Some(total) = self.couple_total(couple) else {
                continue;
            };
            if best.map_or(true, |(_, leader)| total > leader) {
                best = Some((couple, total));
            }
        }
        best.filter(|(_, total)| *total > 0)
    }

    pub fn standing(&self) -> Standing {
        if let Some((couple, total)) = self.leading_couple() {
            return Standing::CoupleLead { couple, total };
        }
        match self.leading_player() {
            Some(player) => Standing::PlayerLead(player.id),
            None if self.players.is_empty() => Standing::Empty,
            None => Standing::JustStarted,
        }
    }

    /// Uniform pick among `candidates` minus `exclude`.
    pub fn pick_participant(
        &self,
        candidates: &[PlayerId],
        exclude: PlayerId,
        rng: &mut RngState,
    ) -> Result<PlayerId, RosterError> {
        let eligible: Vec<PlayerId> = candidates
            .iter()
            .copied()
            .filter(|id| *id != exclude && self.get(*id).is_some())
            .collect();
        rng.choose(&eligible)
            .copied()
            .ok_or(RosterError::NoEligibleParticipant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    fn roster(list: &[&str]) -> Roster {
        Roster::setup(&names(list), &[]).expect("setup")
    }

    #[test]
    fn setup_assigns_ids_and_default_names() {
        let roster = roster(&["Ana", " ", "Cy"]);
        let ids: Vec<String> = roster.ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["player1", "player2", "player3"]);
        assert_eq!(roster.players()[1].name, "Player 2");
        assert!(roster.players().iter().all(|player| player.score == 0));
    }

    #[test]
    fn setup_rejects_empty_names() {
        assert!(matches!(
            Roster::setup(&[], &[]),
            Err(RosterError::InvalidSetup(_))
        ));
    }

    #[test]
    fn pairings_are_symmetric() {
        let roster = Roster::setup(&names(&["A", "B", "C"]), &[(0, 2)]).expect("setup");
        assert_eq!(roster.players()[0].partner, Some(PlayerId(3)));
        assert_eq!(roster.players()[2].partner, Some(PlayerId(1)));
        assert_eq!(roster.players()[1].partner, None);
        assert_eq!(roster.couple_of(PlayerId(3)), Some(Couple(PlayerId(1), PlayerId(3))));
        assert_eq!(roster.partner_of(PlayerId(1)).map(|p| p.name.as_str()), Some("C"));
    }

    #[test]
    fn pairings_reject_bad_indices_and_second_partners() {
        let list = names(&["A", "B", "C"]);
        assert!(Roster::setup(&list, &[(0, 3)]).is_err());
        assert!(Roster::setup(&list, &[(1, 1)]).is_err());
        assert!(Roster::setup(&list, &[(0, 1), (1, 2)]).is_err());
    }

    #[test]
    fn update_score_unknown_player() {
        let mut roster = roster(&["A"]);
        assert_eq!(
            roster.update_score(PlayerId(9), 1),
            Err(RosterError::UnknownPlayer(PlayerId(9)))
        );
    }

    #[test]
    fn leading_player_none_when_nobody_positive() {
        let mut roster = roster(&["A", "B"]);
        assert!(roster.leading_player().is_none());
        roster.update_score(PlayerId(1), -3).expect("score");
        assert!(roster.leading_player().is_none());
        assert_eq!(roster.standing(), Standing::JustStarted);
    }

    #[test]
    fn extreme_deltas_saturate_instead_of_overflowing() {
        let mut roster = Roster::setup(&names(&["A", "B"]), &[(0, 1)]).expect("setup");
        roster.update_score(PlayerId(1), -5).expect("score");
        assert_eq!(roster.update_score(PlayerId(1), i64::MIN), Ok(i64::MIN));
        roster.update_score(PlayerId(2), i64::MAX).expect("score");
        assert_eq!(roster.update_score(PlayerId(2), 1), Ok(i64::MAX));
        assert_eq!(roster.couple_total(Couple(PlayerId(1), PlayerId(2))), Some(-1));
        roster.update_score(PlayerId(1), i64::MAX).expect("score");
        roster.update_score(PlayerId(1), i64::MAX).expect("score");
        assert_eq!(
            roster.couple_total(Couple(PlayerId(1), PlayerId(2))),
            Some(i64::MAX)
        );
    }

    #[test]
    fn leading_player_prefers_first_on_ties() {
        let mut roster = roster(&["A", "B", "C"]);
        roster.update_score(PlayerId(2), 4).expect("score");
        roster.update_score(PlayerId(3), 4).expect("score");
        assert_eq!(roster.leading_player().map(|p| p.id), Some(PlayerId(2)));
        roster.update_score(PlayerId(3), 1).expect("score");
        assert_eq!(roster.leading_player().map(|p| p.id), Some(PlayerId(3)));
        assert_eq!(roster.standing(), Standing::PlayerLead(PlayerId(3)));
    }

    #[test]
    fn leading_couple_sums_members() {
        let mut roster =
            Roster::setup(&names(&["A", "B", "C", "D"]), &[(0, 1), (2, 3)]).expect("setup");
        assert!(roster.leading_couple().is_none());
        roster.update_score(PlayerId(1), 5).expect("score");
        roster.update_score(PlayerId(3), 3).expect("score");
        roster.update_score(PlayerId(4), 3).expect("score");
        let (couple, total) = roster.leading_couple().expect("leader");
        assert_eq!(couple, Couple(PlayerId(3), PlayerId(4)));
        assert_eq!(total, 6);
        assert_eq!(roster.standing(), Standing::CoupleLead { couple, total });
    }

    #[test]
    fn empty_roster_standing() {
        assert_eq!(Roster::default().standing(), Standing::Empty);
    }

    #[test]
    fn pick_participant_excludes_current() {
        let roster = roster(&["A", "B"]);
        let mut rng = RngState::from_seed(11);
        for _ in 0..20 {
            let picked = roster
                .pick_participant(&roster.ids(), PlayerId(1), &mut rng)
                .expect("pick");
            assert_eq!(picked, PlayerId(2));
        }
    }

    #[test]
    fn pick_participant_single_player_fails() {
        let roster = roster(&["Solo"]);
        let mut rng = RngState::from_seed(11);
        assert_eq!(
            roster.pick_participant(&roster.ids(), PlayerId(1), &mut rng),
            Err(RosterError::NoEligibleParticipant)
        );
    }

    proptest! {
        #[test]
        fn scores_are_additive(d1 in -50i64..50, d2 in -50i64..50) {
            let mut roster = roster(&["A"]);
            roster.update_score(PlayerId(1), d1).unwrap();
            let total = roster.update_score(PlayerId(1), d2).unwrap();
            prop_assert_eq!(total, d1 + d2);
        }

        #[test]
        fn distinct_positive_scores_have_unique_leader(scores in prop::collection::btree_set(1i64..1000, 1..8)) {
            let scores: Vec<i64> = scores.into_iter().collect();
            let list: Vec<String> = (0..scores.len()).map(|idx| format!("P{idx}")).collect();
            let mut roster = Roster::setup(&list, &[]).unwrap();
            for (idx, score) in scores.iter().enumerate() {
                roster.update_score(PlayerId(idx as u32 + 1), *score).unwrap();
            }
            let max = *scores.iter().max().unwrap();
            prop_assert_eq!(roster.leading_player().map(|p| p.score), Some(max));
        }
    }
}
