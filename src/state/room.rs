//! Per-room game state machine.
//!
//! A [`Room`] is mutated only through the methods here. Each transition
//! validates the action against the current phase and turn, updates the
//! room, and returns the [`Directive`]s the connection layer must deliver.
//! Stale or out-of-turn actions return no directives and change nothing.

use super::{roles, turn, vote, words};
use crate::error::{GameError, GameResult};
use crate::protocol::{Directive, ServerMessage};
use crate::types::*;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    pub host_id: PlayerId,
    /// Join order; indices into this list address players during a round
    pub players: Vec<Player>,
    pub phase: Phase,
    pub round: Option<Round>,
}

/// Outcome of removing a player from a room
#[derive(Debug)]
pub struct Departure {
    pub player: Player,
    pub room_empty: bool,
    pub directives: Vec<Directive>,
}

/// Trim a display name and cut it to `MAX_NAME_CHARS` characters
pub fn normalize_player_name(raw: &str) -> GameResult<String> {
    let name: String = raw.trim().chars().take(MAX_NAME_CHARS).collect();
    let name = name.trim_end().to_string();
    if name.is_empty() {
        return Err(GameError::InvalidName);
    }
    Ok(name)
}

impl Room {
    /// Create a room in the lobby with the host as its only player
    pub fn new<R: Rng + ?Sized>(
        code: RoomCode,
        host_id: PlayerId,
        host_name: String,
        rng: &mut R,
    ) -> Self {
        let host = Player {
            id: host_id.clone(),
            name: host_name,
            avatar: words::pick_avatar(&[], rng),
            is_host: true,
            ready: false,
        };

        Self {
            code,
            host_id,
            players: vec![host],
            phase: Phase::Lobby,
            round: None,
        }
    }

    pub fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn is_host(&self, player_id: &str) -> bool {
        self.host_id == player_id
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn broadcast(&self, msg: ServerMessage) -> Directive {
        Directive::ToRoom {
            code: self.code.clone(),
            msg,
        }
    }

    /// Add a player to the lobby.
    ///
    /// The joiner's own response is built by the caller; the returned
    /// directives notify the players who were already in the room.
    pub fn join<R: Rng + ?Sized>(
        &mut self,
        player_id: PlayerId,
        name: String,
        rng: &mut R,
    ) -> GameResult<Vec<Directive>> {
        // An emptied room may still be referenced briefly while it is being removed
        if self.is_empty() {
            return Err(GameError::RoomNotFound(self.code.to_string()));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::RoomFull);
        }
        if self.phase != Phase::Lobby {
            return Err(GameError::GameInProgress);
        }
        if self.player_index(&player_id).is_some() {
            return Err(GameError::AlreadyInRoom(self.code.clone()));
        }

        let used: Vec<&str> = self.players.iter().map(|p| p.avatar.as_str()).collect();
        let avatar = words::pick_avatar(&used, rng);

        let existing: Vec<PlayerId> = self.players.iter().map(|p| p.id.clone()).collect();

        tracing::info!("{} joined room {}", name, self.code);
        self.players.push(Player {
            id: player_id,
            name,
            avatar,
            is_host: false,
            ready: false,
        });

        Ok(existing
            .into_iter()
            .map(|player_id| Directive::ToPlayer {
                player_id,
                msg: ServerMessage::PlayerJoined {
                    players: self.players.clone(),
                },
            })
            .collect())
    }

    /// Lobby -> Reveal. Host only, needs `MIN_PLAYERS`. Ignored once a
    /// round is running.
    pub fn start_game<R: Rng + ?Sized>(
        &mut self,
        player_id: &str,
        options: &GameOptions,
        rng: &mut R,
    ) -> GameResult<Vec<Directive>> {
        if !self.is_host(player_id) {
            return Err(GameError::NotAuthorized("start the game"));
        }
        if self.phase != Phase::Lobby {
            return Ok(Vec::new());
        }
        let player_count = self.players.len();
        if player_count < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers(MIN_PLAYERS));
        }

        let setup = roles::select_round(player_count, options, rng);
        let turn_order = turn::generate_turn_order(player_count, rng);
        let round = setup.into_round(turn_order);

        for player in self.players.iter_mut() {
            player.ready = false;
        }

        tracing::info!(
            "Game started in room {} with {} players (jester: {})",
            self.code,
            player_count,
            round.options.jester_enabled
        );
        tracing::debug!(
            "Room {}: impostor is {}, word is {:?}",
            self.code,
            self.players[round.impostor_index].name,
            round.word
        );

        let directives = self
            .players
            .iter()
            .enumerate()
            .map(|(index, player)| Directive::ToPlayer {
                player_id: player.id.clone(),
                msg: ServerMessage::GameStarted {
                    phase: Phase::Reveal,
                    reveal: roles::reveal_for(index, &round),
                    players: self.players.clone(),
                    turn_order: round.turn_order.clone(),
                    my_index: index,
                },
            })
            .collect();

        self.round = Some(round);
        self.phase = Phase::Reveal;
        Ok(directives)
    }

    /// A player has seen their role. The last one to ready up starts the
    /// submission phase.
    pub fn mark_ready(&mut self, player_id: &str) -> Vec<Directive> {
        if self.phase != Phase::Reveal {
            return Vec::new();
        }
        let Some(index) = self.player_index(player_id) else {
            return Vec::new();
        };
        self.players[index].ready = true;
        self.check_all_ready()
    }

    fn check_all_ready(&mut self) -> Vec<Directive> {
        let ready = self.players.iter().filter(|p| p.ready).count();
        if ready < self.players.len() {
            return vec![self.broadcast(ServerMessage::ReadyUpdate {
                ready,
                total: self.players.len(),
            })];
        }

        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };
        round.turn_pointer = 0;
        let first = turn::current_turn_player_index(round);

        self.phase = Phase::Submission;
        tracing::info!("Room {} entered submission phase", self.code);
        vec![self.broadcast(ServerMessage::PhaseChange {
            phase: Phase::Submission,
            current_turn_index: first,
            submitted_words: Some(Vec::new()),
        })]
    }

    /// Submit the clue word for the player whose turn it is
    pub fn submit_word(&mut self, player_id: &str, word: &str) -> Vec<Directive> {
        if self.phase != Phase::Submission {
            return Vec::new();
        }
        let Some(index) = self.player_index(player_id) else {
            return Vec::new();
        };
        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };
        if turn::current_turn_player_index(round) != Some(index) {
            tracing::debug!("Ignoring out-of-turn word in room {}", self.code);
            return Vec::new();
        }

        let word: String = word.trim().chars().take(MAX_WORD_CHARS).collect();
        let word = word.trim_end().to_string();
        if word.is_empty() {
            return Vec::new();
        }

        round.submitted_words.push(SubmittedWord {
            player_index: index,
            player_name: self.players[index].name.clone(),
            word,
        });
        round.turn_pointer += 1;

        self.after_submission_change()
    }

    fn after_submission_change(&mut self) -> Vec<Directive> {
        let Some(round) = self.round.as_ref() else {
            return Vec::new();
        };
        let submitted_words = round.submitted_words.clone();

        if round.turn_pointer >= self.players.len() {
            self.phase = Phase::Discussion;
            tracing::info!("Room {} entered discussion phase", self.code);
            vec![self.broadcast(ServerMessage::PhaseChange {
                phase: Phase::Discussion,
                current_turn_index: None,
                submitted_words: Some(submitted_words),
            })]
        } else {
            let current_turn_index = turn::current_turn_player_index(round);
            vec![self.broadcast(ServerMessage::WordSubmitted {
                submitted_words,
                current_turn_index,
            })]
        }
    }

    /// Discussion -> Voting. Host only.
    pub fn proceed_to_voting(&mut self, player_id: &str) -> GameResult<Vec<Directive>> {
        if !self.is_host(player_id) {
            return Err(GameError::NotAuthorized("start the vote"));
        }
        if self.phase != Phase::Discussion {
            return Ok(Vec::new());
        }
        let Some(round) = self.round.as_mut() else {
            return Ok(Vec::new());
        };
        round.votes.clear();

        self.phase = Phase::Voting;
        tracing::info!("Room {} entered voting phase", self.code);
        Ok(vec![self.broadcast(ServerMessage::PhaseChange {
            phase: Phase::Voting,
            current_turn_index: None,
            submitted_words: None,
        })])
    }

    /// Record a vote; the last missing vote produces the results.
    ///
    /// A negative `suspect_index` is a skip vote. Votes naming a player who
    /// does not exist are ignored.
    pub fn cast_vote(&mut self, player_id: &str, suspect_index: i64) -> Vec<Directive> {
        if self.phase != Phase::Voting {
            return Vec::new();
        }
        let Some(voter) = self.player_index(player_id) else {
            return Vec::new();
        };
        let suspect = match usize::try_from(suspect_index) {
            Ok(index) if index < self.players.len() => Some(index),
            Ok(_) => return Vec::new(),
            Err(_) => None,
        };
        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };

        vote::cast_vote(round, voter, suspect);
        self.after_vote_change()
    }

    fn after_vote_change(&mut self) -> Vec<Directive> {
        let player_count = self.players.len();
        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };

        if !vote::all_votes_in(round, player_count) {
            let votes_received = round.votes.len();
            return vec![self.broadcast(ServerMessage::VoteUpdate {
                votes_received,
                total_players: player_count,
            })];
        }

        let results = vote::compute_results(round, &self.players);
        round.results = Some(results.clone());
        self.phase = Phase::Results;

        tracing::info!(
            "Room {} results: impostor caught: {}, tie: {}",
            self.code,
            results.impostor_caught,
            results.tie
        );
        vec![self.broadcast(ServerMessage::GameResults { results })]
    }

    /// Results -> Lobby. Host only; keeps the players, discards the round.
    pub fn play_again(&mut self, player_id: &str) -> GameResult<Vec<Directive>> {
        if !self.is_host(player_id) {
            return Err(GameError::NotAuthorized("start a new game"));
        }
        if self.phase != Phase::Results {
            return Ok(Vec::new());
        }

        self.reset_to_lobby();
        tracing::info!("Room {} returned to lobby", self.code);
        Ok(vec![self.broadcast(ServerMessage::GameReset {
            players: self.players.clone(),
        })])
    }

    fn reset_to_lobby(&mut self) {
        self.round = None;
        self.phase = Phase::Lobby;
        for player in self.players.iter_mut() {
            player.ready = false;
        }
    }

    /// Remove a player who left or disconnected, in any phase.
    ///
    /// Promotes the first remaining player if the host left. During a round
    /// all positional indices are renumbered; the round is aborted if the
    /// impostor leaves or too few players remain.
    pub fn remove_player(&mut self, player_id: &str) -> Option<Departure> {
        let index = self.player_index(player_id)?;
        let player = self.players.remove(index);
        tracing::info!("{} left room {}", player.name, self.code);

        if self.players.is_empty() {
            return Some(Departure {
                player,
                room_empty: true,
                directives: Vec::new(),
            });
        }

        if self.host_id == player.id {
            let new_host = &mut self.players[0];
            new_host.is_host = true;
            self.host_id = new_host.id.clone();
            tracing::info!("{} is now host of room {}", new_host.name, self.code);
        }

        let mut directives = vec![self.broadcast(ServerMessage::PlayerLeft {
            players: self.players.clone(),
            left_player_name: player.name.clone(),
        })];
        directives.extend(self.reconcile_round(index));

        Some(Departure {
            player,
            room_empty: false,
            directives,
        })
    }

    fn reconcile_round(&mut self, removed: usize) -> Vec<Directive> {
        if matches!(self.phase, Phase::Lobby | Phase::Results) {
            return Vec::new();
        }
        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };

        if round.impostor_index == removed {
            return self.abort_round("The impostor left the game");
        }
        if self.players.len() < MIN_PLAYERS {
            return self.abort_round("Not enough players to continue");
        }

        renumber_round(round, removed);

        match self.phase {
            Phase::Reveal => self.check_all_ready(),
            Phase::Submission => self.after_submission_change(),
            Phase::Discussion => self.refresh_discussion(),
            Phase::Voting => self.after_vote_change(),
            _ => Vec::new(),
        }
    }

    /// Resend the word list after a departure removed a word and shifted indices
    fn refresh_discussion(&self) -> Vec<Directive> {
        let Some(round) = self.round.as_ref() else {
            return Vec::new();
        };
        vec![self.broadcast(ServerMessage::PhaseChange {
            phase: Phase::Discussion,
            current_turn_index: None,
            submitted_words: Some(round.submitted_words.clone()),
        })]
    }

    fn abort_round(&mut self, reason: &str) -> Vec<Directive> {
        tracing::info!("Round in room {} aborted: {}", self.code, reason);
        self.reset_to_lobby();
        vec![self.broadcast(ServerMessage::RoundAborted {
            reason: reason.to_string(),
            players: self.players.clone(),
        })]
    }
}

/// Rewrite every positional index in `round` after `removed` left the player list
fn renumber_round(round: &mut Round, removed: usize) {
    if let Some(shifted) = super::shift_index(round.impostor_index, removed) {
        round.impostor_index = shifted;
    }
    round.jester_index = round
        .jester_index
        .and_then(|j| super::shift_index(j, removed));
    if round.jester_index.is_none() {
        round.options.jester_enabled = false;
    }

    turn::remove_from_turn_order(round, removed);
    round.submitted_words.retain(|w| w.player_index != removed);
    for word in round.submitted_words.iter_mut() {
        if let Some(shifted) = super::shift_index(word.player_index, removed) {
            word.player_index = shifted;
        }
    }

    vote::remove_from_votes(round, removed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1234)
    }

    fn room_with(n: usize) -> Room {
        let mut rng = rng();
        let code = RoomCode::parse("ABCD").unwrap();
        let mut room = Room::new(code, "p0".to_string(), "Player 0".to_string(), &mut rng);
        for i in 1..n {
            room.join(format!("p{}", i), format!("Player {}", i), &mut rng)
                .unwrap();
        }
        room
    }

    fn id(index: usize) -> String {
        format!("p{}", index)
    }

    fn started(n: usize, options: GameOptions) -> Room {
        let mut room = room_with(n);
        room.start_game("p0", &options, &mut rng()).unwrap();
        room
    }

    /// Everyone readies up; returns the turn order
    fn to_submission(room: &mut Room) -> Vec<usize> {
        let ids: Vec<String> = room.players.iter().map(|p| p.id.clone()).collect();
        for player_id in &ids {
            room.mark_ready(player_id);
        }
        assert_eq!(room.phase, Phase::Submission);
        room.round.as_ref().unwrap().turn_order.clone()
    }

    fn submit_all(room: &mut Room) {
        let order = to_submission(room);
        for index in order {
            let player_id = room.players[index].id.clone();
            room.submit_word(&player_id, "clue");
        }
        assert_eq!(room.phase, Phase::Discussion);
    }

    fn to_voting(room: &mut Room) {
        submit_all(room);
        let host = room.host_id.clone();
        room.proceed_to_voting(&host).unwrap();
        assert_eq!(room.phase, Phase::Voting);
    }

    #[test]
    fn test_normalize_player_name() {
        assert_eq!(normalize_player_name("  Ann ").unwrap(), "Ann");
        assert_eq!(normalize_player_name("   "), Err(GameError::InvalidName));
        let long = "x".repeat(50);
        assert_eq!(
            normalize_player_name(&long).unwrap().chars().count(),
            MAX_NAME_CHARS
        );
    }

    #[test]
    fn test_new_room_has_host() {
        let room = room_with(1);
        assert_eq!(room.phase, Phase::Lobby);
        assert_eq!(room.players.len(), 1);
        assert!(room.players[0].is_host);
        assert!(room.is_host("p0"));
    }

    #[test]
    fn test_join_notifies_existing_players() {
        let mut room = room_with(2);
        let directives = room
            .join("p2".to_string(), "Player 2".to_string(), &mut rng())
            .unwrap();

        assert_eq!(directives.len(), 2);
        for directive in &directives {
            match directive {
                Directive::ToPlayer { player_id, msg } => {
                    assert_ne!(player_id, "p2");
                    assert!(matches!(msg, ServerMessage::PlayerJoined { players } if players.len() == 3));
                }
                other => panic!("unexpected directive: {:?}", other),
            }
        }
    }

    #[test]
    fn test_join_unique_avatars() {
        let room = room_with(MAX_PLAYERS);
        let mut avatars: Vec<&str> = room.players.iter().map(|p| p.avatar.as_str()).collect();
        avatars.sort_unstable();
        avatars.dedup();
        assert_eq!(avatars.len(), MAX_PLAYERS);
    }

    #[test]
    fn test_join_full_room_rejected() {
        let mut room = room_with(MAX_PLAYERS);
        let before = room.players.clone();

        let result = room.join("p9".to_string(), "Late".to_string(), &mut rng());
        assert_eq!(result, Err(GameError::RoomFull));
        assert_eq!(room.players, before);
    }

    #[test]
    fn test_join_during_game_rejected() {
        let mut room = started(3, GameOptions::default());
        let result = room.join("p3".to_string(), "Late".to_string(), &mut rng());
        assert_eq!(result, Err(GameError::GameInProgress));
    }

    #[test]
    fn test_start_requires_host() {
        let mut room = room_with(3);
        let result = room.start_game("p1", &GameOptions::default(), &mut rng());
        assert_eq!(result, Err(GameError::NotAuthorized("start the game")));
        assert_eq!(room.phase, Phase::Lobby);
    }

    #[test]
    fn test_start_requires_three_players() {
        let mut room = room_with(2);
        let result = room.start_game("p0", &GameOptions::default(), &mut rng());
        assert_eq!(result, Err(GameError::NotEnoughPlayers(3)));
        assert!(room.round.is_none());
    }

    #[test]
    fn test_start_during_round_ignored() {
        let mut room = started(4, GameOptions::default());
        let before = room.round.clone().unwrap();

        let directives = room
            .start_game("p0", &GameOptions::default(), &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert!(directives.is_empty());
        assert_eq!(room.phase, Phase::Reveal);
        let round = room.round.as_ref().unwrap();
        assert_eq!(round.word, before.word);
        assert_eq!(round.impostor_index, before.impostor_index);
        assert_eq!(round.turn_order, before.turn_order);

        // Non-hosts are still told they cannot start
        assert_eq!(
            room.start_game("p1", &GameOptions::default(), &mut rng()),
            Err(GameError::NotAuthorized("start the game"))
        );
    }

    #[test]
    fn test_start_sends_private_reveals() {
        let mut room = room_with(4);
        let directives = room
            .start_game("p0", &GameOptions::default(), &mut rng())
            .unwrap();
        let round = room.round.as_ref().unwrap();

        assert_eq!(room.phase, Phase::Reveal);
        assert_eq!(directives.len(), 4);
        for directive in directives {
            let Directive::ToPlayer { player_id, msg } = directive else {
                panic!("reveal must be unicast");
            };
            let ServerMessage::GameStarted {
                reveal, my_index, ..
            } = msg
            else {
                panic!("expected GameStarted");
            };
            assert_eq!(room.players[my_index].id, player_id);
            if my_index == round.impostor_index {
                assert!(reveal.word.is_none());
            } else {
                assert_eq!(reveal.word.as_deref(), Some(round.word.as_str()));
                assert!(reveal.hint.is_none());
            }
        }
    }

    #[test]
    fn test_jester_silently_disabled_with_three_players() {
        let options = GameOptions {
            jester_enabled: Some(true),
            ..Default::default()
        };
        let room = started(3, options);
        let round = room.round.as_ref().unwrap();
        assert!(!round.options.jester_enabled);
        assert_eq!(round.jester_index, None);
    }

    #[test]
    fn test_ready_progress_then_submission() {
        let mut room = started(3, GameOptions::default());

        let directives = room.mark_ready("p0");
        assert!(matches!(
            &directives[..],
            [Directive::ToRoom { msg: ServerMessage::ReadyUpdate { ready: 1, total: 3 }, .. }]
        ));
        room.mark_ready("p1");
        assert_eq!(room.phase, Phase::Reveal);

        let directives = room.mark_ready("p2");
        assert_eq!(room.phase, Phase::Submission);
        let first = room.round.as_ref().unwrap().turn_order[0];
        assert!(matches!(
            &directives[..],
            [Directive::ToRoom {
                msg: ServerMessage::PhaseChange { phase: Phase::Submission, current_turn_index: Some(i), .. },
                ..
            }] if *i == first
        ));
    }

    #[test]
    fn test_out_of_turn_submission_ignored() {
        let mut room = started(3, GameOptions::default());
        let order = to_submission(&mut room);
        let wrong = room.players[order[1]].id.clone();

        assert!(room.submit_word(&wrong, "early").is_empty());
        let round = room.round.as_ref().unwrap();
        assert!(round.submitted_words.is_empty());
        assert_eq!(round.turn_pointer, 0);
    }

    #[test]
    fn test_submission_outside_phase_ignored() {
        let mut room = started(3, GameOptions::default());
        assert!(room.submit_word("p0", "word").is_empty());
        assert!(room.round.as_ref().unwrap().submitted_words.is_empty());
    }

    #[test]
    fn test_submission_trims_and_advances() {
        let mut room = started(3, GameOptions::default());
        let order = to_submission(&mut room);
        let first = room.players[order[0]].id.clone();

        let directives = room.submit_word(&first, "  banana  ");
        let round = room.round.as_ref().unwrap();
        assert_eq!(round.submitted_words[0].word, "banana");
        assert_eq!(round.submitted_words[0].player_index, order[0]);
        assert_eq!(round.turn_pointer, 1);
        assert!(matches!(
            &directives[..],
            [Directive::ToRoom { msg: ServerMessage::WordSubmitted { current_turn_index: Some(i), .. }, .. }]
                if *i == order[1]
        ));
    }

    #[test]
    fn test_long_word_is_cut_and_trimmed() {
        let mut room = started(3, GameOptions::default());
        let order = to_submission(&mut room);
        let first = room.players[order[0]].id.clone();
        let second = room.players[order[1]].id.clone();

        // The cut lands inside a run of spaces
        let padded = format!("{}       tail", "a".repeat(MAX_WORD_CHARS - 1));
        room.submit_word(&first, &padded);
        room.submit_word(&second, &"b".repeat(60));

        let round = room.round.as_ref().unwrap();
        assert_eq!(round.submitted_words[0].word, "a".repeat(MAX_WORD_CHARS - 1));
        assert_eq!(round.submitted_words[1].word, "b".repeat(MAX_WORD_CHARS));
    }

    #[test]
    fn test_empty_word_ignored() {
        let mut room = started(3, GameOptions::default());
        let order = to_submission(&mut room);
        let first = room.players[order[0]].id.clone();
        assert!(room.submit_word(&first, "   ").is_empty());
        assert_eq!(room.round.as_ref().unwrap().turn_pointer, 0);
    }

    #[test]
    fn test_proceed_to_voting_requires_host() {
        let mut room = started(3, GameOptions::default());
        submit_all(&mut room);
        assert_eq!(
            room.proceed_to_voting("p1"),
            Err(GameError::NotAuthorized("start the vote"))
        );
        assert_eq!(room.phase, Phase::Discussion);
    }

    #[test]
    fn test_proceed_to_voting_wrong_phase_ignored() {
        let mut room = started(3, GameOptions::default());
        assert_eq!(room.proceed_to_voting("p0"), Ok(Vec::new()));
        assert_eq!(room.phase, Phase::Reveal);
    }

    #[test]
    fn test_vote_progress_hides_votes() {
        let mut room = started(3, GameOptions::default());
        to_voting(&mut room);

        let directives = room.cast_vote("p0", 1);
        assert_eq!(
            directives,
            vec![Directive::ToRoom {
                code: room.code.clone(),
                msg: ServerMessage::VoteUpdate {
                    votes_received: 1,
                    total_players: 3
                }
            }]
        );
    }

    #[test]
    fn test_vote_for_unknown_player_ignored() {
        let mut room = started(3, GameOptions::default());
        to_voting(&mut room);
        assert!(room.cast_vote("p0", 7).is_empty());
        assert!(room.round.as_ref().unwrap().votes.is_empty());
    }

    #[test]
    fn test_full_round() {
        let mut room = started(3, GameOptions::default());
        to_voting(&mut room);

        room.cast_vote("p0", 0);
        room.cast_vote("p1", 0);
        let directives = room.cast_vote("p2", 1);

        assert_eq!(room.phase, Phase::Results);
        let results = room.round.as_ref().unwrap().results.clone().unwrap();
        assert_eq!(results.voted_out_index, Some(0));
        assert!(!results.tie);
        assert!(matches!(
            &directives[..],
            [Directive::ToRoom { msg: ServerMessage::GameResults { .. }, .. }]
        ));
    }

    #[test]
    fn test_all_skip_votes() {
        let mut room = started(3, GameOptions::default());
        to_voting(&mut room);
        for i in 0..3 {
            room.cast_vote(&id(i), -1);
        }
        let results = room.round.as_ref().unwrap().results.clone().unwrap();
        assert!(!results.tie);
        assert_eq!(results.voted_out_index, None);
        assert!(results.votes_tally.is_empty());
    }

    #[test]
    fn test_play_again_keeps_players() {
        let mut room = started(3, GameOptions::default());
        to_voting(&mut room);
        for i in 0..3 {
            room.cast_vote(&id(i), 0);
        }

        assert_eq!(
            room.play_again("p1"),
            Err(GameError::NotAuthorized("start a new game"))
        );
        let directives = room.play_again("p0").unwrap();
        assert_eq!(room.phase, Phase::Lobby);
        assert!(room.round.is_none());
        assert_eq!(room.players.len(), 3);
        assert!(room.players.iter().all(|p| !p.ready));
        assert!(matches!(
            &directives[..],
            [Directive::ToRoom { msg: ServerMessage::GameReset { .. }, .. }]
        ));

        // A new round can start right away
        assert!(room.start_game("p0", &GameOptions::default(), &mut rng()).is_ok());
    }

    #[test]
    fn test_host_leaves_promotes_next() {
        let mut room = room_with(2);
        let departure = room.remove_player("p0").unwrap();

        assert!(!departure.room_empty);
        assert_eq!(room.host_id, "p1");
        assert!(room.players[0].is_host);
        assert!(matches!(
            &departure.directives[..],
            [Directive::ToRoom { msg: ServerMessage::PlayerLeft { left_player_name, .. }, .. }]
                if left_player_name == "Player 0"
        ));
    }

    #[test]
    fn test_last_player_leaves() {
        let mut room = room_with(1);
        let departure = room.remove_player("p0").unwrap();
        assert!(departure.room_empty);
        assert!(room.is_empty());
        assert!(room.remove_player("p0").is_none());
    }

    #[test]
    fn test_impostor_leaving_aborts_round() {
        let mut room = started(4, GameOptions::default());
        let impostor = room.round.as_ref().unwrap().impostor_index;
        let impostor_id = room.players[impostor].id.clone();

        let departure = room.remove_player(&impostor_id).unwrap();
        assert_eq!(room.phase, Phase::Lobby);
        assert!(room.round.is_none());
        assert!(departure
            .directives
            .iter()
            .any(|d| matches!(d, Directive::ToRoom { msg: ServerMessage::RoundAborted { .. }, .. })));
    }

    #[test]
    fn test_too_few_players_aborts_round() {
        let mut room = started(3, GameOptions::default());
        let impostor = room.round.as_ref().unwrap().impostor_index;
        let crew = (0..3).find(|&i| i != impostor).unwrap();
        let crew_id = room.players[crew].id.clone();

        room.remove_player(&crew_id);
        assert_eq!(room.phase, Phase::Lobby);
        assert!(room.round.is_none());
    }

    #[test]
    fn test_leaver_during_reveal_can_complete_ready() {
        let mut room = started(4, GameOptions::default());
        let impostor = room.round.as_ref().unwrap().impostor_index;
        let impostor_id = room.players[impostor].id.clone();
        let leaver = (0..4).find(|&i| i != impostor).unwrap();
        let leaver_id = room.players[leaver].id.clone();

        let others: Vec<String> = room
            .players
            .iter()
            .filter(|p| p.id != leaver_id)
            .map(|p| p.id.clone())
            .collect();
        for player_id in &others {
            room.mark_ready(player_id);
        }
        assert_eq!(room.phase, Phase::Reveal);

        room.remove_player(&leaver_id);
        assert_eq!(room.phase, Phase::Submission);
        let round = room.round.as_ref().unwrap();
        assert_eq!(round.turn_order.len(), 3);
        assert!(round.impostor_index < 3);
        assert_eq!(room.players[round.impostor_index].id, impostor_id);
    }

    #[test]
    fn test_leaver_during_submission_keeps_turns_consistent() {
        let mut room = started(5, GameOptions::default());
        let impostor_id = {
            let round = room.round.as_ref().unwrap();
            room.players[round.impostor_index].id.clone()
        };
        let order = to_submission(&mut room);

        // First player in turn order submits
        let first_id = room.players[order[0]].id.clone();
        room.submit_word(&first_id, "one");

        // A non-impostor who already played leaves (or the next one if the first is the impostor)
        let leaver_id = if first_id != impostor_id {
            first_id.clone()
        } else {
            room.players[order[1]].id.clone()
        };
        room.remove_player(&leaver_id);

        let round = room.round.as_ref().unwrap();
        assert_eq!(room.phase, Phase::Submission);
        assert_eq!(round.turn_order.len(), 4);
        assert_eq!(round.turn_pointer, round.submitted_words.len());
        let mut sorted = round.turn_order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        assert_eq!(room.players[round.impostor_index].id, impostor_id);

        // The remaining players can finish the phase in order
        while room.phase == Phase::Submission {
            let next = turn::current_turn_player_index(room.round.as_ref().unwrap()).unwrap();
            let next_id = room.players[next].id.clone();
            room.submit_word(&next_id, "clue");
        }
        assert_eq!(room.phase, Phase::Discussion);
        assert_eq!(room.round.as_ref().unwrap().submitted_words.len(), 4);
    }

    #[test]
    fn test_last_pending_submitter_leaving_starts_discussion() {
        // Find a draw where a crew member plays last
        let mut room = (0..50)
            .map(|seed| {
                let mut room = room_with(5);
                room.start_game("p0", &GameOptions::default(), &mut StdRng::seed_from_u64(seed))
                    .unwrap();
                room
            })
            .find(|room| {
                let round = room.round.as_ref().unwrap();
                round.turn_order.last() != Some(&round.impostor_index)
            })
            .unwrap();
        let order = to_submission(&mut room);
        let last_id = room.players[order[4]].id.clone();

        for &index in &order[..4] {
            let player_id = room.players[index].id.clone();
            room.submit_word(&player_id, "clue");
        }
        assert_eq!(room.phase, Phase::Submission);

        let departure = room.remove_player(&last_id).unwrap();
        assert_eq!(room.phase, Phase::Discussion);
        let round = room.round.as_ref().unwrap();
        assert_eq!(round.submitted_words.len(), 4);
        assert!(round.submitted_words.iter().all(|w| w.player_index < 4));
        assert!(departure.directives.iter().any(|d| matches!(
            d,
            Directive::ToRoom {
                msg: ServerMessage::PhaseChange { phase: Phase::Discussion, .. },
                ..
            }
        )));
    }

    #[test]
    fn test_leaver_during_discussion_refreshes_words() {
        let mut room = started(5, GameOptions::default());
        let impostor = room.round.as_ref().unwrap().impostor_index;
        submit_all(&mut room);

        let leaver = (0..5).find(|&i| i != impostor).unwrap();
        let leaver_id = room.players[leaver].id.clone();
        let departure = room.remove_player(&leaver_id).unwrap();

        assert_eq!(room.phase, Phase::Discussion);
        let words = departure
            .directives
            .iter()
            .find_map(|d| match d {
                Directive::ToRoom {
                    msg:
                        ServerMessage::PhaseChange {
                            phase: Phase::Discussion,
                            submitted_words: Some(words),
                            ..
                        },
                    ..
                } => Some(words.clone()),
                _ => None,
            })
            .expect("discussion words resent");
        assert_eq!(words.len(), 4);
        assert!(words.iter().all(|w| w.player_index < 4));
        assert!(words.iter().all(|w| w.player_name != format!("Player {}", leaver)));
        assert_eq!(words, room.round.as_ref().unwrap().submitted_words);
    }

    #[test]
    fn test_leaver_during_voting_completes_vote() {
        let mut room = started(4, GameOptions::default());
        let impostor = room.round.as_ref().unwrap().impostor_index;
        to_voting(&mut room);

        let crew: Vec<usize> = (0..4).filter(|&i| i != impostor).collect();
        let leaver_id = room.players[crew[0]].id.clone();
        let impostor_id = room.players[impostor].id.clone();

        // Everyone except the leaver votes for the impostor
        for i in 0..4 {
            let player_id = room.players[i].id.clone();
            if player_id != leaver_id {
                room.cast_vote(&player_id, impostor as i64);
            }
        }
        assert_eq!(room.phase, Phase::Voting);

        room.remove_player(&leaver_id);
        assert_eq!(room.phase, Phase::Results);
        let results = room.round.as_ref().unwrap().results.clone().unwrap();
        assert!(results.impostor_caught);
        assert_eq!(room.players[results.impostor_index].id, impostor_id);
    }

    #[test]
    fn test_votes_naming_leaver_are_reset() {
        let mut room = started(5, GameOptions::default());
        let impostor = room.round.as_ref().unwrap().impostor_index;
        to_voting(&mut room);

        let crew: Vec<usize> = (0..5).filter(|&i| i != impostor).collect();
        let leaver = crew[0];
        let voter_id = room.players[crew[1]].id.clone();
        room.cast_vote(&voter_id, leaver as i64);

        let leaver_id = room.players[leaver].id.clone();
        room.remove_player(&leaver_id);

        assert_eq!(room.phase, Phase::Voting);
        assert!(room.round.as_ref().unwrap().votes.is_empty());
    }

    #[test]
    fn test_departing_jester_clears_role() {
        let options = GameOptions {
            jester_enabled: Some(true),
            ..Default::default()
        };
        let mut room = started(5, options);
        let jester = room.round.as_ref().unwrap().jester_index.unwrap();
        let jester_id = room.players[jester].id.clone();

        room.remove_player(&jester_id);
        let round = room.round.as_ref().unwrap();
        assert_eq!(room.phase, Phase::Reveal);
        assert_eq!(round.jester_index, None);
        assert!(!round.options.jester_enabled);
    }

    #[test]
    fn test_leaving_in_results_keeps_results() {
        let mut room = started(3, GameOptions::default());
        to_voting(&mut room);
        for i in 0..3 {
            room.cast_vote(&id(i), 0);
        }
        let before = room.round.as_ref().unwrap().results.clone();

        room.remove_player("p2");
        assert_eq!(room.phase, Phase::Results);
        assert_eq!(room.round.as_ref().unwrap().results, before);
    }
}
