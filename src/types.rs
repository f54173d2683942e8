use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::GameError;

/// Opaque per-connection identifier (a ULID string)
pub type PlayerId = String;

/// Minimum number of players needed to start a round
pub const MIN_PLAYERS: usize = 3;
/// Maximum number of players a room accepts
pub const MAX_PLAYERS: usize = 8;
/// The jester role needs at least this many players
pub const MIN_JESTER_PLAYERS: usize = 4;
/// Display names are cut to this many characters
pub const MAX_NAME_CHARS: usize = 20;
/// Clue words are cut to this many characters
pub const MAX_WORD_CHARS: usize = 40;

/// Unambiguous character set for room codes (no 0/O, 1/I)
pub const ROOM_CODE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LEN: usize = 4;

/// A validated, uppercase room code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Parse user input into a room code.
    ///
    /// Input is trimmed and uppercased first, so `" ab3d "` is accepted as `AB3D`.
    pub fn parse(input: &str) -> Result<Self, GameError> {
        let code = input.trim().to_ascii_uppercase();
        let valid = code.len() == ROOM_CODE_LEN
            && code.bytes().all(|b| ROOM_CODE_CHARS.contains(&b));
        if valid {
            Ok(Self(code))
        } else {
            Err(GameError::InvalidRoomCode(input.trim().to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a code from characters already drawn from `ROOM_CODE_CHARS`
    pub(crate) fn from_generated(code: String) -> Self {
        debug_assert_eq!(code.len(), ROOM_CODE_LEN);
        Self(code)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Lobby,
    Reveal,
    Submission,
    Discussion,
    Voting,
    Results,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    pub is_host: bool,
    pub ready: bool,
}

/// Options the host may pass when starting a game. Unset fields take defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameOptions {
    pub jester_enabled: Option<bool>,
    pub no_topic_reveal: Option<bool>,
    pub impostor_hint: Option<bool>,
}

/// Options in effect for one round, after defaults and player-count rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundOptions {
    pub jester_enabled: bool,
    pub no_topic_reveal: bool,
    pub impostor_hint: bool,
}

impl GameOptions {
    /// Apply defaults (jester off, topic shown, hint on) and disable the
    /// jester when there are too few players for it.
    pub fn normalize(&self, player_count: usize) -> RoundOptions {
        RoundOptions {
            jester_enabled: self.jester_enabled.unwrap_or(false)
                && player_count >= MIN_JESTER_PLAYERS,
            no_topic_reveal: self.no_topic_reveal.unwrap_or(false),
            impostor_hint: self.impostor_hint.unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmittedWord {
    pub player_index: usize,
    pub player_name: String,
    pub word: String,
}

/// The secret state of one game, owned by its room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub topic: String,
    pub word: String,
    pub hints: Vec<String>,
    /// Hint shown to the impostor; drawn once when the round starts
    pub impostor_hint: Option<String>,
    pub impostor_index: usize,
    pub jester_index: Option<usize>,
    pub options: RoundOptions,
    /// Permutation of player indices governing the submission phase
    pub turn_order: Vec<usize>,
    /// Offset into `turn_order`; always equal to `submitted_words.len()`
    pub turn_pointer: usize,
    pub submitted_words: Vec<SubmittedWord>,
    /// voter index -> suspect index (`None` is a skip vote)
    pub votes: BTreeMap<usize, Option<usize>>,
    pub results: Option<GameResults>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Impostor,
    Jester,
    Crew,
}

/// What a single player gets to see about the round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevealPayload {
    pub role: PlayerRole,
    pub is_impostor: bool,
    pub is_jester: bool,
    pub topic: Option<String>,
    pub word: Option<String>,
    pub hint: Option<String>,
    pub no_topic_reveal: bool,
    pub impostor_hint: bool,
}

/// Raw outcome of counting votes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTally {
    /// suspect index -> number of votes, skip votes excluded
    pub counts: BTreeMap<usize, u32>,
    pub max_votes: u32,
    /// `None` when nobody got votes or the top count is shared
    pub voted_out_index: Option<usize>,
    pub tie: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameResults {
    pub impostor_index: usize,
    pub impostor_name: String,
    pub jester_enabled: bool,
    pub jester_index: Option<usize>,
    pub jester_name: Option<String>,
    pub jester_wins: bool,
    pub secret_word: String,
    pub topic: String,
    pub voted_out_index: Option<usize>,
    pub voted_out_name: Option<String>,
    pub impostor_caught: bool,
    pub tie: bool,
    pub votes_tally: BTreeMap<usize, u32>,
}

/// One row of the built-in word table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordEntry {
    pub topic: &'static str,
    pub word: &'static str,
    pub hints: &'static [&'static str],
}
