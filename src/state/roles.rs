//! Secret word selection and role assignment

use super::words::WORD_TABLE;
use crate::types::*;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Everything drawn at game start, before the turn order is attached
#[derive(Debug, Clone)]
pub struct RoundSetup {
    pub topic: String,
    pub word: String,
    pub hints: Vec<String>,
    pub impostor_hint: Option<String>,
    pub impostor_index: usize,
    pub jester_index: Option<usize>,
    pub options: RoundOptions,
}

impl RoundSetup {
    pub fn into_round(self, turn_order: Vec<usize>) -> Round {
        Round {
            topic: self.topic,
            word: self.word,
            hints: self.hints,
            impostor_hint: self.impostor_hint,
            impostor_index: self.impostor_index,
            jester_index: self.jester_index,
            options: self.options,
            turn_order,
            turn_pointer: 0,
            submitted_words: Vec::new(),
            votes: BTreeMap::new(),
            results: None,
        }
    }
}

/// Draw the word, the impostor and (if enabled) the jester from the built-in table
pub fn select_round<R: Rng + ?Sized>(
    player_count: usize,
    options: &GameOptions,
    rng: &mut R,
) -> RoundSetup {
    select_round_from(WORD_TABLE, player_count, options, rng)
}

/// Same as [`select_round`] with an explicit word table.
///
/// `table` must be non-empty and `player_count` at least 1.
pub fn select_round_from<R: Rng + ?Sized>(
    table: &[WordEntry],
    player_count: usize,
    options: &GameOptions,
    rng: &mut R,
) -> RoundSetup {
    let entry = table.choose(rng).copied().unwrap_or(WORD_TABLE[0]);
    let options = options.normalize(player_count);

    let impostor_index = rng.random_range(0..player_count);

    let jester_index = if options.jester_enabled {
        loop {
            let candidate = rng.random_range(0..player_count);
            if candidate != impostor_index {
                break Some(candidate);
            }
        }
    } else {
        None
    };

    let impostor_hint = if options.impostor_hint {
        entry.hints.choose(rng).map(|h| h.to_string())
    } else {
        None
    };

    RoundSetup {
        topic: entry.topic.to_string(),
        word: entry.word.to_string(),
        hints: entry.hints.iter().map(|h| h.to_string()).collect(),
        impostor_hint,
        impostor_index,
        jester_index,
        options,
    }
}

pub fn role_of(player_index: usize, round: &Round) -> PlayerRole {
    if player_index == round.impostor_index {
        PlayerRole::Impostor
    } else if round.jester_index == Some(player_index) {
        PlayerRole::Jester
    } else {
        PlayerRole::Crew
    }
}

/// What `player_index` is allowed to know about the round.
///
/// The impostor never sees the word; everyone else never sees the hint.
pub fn reveal_for(player_index: usize, round: &Round) -> RevealPayload {
    let role = role_of(player_index, round);
    let is_impostor = role == PlayerRole::Impostor;

    let topic = if is_impostor || !round.options.no_topic_reveal {
        Some(round.topic.clone())
    } else {
        None
    };

    let (word, hint) = if is_impostor {
        let hint = if round.options.impostor_hint {
            round.impostor_hint.clone()
        } else {
            None
        };
        (None, hint)
    } else {
        (Some(round.word.clone()), None)
    };

    RevealPayload {
        role,
        is_impostor,
        is_jester: role == PlayerRole::Jester,
        topic,
        word,
        hint,
        no_topic_reveal: round.options.no_topic_reveal,
        impostor_hint: round.options.impostor_hint,
    }
}
