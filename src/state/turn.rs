//! Turn ordering for the submission phase

use super::shift_index;
use crate::types::Round;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly random permutation of `0..player_count` (Fisher-Yates)
pub fn generate_turn_order<R: Rng + ?Sized>(player_count: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..player_count).collect();
    order.shuffle(rng);
    order
}

/// Index of the player whose turn it is, or `None` once everyone submitted
pub fn current_turn_player_index(round: &Round) -> Option<usize> {
    round.turn_order.get(round.turn_pointer).copied()
}

/// Drop `removed` from the turn order and renumber the rest.
///
/// If the removed player had already taken their turn the pointer moves back
/// by one, so it keeps pointing at the same next player.
pub(crate) fn remove_from_turn_order(round: &mut Round, removed: usize) {
    let Some(position) = round.turn_order.iter().position(|&i| i == removed) else {
        return;
    };

    round.turn_order.remove(position);
    for index in round.turn_order.iter_mut() {
        if let Some(shifted) = shift_index(*index, removed) {
            *index = shifted;
        }
    }

    if position < round.turn_pointer {
        round.turn_pointer -= 1;
    }
}
