use super::shift_index;
use crate::types::*;
use std::collections::BTreeMap;

/// Record a vote; a player voting again replaces their earlier vote
pub fn cast_vote(round: &mut Round, voter_index: usize, suspect: Option<usize>) {
    round.votes.insert(voter_index, suspect);
}

pub fn all_votes_in(round: &Round, player_count: usize) -> bool {
    round.votes.len() >= player_count
}

/// Count votes per suspect and find who, if anyone, is voted out.
///
/// Skip votes are excluded. A shared top count is a tie and nobody is
/// voted out. Counts come from a map keyed by suspect index, so the result
/// does not depend on the order votes were cast in.
pub fn tally(votes: &BTreeMap<usize, Option<usize>>) -> VoteTally {
    let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
    for suspect in votes.values().flatten() {
        *counts.entry(*suspect).or_insert(0) += 1;
    }

    let mut max_votes = 0;
    let mut winner = None;
    let mut tie = false;

    for (&suspect, &count) in &counts {
        if count > max_votes {
            max_votes = count;
            winner = Some(suspect);
            tie = false;
        } else if count == max_votes {
            tie = true;
        }
    }

    VoteTally {
        counts,
        max_votes,
        voted_out_index: if tie { None } else { winner },
        tie,
    }
}

/// Combine the tally with the round's roles into the final results
pub fn compute_results(round: &Round, players: &[Player]) -> GameResults {
    let tally = tally(&round.votes);
    let name_of = |index: usize| players.get(index).map(|p| p.name.clone());

    let voted_out = tally.voted_out_index;
    let impostor_caught = voted_out == Some(round.impostor_index);
    let jester_wins = round.jester_index.is_some() && voted_out == round.jester_index;

    GameResults {
        impostor_index: round.impostor_index,
        impostor_name: name_of(round.impostor_index).unwrap_or_default(),
        jester_enabled: round.options.jester_enabled,
        jester_index: round.jester_index,
        jester_name: round.jester_index.and_then(name_of),
        jester_wins,
        secret_word: round.word.clone(),
        topic: round.topic.clone(),
        voted_out_index: voted_out,
        voted_out_name: voted_out.and_then(name_of),
        impostor_caught,
        tie: tally.tie,
        votes_tally: tally.counts,
    }
}

/// Forget everything `removed` had to do with the vote.
///
/// Their own vote is dropped, and so is every vote that named them (those
/// voters have to vote again). Remaining indices are renumbered.
pub(crate) fn remove_from_votes(round: &mut Round, removed: usize) {
    let votes = std::mem::take(&mut round.votes);
    round.votes = votes
        .into_iter()
        .filter(|(voter, suspect)| *voter != removed && *suspect != Some(removed))
        .filter_map(|(voter, suspect)| {
            let voter = shift_index(voter, removed)?;
            let suspect = suspect.and_then(|s| shift_index(s, removed));
            Some((voter, suspect))
        })
        .collect();
}
