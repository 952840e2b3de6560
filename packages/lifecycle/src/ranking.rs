use crate::model::Participant;

/// How many participants are notified as winners.
pub const PRIZE_SLOTS: usize = 3;

/// Order participants by score, highest first.
///
/// `participants` must be in insertion order. The sort is stable, so equal
/// scores keep that order.
pub fn rank(mut participants: Vec<Participant>) -> Vec<Participant> {
    participants.sort_by(|a, b| b.score.cmp(&a.score));
    participants
}

/// The top [`PRIZE_SLOTS`] of the ranking, or fewer if there are fewer entrants.
pub fn winners(participants: Vec<Participant>) -> Vec<Participant> {
    let mut ranked = rank(participants);
    ranked.truncate(PRIZE_SLOTS);
    ranked
}
