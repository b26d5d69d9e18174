//! Gravity-weighted voting over an ordered neighbour list.
//!
//! Each neighbour pulls towards its class with `weight / distance²`. Votes are
//! averaged per class and the strongest class takes the whole distribution.

use crate::core::instances::Instance;
use crate::neighbour_search::Neighbour;

/// Smallest positive `f64`. Only guards the division for neighbours sitting
/// exactly on the query.
const ZERO_DISTANCE_GUARD: f64 = f64::from_bits(1);

/// Mean gravity vote of every class, or `None` for classes no neighbour
/// belongs to.
///
/// Every class starts from a baseline of `1 / max(1, num_training)` before
/// the neighbour pulls are added.
pub fn class_scores(
    neighbours: &[Neighbour],
    num_classes: usize,
    num_training: usize,
) -> Vec<Option<f64>> {
    let baseline = 1.0 / num_training.max(1) as f64;
    let mut votes = vec![baseline; num_classes];
    let mut members = vec![0usize; num_classes];

    for n in neighbours {
        let Some(class) = n.instance.class_value() else {
            continue;
        };
        let class = class as usize;
        if class >= num_classes {
            continue;
        }
        let squared = n.distance * n.distance;
        votes[class] += n.instance.weight() / (squared + ZERO_DISTANCE_GUARD);
        members[class] += 1;
    }

    votes
        .into_iter()
        .zip(members)
        .map(|(vote, count)| (count > 0).then(|| vote / count as f64))
        .collect()
}

/// One-hot vector for the class with the highest score.
///
/// A class only takes over with a score strictly above the current best
/// (which starts at 0), so the lowest index wins ties. Classes without a
/// score never win. The result is all zeros if nothing scores above 0.
pub fn winner_take_all(scores: &[Option<f64>]) -> Vec<f64> {
    let mut winner: Option<usize> = None;
    let mut best = 0.0;
    for (i, score) in scores.iter().enumerate() {
        if let Some(s) = *score
            && s > best
        {
            best = s;
            winner = Some(i);
        }
    }

    let mut distribution = vec![0.0; scores.len()];
    if let Some(i) = winner {
        distribution[i] = 1.0;
    }
    distribution
}

/// Class distribution for a query given its neighbours in distance order.
pub fn gravity_vote(neighbours: &[Neighbour], num_classes: usize, num_training: usize) -> Vec<f64> {
    winner_take_all(&class_scores(neighbours, num_classes, num_training))
}
