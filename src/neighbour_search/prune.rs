use crate::neighbour_search::Neighbour;

/// Keeps the `k` nearest neighbours of an ordered list, plus any further
/// neighbours tied with the k-th distance. `k < 1` keeps one.
pub fn prune_to_k(mut neighbours: Vec<Neighbour>, k: usize) -> Vec<Neighbour> {
    if neighbours.is_empty() {
        return neighbours;
    }
    let k = k.max(1);

    let mut keep = neighbours.len();
    for i in k..neighbours.len() {
        if neighbours[i].distance != neighbours[i - 1].distance {
            keep = i;
            break;
        }
    }
    neighbours.truncate(keep);
    neighbours
}
