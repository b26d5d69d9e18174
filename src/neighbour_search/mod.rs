mod euclidean_distance;
mod linear_nn_search;
mod nearest_neighbour_search;
mod prune;

pub use euclidean_distance::EuclideanDistance;
pub use linear_nn_search::LinearNNSearch;
pub use nearest_neighbour_search::{NearestNeighbourSearch, Neighbour};
pub use prune::prune_to_k;
