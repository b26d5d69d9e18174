mod oracle_classifier;
mod scripted_neighbour_search;
mod vec_stream;

pub use oracle_classifier::OracleClassifier;
pub use scripted_neighbour_search::ScriptedNeighbourSearch;
pub use vec_stream::VecStream;
