mod recording_neighbour_search;
mod train_spy_classifier;

pub use recording_neighbour_search::{RecordingNeighbourSearch, SearchCalls};
pub use train_spy_classifier::{TrainSpyClassifier, TrainSpyHandle};
