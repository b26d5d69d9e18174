//! Test doubles for classifiers, neighbour searches and streams.

mod dummies;
mod spies;
mod stubs;

pub use dummies::ClassifierNoneVotes;
pub use spies::{RecordingNeighbourSearch, SearchCalls, TrainSpyClassifier, TrainSpyHandle};
pub use stubs::{OracleClassifier, ScriptedNeighbourSearch, VecStream};
