mod civd;
pub mod gravity_vote;
mod training_window;

pub use civd::Civd;
pub use training_window::{Appended, TrainingWindow};
