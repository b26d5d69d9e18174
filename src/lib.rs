pub mod classifiers;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod logging;
pub mod neighbour_search;
pub mod streams;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
