pub mod classifier;
pub mod lazy;
pub mod rules;

pub use classifier::Classifier;
pub use lazy::Civd;
pub use rules::ZeroR;
