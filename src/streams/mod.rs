pub mod arff;
pub mod stream;

pub use arff::ArffFileStream;
pub use stream::Stream;
