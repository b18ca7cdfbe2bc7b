pub mod cast;
pub mod counters;
pub mod error;
pub mod experiment;
pub mod source;
pub mod synthetic;

pub use counters::Counter;
pub use counters::ExactCounter;
pub use counters::FrequentCounter;
pub use counters::MorrisCounter;
pub use error::{Error, Result};
pub use source::ItemSource;
