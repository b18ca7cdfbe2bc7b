pub mod counter_base;
pub mod exact_counter;
pub mod frequent_counter;
pub mod morris_counter;

pub use counter_base::Counter;
pub use exact_counter::ExactCounter;
pub use frequent_counter::FrequentCounter;
pub use morris_counter::MorrisCounter;
