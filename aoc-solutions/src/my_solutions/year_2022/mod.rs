pub mod day_12;
pub mod day_16;
pub mod day_18;
pub mod day_19;
pub mod day_24;
