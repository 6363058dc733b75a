pub mod busy;
pub mod clock;
pub mod error;
pub mod filter;
pub mod freetime;
pub mod planner;
pub mod range;
pub mod reducer;
pub mod template;
pub mod workday;
