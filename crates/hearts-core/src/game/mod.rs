pub mod deal;
pub mod match_state;
pub mod serialization;
pub mod state;
