pub mod resolve;
pub mod states;
