pub mod classifier;
pub mod clock;
pub mod hints;
pub mod inventory;
pub mod quiz;
pub mod score;
