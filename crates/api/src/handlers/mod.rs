pub mod cards;
pub mod quiz;
pub mod vocab;
