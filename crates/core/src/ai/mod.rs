//! Decision policies for both sides of the encounter.

pub mod boss;
pub mod party;
