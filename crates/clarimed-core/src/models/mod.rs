//! Domain models for the ClariMed core.

mod candidate;
mod concept;
mod interaction;
mod medication;

pub use candidate::*;
pub use concept::*;
pub use interaction::*;
pub use medication::*;
