mod catalog;
mod film;

pub use catalog::*;
pub use film::*;
