pub mod aggregate;
pub mod emotion;
pub mod face;
pub mod sentiment;

pub use aggregate::*;
pub use emotion::*;
pub use face::*;
pub use sentiment::*;
