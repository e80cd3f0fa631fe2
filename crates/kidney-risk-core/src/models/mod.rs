//! Domain models for kidney risk assessment.

mod assessment;
mod field;
mod flag;
mod observation;
mod report;

pub use assessment::*;
pub use field::*;
pub use flag::*;
pub use observation::*;
pub use report::*;
