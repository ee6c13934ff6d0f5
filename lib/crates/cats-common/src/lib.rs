pub mod platform;
pub mod report;

pub use platform::*;
pub use report::*;
