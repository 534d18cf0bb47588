pub mod category;
pub mod metadata;
pub mod report;

pub use category::*;
pub use metadata::*;
pub use report::*;
