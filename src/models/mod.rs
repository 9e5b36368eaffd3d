pub mod aggregate;
pub mod gap;
pub mod record;
pub mod report;
pub mod summary;
pub mod trend;

pub use aggregate::*;
pub use gap::*;
pub use record::*;
pub use report::*;
pub use summary::*;
pub use trend::*;
