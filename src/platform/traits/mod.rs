//! Platform collaborator traits

pub mod indicator;
pub mod system;

pub use indicator::Indicator;
pub use system::SystemControl;
