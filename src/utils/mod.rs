pub mod files;
pub mod logging;
pub mod signal;

pub use signal::ChangeSignal;
