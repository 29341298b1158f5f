pub mod config;
pub mod doctor;
pub mod launcher;
pub mod orchestrator;
pub mod process;

pub use config::*;
pub use doctor::*;
pub use launcher::*;
pub use orchestrator::*;
pub use process::*;
