pub mod json;
pub mod memory;
pub mod traits;

pub use json::*;
pub use memory::*;
pub use traits::*;
