pub mod directive;
pub mod model;
pub mod naming;
pub mod rewrite;
pub mod transcript;

pub use directive::*;
pub use model::*;
pub use naming::*;
pub use rewrite::*;
pub use transcript::*;
