pub mod compose;
pub mod fetch;
pub mod normalize;

pub use compose::*;
pub use fetch::*;
pub use normalize::*;
