pub mod audit;
pub mod input;
pub mod output;
pub mod xref;

pub use audit::*;
pub use input::*;
pub use output::*;
pub use xref::*;
