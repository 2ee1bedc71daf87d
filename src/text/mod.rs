pub mod markup;
pub mod mojibake;

pub use markup::*;
pub use mojibake::*;
