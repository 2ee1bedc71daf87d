pub mod bolls;
pub mod book;
pub mod verse;

pub use bolls::*;
pub use book::*;
pub use verse::*;
