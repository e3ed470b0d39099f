pub use pretty::DocAllocator;

pub mod tokens;
mod types;

pub use types::*;

pub const DEFAULT_WIDTH: usize = 100;
