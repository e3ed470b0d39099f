mod exhaustive;
mod oracle;

pub use exhaustive::*;
pub use oracle::*;
