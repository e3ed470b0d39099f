mod env;
mod eval;
mod fingerprint;
mod instantiate;
mod result;

pub use env::*;
pub use eval::*;
pub use fingerprint::*;
pub use instantiate::*;
pub use result::*;
