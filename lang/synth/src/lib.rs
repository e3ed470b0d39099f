mod adapt;
mod build;
mod cache;
mod classes;
mod config;
mod cost;
mod hints;
mod improve;
mod learner;
mod result;
pub mod stop;

pub use adapt::*;
pub use build::*;
pub use cache::*;
pub use classes::*;
pub use config::*;
pub use cost::*;
pub use hints::*;
pub use improve::*;
pub use learner::*;
pub use result::*;
