pub mod exp;
pub mod traits;
mod typ;
mod val;
mod var;

pub use exp::*;
pub use traits::*;
pub use typ::*;
pub use val::*;
pub use var::*;

pub type HashMap<K, V> = fxhash::FxHashMap<K, V>;
pub type HashSet<V> = fxhash::FxHashSet<V>;
