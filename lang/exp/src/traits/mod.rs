mod alpha;
mod fragments;
mod free_vars;
mod has_type;
mod sub_exps;
mod subst;

pub use alpha::*;
pub use fragments::*;
pub use free_vars::*;
pub use has_type::*;
pub use subst::*;
