//! Stop callbacks for bounding synthesis runs.

use std::time::{Duration, Instant};

/// A stop callback that fires once `budget` has elapsed.
pub fn deadline(budget: Duration) -> impl Fn() -> bool {
    let end = Instant::now() + budget;
    move || Instant::now() >= end
}

/// A stop callback that never fires.
pub fn never() -> impl Fn() -> bool {
    || false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_fires_after_the_budget() {
        let stop = deadline(Duration::from_secs(0));
        assert!(stop());
        let stop = deadline(Duration::from_secs(3600));
        assert!(!stop());
    }
}
