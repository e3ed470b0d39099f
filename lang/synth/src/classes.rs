use eval::Fingerprint;
use exp::{Exp, HashMap};

use crate::cache::Cache;
use crate::cost::Cost;

/// One equivalence class of the seen table: the best cost observed for
/// the fingerprint and the expressions realizing it.
pub struct SeenClass {
    pub cost: Cost,
    pub members: Vec<(Exp, usize)>,
}

/// The cache and the seen table index the same entries by different keys
/// (type/size versus fingerprint). This wrapper owns both and co-updates
/// them so the coherence invariant cannot be violated from outside:
/// every seen member is cached at its recorded size, and every cached
/// entry belongs to a seen class.
#[derive(Default)]
pub struct Classes {
    cache: Cache,
    seen: HashMap<Fingerprint, SeenClass>,
}

impl Classes {
    pub fn new() -> Classes {
        Classes::default()
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn lookup(&self, fp: &Fingerprint) -> Option<&SeenClass> {
        self.seen.get(fp)
    }

    /// Open a new equivalence class.
    pub fn insert_new(&mut self, fp: Fingerprint, e: Exp, size: usize, cost: Cost) {
        self.cache.add(e.clone(), size);
        self.seen.insert(fp, SeenClass { cost, members: vec![(e, size)] });
    }

    /// Add an equal-cost member to an existing class.
    pub fn append_equivalent(&mut self, fp: &Fingerprint, e: Exp, size: usize) {
        if let Some(class) = self.seen.get_mut(fp) {
            self.cache.add(e.clone(), size);
            class.members.push((e, size));
        }
    }

    /// Replace the class with the strictly cheaper `e`, evicting every
    /// prior member from the cache. The evicted members are returned so
    /// the learner can apply transitive eviction.
    pub fn replace_better(
        &mut self,
        fp: Fingerprint,
        e: Exp,
        size: usize,
        cost: Cost,
    ) -> Vec<(Exp, usize)> {
        self.cache.add(e.clone(), size);
        let prev = self.seen.insert(fp, SeenClass { cost, members: vec![(e, size)] });
        let members = prev.map(|class| class.members).unwrap_or_default();
        for (evicted, evicted_size) in &members {
            self.cache.evict(evicted, *evicted_size);
        }
        members
    }

    /// Evict every cached expression that structurally contains
    /// `evicted`, removing it from its seen class as well (the class is
    /// dropped when it empties). Returns the number of evictions.
    pub fn evict_containing(
        &mut self,
        evicted: &Exp,
        fingerprint_of: impl Fn(&Exp) -> Option<Fingerprint>,
    ) -> usize {
        let victims: Vec<(Exp, usize)> = self
            .cache
            .iter()
            .filter(|(e, _)| e.contains(evicted))
            .map(|(e, size)| (e.clone(), size))
            .collect();
        for (victim, size) in &victims {
            self.cache.evict(victim, *size);
            if let Some(fp) = fingerprint_of(victim) {
                if let Some(class) = self.seen.get_mut(&fp) {
                    class.members.retain(|(m, s)| !(m == victim && s == size));
                    if class.members.is_empty() {
                        self.seen.remove(&fp);
                    }
                }
            }
        }
        victims.len()
    }

    /// Drop every class whose cost exceeds `ceiling`, evicting its
    /// members. Returns the number of evicted expressions.
    pub fn purge_above(&mut self, ceiling: Cost) -> usize {
        let doomed: Vec<Fingerprint> = self
            .seen
            .iter()
            .filter(|(_, class)| class.cost > ceiling)
            .map(|(fp, _)| fp.clone())
            .collect();
        let mut evicted = 0;
        for fp in doomed {
            if let Some(class) = self.seen.remove(&fp) {
                for (e, size) in &class.members {
                    self.cache.evict(e, *size);
                }
                evicted += class.members.len();
            }
        }
        evicted
    }

    /// The seen/cache coherence invariant; exercised by tests.
    pub fn is_coherent(&self, fingerprint_of: impl Fn(&Exp) -> Option<Fingerprint>) -> bool {
        let mut seen_entries = 0;
        for class in self.seen.values() {
            for (e, size) in &class.members {
                seen_entries += 1;
                let cached = self.cache.find(None, Some(*size));
                if !cached.iter().any(|x| *x == e) {
                    return false;
                }
            }
        }
        if seen_entries != self.cache.len() {
            return false;
        }
        self.cache.iter().all(|(e, size)| {
            fingerprint_of(e)
                .and_then(|fp| self.seen.get(&fp))
                .is_some_and(|class| class.members.iter().any(|(m, s)| m == e && *s == size))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eval::{Env, fingerprint};
    use exp::exp::build::*;
    use exp::{Type, Var};
    use ordered_float::OrderedFloat;

    fn examples() -> Vec<Env> {
        let mut ex = Env::new();
        ex.bind("x", exp::Value::Int(1));
        vec![ex]
    }

    fn fp_of(examples: &[Env]) -> impl Fn(&Exp) -> Option<Fingerprint> + '_ {
        move |e| fingerprint(e, examples).ok()
    }

    #[test]
    fn better_eviction_keeps_coherence() {
        let mut classes = Classes::new();
        let x = Var::new("x", Type::Int);
        let examples = examples();

        // x and x + 0 share a fingerprint; the cheaper one wins.
        let cheap = var(&x);
        let dear = add(var(&x), num(0));
        let shared = fingerprint(&cheap, &examples).unwrap();
        assert_eq!(shared, fingerprint(&dear, &examples).unwrap());

        classes.insert_new(shared.clone(), dear.clone(), 3, OrderedFloat(3.0));
        let evicted = classes.replace_better(shared.clone(), cheap.clone(), 1, OrderedFloat(1.0));
        assert_eq!(evicted, vec![(dear.clone(), 3)]);
        assert_eq!(classes.len(), 1);
        assert!(classes.is_coherent(fp_of(&examples)));
    }

    #[test]
    fn evict_containing_prunes_super_expressions_and_their_classes() {
        let mut classes = Classes::new();
        let x = Var::new("x", Type::Int);
        let examples = examples();
        let fp = fp_of(&examples);

        let sub = num(1);
        let sup = add(var(&x), num(1));
        classes.insert_new(fp(&sub).unwrap(), sub.clone(), 1, OrderedFloat(1.0));
        classes.insert_new(fp(&sup).unwrap(), sup.clone(), 3, OrderedFloat(3.0));

        let n = classes.evict_containing(&num(1), fp_of(&examples));
        // both the bare literal and the sum contain num(1)
        assert_eq!(n, 2);
        assert_eq!(classes.len(), 0);
        assert!(classes.is_coherent(fp_of(&examples)));
    }

    #[test]
    fn purge_above_drops_expensive_classes() {
        let mut classes = Classes::new();
        let x = Var::new("x", Type::Int);
        let examples = examples();
        let fp = fp_of(&examples);

        classes.insert_new(fp(&var(&x)).unwrap(), var(&x), 1, OrderedFloat(1.0));
        classes.insert_new(fp(&num(5)).unwrap(), num(5), 1, OrderedFloat(9.0));

        assert_eq!(classes.purge_above(OrderedFloat(2.0)), 1);
        assert_eq!(classes.len(), 1);
        assert!(classes.is_coherent(fp_of(&examples)));
    }
}
