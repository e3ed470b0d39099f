use std::collections::BTreeMap;

use indexmap::IndexMap;
use rand::RngCore;
use rand::seq::SliceRandom;

use exp::{Exp, HasType, Type, TypeTag};

/// A type constraint accepted by `Cache::find`: either just the outer
/// constructor ("any bag, whatever the element type") or an exact type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    Tag(TypeTag),
    Exact(Type),
}

impl From<TypeTag> for TypeHint {
    fn from(tag: TypeTag) -> TypeHint {
        TypeHint::Tag(tag)
    }
}

impl From<Type> for TypeHint {
    fn from(typ: Type) -> TypeHint {
        TypeHint::Exact(typ)
    }
}

/// Indexed storage of enumerated expressions.
///
/// Entries are indexed three-deep, by outer type constructor, exact type
/// and size; the leaves keep insertion order so that iteration, and with
/// it the whole search, is deterministic. The tag level exists because
/// builders very frequently ask for "any bag expression of size k"
/// without caring about the element type.
#[derive(Default)]
pub struct Cache {
    data: IndexMap<TypeTag, IndexMap<Type, BTreeMap<usize, Vec<Exp>>>>,
    len: usize,
}

impl Cache {
    pub fn new() -> Cache {
        Cache::default()
    }

    pub fn add(&mut self, e: Exp, size: usize) {
        let typ = e.typ();
        self.data
            .entry(typ.tag())
            .or_default()
            .entry(typ)
            .or_default()
            .entry(size)
            .or_default()
            .push(e);
        self.len += 1;
    }

    /// Remove one occurrence of `e` at `size`; absent entries are a
    /// silent no-op.
    pub fn evict(&mut self, e: &Exp, size: usize) {
        let typ = e.typ();
        let entries = self
            .data
            .get_mut(&typ.tag())
            .and_then(|by_type| by_type.get_mut(&typ))
            .and_then(|by_size| by_size.get_mut(&size));
        if let Some(entries) = entries {
            if let Some(pos) = entries.iter().position(|x| x == e) {
                entries.remove(pos);
                self.len -= 1;
            }
        }
    }

    /// All entries matching the hints, in index-traversal order
    /// (tag, then exact type, then size, then insertion).
    pub fn find(&self, hint: Option<TypeHint>, size: Option<usize>) -> Vec<&Exp> {
        let (tag_filter, exact) = match &hint {
            None => (None, None),
            Some(TypeHint::Tag(tag)) => (Some(*tag), None),
            Some(TypeHint::Exact(typ)) => (Some(typ.tag()), Some(typ)),
        };
        let mut out = Vec::new();
        for (tag, by_type) in &self.data {
            if tag_filter.is_some_and(|f| f != *tag) {
                continue;
            }
            for (typ, by_size) in by_type {
                if exact.is_some_and(|t| t != typ) {
                    continue;
                }
                for (sz, entries) in by_size {
                    if size.is_some_and(|s| s != *sz) {
                        continue;
                    }
                    out.extend(entries.iter());
                }
            }
        }
        out
    }

    /// Every exact type currently represented.
    pub fn types(&self) -> Vec<&Type> {
        self.data.values().flat_map(|by_type| by_type.keys()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Exp, usize)> {
        self.data.values().flat_map(|by_type| {
            by_type.values().flat_map(|by_size| {
                by_size.iter().flat_map(|(size, entries)| entries.iter().map(|e| (e, *size)))
            })
        })
    }

    /// Uniform sample of up to `n` entries, for diagnostics.
    pub fn random_sample(&self, n: usize, rng: &mut dyn RngCore) -> Vec<&Exp> {
        let all: Vec<&Exp> = self.iter().map(|(e, _)| e).collect();
        all.choose_multiple(rng, n.min(all.len())).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp::exp::build::*;
    use exp::Var;

    fn int_var(id: &str) -> Exp {
        var(&Var::new(id, Type::Int))
    }

    fn bag_var(id: &str, elem: Type) -> Exp {
        var(&Var::new(id, Type::bag(elem)))
    }

    #[test]
    fn find_by_tag_ignores_the_element_type() {
        let mut cache = Cache::new();
        cache.add(bag_var("xs", Type::Int), 1);
        cache.add(bag_var("ys", Type::Bool), 1);
        cache.add(int_var("x"), 1);

        let bags = cache.find(Some(TypeTag::Bag.into()), None);
        assert_eq!(bags.len(), 2);
        let exact = cache.find(Some(Type::bag(Type::Int).into()), None);
        assert_eq!(exact.len(), 1);
    }

    #[test]
    fn find_by_size_is_insertion_ordered() {
        let mut cache = Cache::new();
        cache.add(int_var("a"), 1);
        cache.add(int_var("b"), 1);
        cache.add(int_var("c"), 2);

        let found = cache.find(Some(Type::Int.into()), Some(1));
        assert_eq!(found, vec![&int_var("a"), &int_var("b")]);
    }

    #[test]
    fn evict_is_a_noop_when_absent() {
        let mut cache = Cache::new();
        cache.add(int_var("a"), 1);
        cache.evict(&int_var("zzz"), 1);
        cache.evict(&int_var("a"), 3);
        assert_eq!(cache.len(), 1);
        cache.evict(&int_var("a"), 1);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn iter_yields_every_entry_with_its_size() {
        let mut cache = Cache::new();
        cache.add(int_var("a"), 1);
        cache.add(int_var("b"), 2);
        let mut entries: Vec<(Exp, usize)> =
            cache.iter().map(|(e, s)| (e.clone(), s)).collect();
        entries.sort_by_key(|(_, s)| *s);
        assert_eq!(entries, vec![(int_var("a"), 1), (int_var("b"), 2)]);
    }

    #[test]
    fn types_reports_distinct_types() {
        let mut cache = Cache::new();
        cache.add(int_var("a"), 1);
        cache.add(int_var("b"), 1);
        cache.add(bag_var("xs", Type::Int), 1);
        assert_eq!(cache.types().len(), 2);
    }
}
