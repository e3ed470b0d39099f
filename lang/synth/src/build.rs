use exp::exp::build;
use exp::{BinaryOp, Exp, HasType, Type, TypeTag, UnaryOp, Var};

use crate::cache::{Cache, TypeHint};

/// A proposer of candidate expressions.
///
/// `build` yields candidates of exactly `size`, typically by composing
/// smaller expressions drawn from the cache. Builders must be
/// deterministic; the emission order of the whole search depends on it.
pub trait Build {
    fn build<'c>(&'c self, cache: &'c Cache, size: usize) -> Box<dyn Iterator<Item = Exp> + 'c>;
}

/// Splits `total` into `parts` positive summands, lexicographically.
pub fn pick_to_sum(parts: usize, total: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    split(parts, total, &mut prefix, &mut out);
    out
}

fn split(parts: usize, total: usize, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    if parts == 0 {
        if total == 0 {
            out.push(prefix.clone());
        }
        return;
    }
    if parts == 1 {
        if total >= 1 {
            prefix.push(total);
            out.push(prefix.clone());
            prefix.pop();
        }
        return;
    }
    for first in 1..=total.saturating_sub(parts - 1) {
        prefix.push(first);
        split(parts - 1, total - first, prefix, out);
        prefix.pop();
    }
}

/// Which operator families a `SyntaxBuilder` proposes.
pub struct SyntaxOps {
    pub unops: Vec<UnaryOp>,
    pub binops: Vec<BinaryOp>,
    pub filters: bool,
    pub flat_maps: bool,
    pub make_maps: bool,
}

impl Default for SyntaxOps {
    fn default() -> Self {
        SyntaxOps {
            unops: vec![UnaryOp::Not, UnaryOp::Len],
            binops: vec![BinaryOp::Eq, BinaryOp::And, BinaryOp::Or, BinaryOp::Add, BinaryOp::Gt],
            filters: true,
            flat_maps: false,
            make_maps: false,
        }
    }
}

/// The stock bottom-up builder: variables and literals at size one,
/// then operators, filters and map constructions composed from cached
/// subexpressions of smaller sizes.
pub struct SyntaxBuilder {
    pub vars: Vec<Var>,
    pub binders: Vec<Var>,
    pub literals: Vec<Exp>,
    pub ops: SyntaxOps,
}

impl SyntaxBuilder {
    pub fn new(vars: Vec<Var>, binders: Vec<Var>) -> SyntaxBuilder {
        SyntaxBuilder {
            vars,
            binders,
            literals: vec![
                build::bool_lit(true),
                build::bool_lit(false),
                build::num(0),
                build::num(1),
            ],
            ops: SyntaxOps::default(),
        }
    }

    fn unop_applies(op: UnaryOp, operand: &Type) -> bool {
        match op {
            UnaryOp::Not => *operand == Type::Bool,
            UnaryOp::Neg => *operand == Type::Int,
            UnaryOp::Sum => operand.elem() == Some(&Type::Int),
            UnaryOp::Len | UnaryOp::The | UnaryOp::Distinct | UnaryOp::Unique => {
                operand.is_collection()
            }
        }
    }

    fn binop_applies(op: BinaryOp, lhs: &Type, rhs: &Type) -> bool {
        match op {
            BinaryOp::Eq => lhs == rhs,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                *lhs == Type::Int && *rhs == Type::Int
            }
            BinaryOp::Sub | BinaryOp::Div => *lhs == Type::Int && *rhs == Type::Int,
            BinaryOp::Add => {
                lhs == rhs && (*lhs == Type::Int || lhs.is_collection())
            }
            BinaryOp::And | BinaryOp::Or => *lhs == Type::Bool && *rhs == Type::Bool,
            BinaryOp::In => rhs.elem() == Some(lhs),
        }
    }
}

impl Build for SyntaxBuilder {
    fn build<'c>(&'c self, cache: &'c Cache, size: usize) -> Box<dyn Iterator<Item = Exp> + 'c> {
        let mut out: Vec<Exp> = Vec::new();
        if size == 1 {
            out.extend(self.vars.iter().map(build::var));
            out.extend(self.literals.iter().cloned());
            return Box::new(out.into_iter());
        }

        // unary operators over one smaller expression
        for op in &self.ops.unops {
            for e in cache.find(None, Some(size - 1)) {
                if Self::unop_applies(*op, &e.typ()) {
                    out.push(build::unop(*op, e.clone()));
                }
            }
        }

        for sizes in pick_to_sum(2, size - 1) {
            let (sz1, sz2) = (sizes[0], sizes[1]);

            // binary operators
            for op in &self.ops.binops {
                for lhs in cache.find(None, Some(sz1)) {
                    for rhs in cache.find(None, Some(sz2)) {
                        if Self::binop_applies(*op, &lhs.typ(), &rhs.typ()) {
                            out.push(build::binop(*op, lhs.clone(), rhs.clone()));
                        }
                    }
                }
            }

            // collection operators need a binder of the element type
            for bag in cache.find(Some(TypeTag::Bag.into()), Some(sz1)) {
                let bag_typ = bag.typ();
                let Some(elem) = bag_typ.elem() else { continue };
                let Some(binder) = self.binders.iter().find(|b| b.typ == *elem) else {
                    continue;
                };
                if self.ops.filters {
                    for body in cache.find(Some(Type::Bool.into()), Some(sz2)) {
                        out.push(build::filter(
                            bag.clone(),
                            build::lam(binder.clone(), body.clone()),
                        ));
                    }
                }
                if self.ops.flat_maps {
                    for body in cache.find(Some(TypeTag::Bag.into()), Some(sz2)) {
                        out.push(build::flat_map(
                            bag.clone(),
                            build::lam(binder.clone(), body.clone()),
                        ));
                    }
                }
                if self.ops.make_maps {
                    // group by any cached projection, keeping the group
                    if let Some(group) = self.binders.iter().find(|g| g.typ == bag_typ) {
                        for key_body in cache.find(None, Some(sz2)) {
                            out.push(build::make_map(
                                bag.clone(),
                                build::lam(binder.clone(), key_body.clone()),
                                build::lam(group.clone(), build::var(group)),
                            ));
                        }
                    }
                }
            }

            // lookups into cached maps
            if self.ops.make_maps {
                for m in cache.find(Some(TypeTag::Map.into()), Some(sz1)) {
                    let Some(key_typ) = m.typ().key().cloned() else { continue };
                    for key in cache.find(Some(key_typ.clone().into()), Some(sz2)) {
                        out.push(build::map_get(m.clone(), key.clone()));
                    }
                }
            }
        }

        Box::new(out.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_to_sum_enumerates_positive_splits() {
        assert_eq!(pick_to_sum(2, 3), vec![vec![1, 2], vec![2, 1]]);
        assert_eq!(pick_to_sum(2, 1), Vec::<Vec<usize>>::new());
        assert_eq!(pick_to_sum(1, 4), vec![vec![4]]);
    }

    #[test]
    fn size_one_yields_vars_and_literals() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let builder = SyntaxBuilder::new(vec![xs.clone()], vec![]);
        let cache = Cache::new();
        let out: Vec<Exp> = builder.build(&cache, 1).collect();
        assert!(out.contains(&build::var(&xs)));
        assert!(out.contains(&build::num(0)));
    }

    #[test]
    fn filters_compose_cached_bags_with_cached_predicates() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let b = Var::new("b", Type::Int);
        let builder = SyntaxBuilder::new(vec![xs.clone()], vec![b.clone()]);

        let mut cache = Cache::new();
        cache.add(build::var(&xs), 1);
        cache.add(build::bool_lit(true), 1);

        let out: Vec<Exp> = builder.build(&cache, 3).collect();
        let expected = build::filter(build::var(&xs), build::lam(b.clone(), build::bool_lit(true)));
        assert!(out.contains(&expected));
    }

    #[test]
    fn builders_are_deterministic() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let b = Var::new("b", Type::Int);
        let builder = SyntaxBuilder::new(vec![xs.clone()], vec![b.clone()]);

        let mut cache = Cache::new();
        cache.add(build::var(&xs), 1);
        cache.add(build::num(0), 1);
        cache.add(build::bool_lit(false), 1);

        let a: Vec<Exp> = builder.build(&cache, 3).collect();
        let b: Vec<Exp> = builder.build(&cache, 3).collect();
        assert_eq!(a, b);
    }
}
