use miette::Diagnostic;
use thiserror::Error;

use crate::exp::build;
use crate::{Cond, Exp};

/// A child-index path addressing a sub-expression of a target.
pub type Path = Vec<usize>;

/// A sub-expression of a target together with its replacement context.
///
/// `path` plays the role of the replacement context: for any `e` of the
/// same type, `target.replace_at(&path, e)` is the whole target with the
/// fragment replaced. `assumptions` are the path-conditions guarding the
/// fragment (branch conditions of enclosing conditionals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub assumptions: Vec<Exp>,
    pub exp: Exp,
    pub path: Path,
}

#[derive(Error, Diagnostic, Debug)]
pub enum PathError {
    #[error("no child at index {index} along replacement path")]
    #[diagnostic(code("X-001"))]
    Missing { index: usize },
}

/// Enumerate every sub-expression of `root` together with its replacement
/// path and path-conditions, in preorder.
pub fn enumerate_fragments(root: &Exp) -> Vec<Fragment> {
    let mut out = Vec::new();
    walk(root, &mut Vec::new(), &mut Vec::new(), &mut out);
    out
}

fn walk(e: &Exp, conds: &mut Vec<Exp>, path: &mut Path, out: &mut Vec<Fragment>) {
    out.push(Fragment { assumptions: conds.clone(), exp: e.clone(), path: path.clone() });
    if let Exp::Cond(Cond { cond, then_branch, else_branch }) = e {
        path.push(0);
        walk(cond, conds, path, out);
        path.pop();

        conds.push((**cond).clone());
        path.push(1);
        walk(then_branch, conds, path, out);
        path.pop();
        conds.pop();

        conds.push(build::not((**cond).clone()));
        path.push(2);
        walk(else_branch, conds, path, out);
        path.pop();
        conds.pop();
        return;
    }
    for i in 0..e.num_children() {
        if let Some(child) = e.child(i) {
            path.push(i);
            walk(child, conds, path, out);
            path.pop();
        }
    }
}

impl Exp {
    /// Rebuild the expression with the sub-expression at `path` replaced
    /// by `new`.
    pub fn replace_at(&self, path: &[usize], new: Exp) -> Result<Exp, PathError> {
        match path.split_first() {
            None => Ok(new),
            Some((&index, rest)) => {
                let child = self.child(index).ok_or(PathError::Missing { index })?;
                let rebuilt = child.replace_at(rest, new)?;
                self.with_child(index, rebuilt).ok_or(PathError::Missing { index })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exp::build::*;
    use crate::{Type, Var};

    fn sample() -> Exp {
        let x = Var::new("x", Type::Int);
        let y = Var::new("y", Type::Int);
        cond(gt(var(&x), num(0)), add(var(&x), var(&y)), var(&y))
    }

    #[test]
    fn every_fragment_replaces_back_to_the_target() {
        let target = sample();
        for frag in enumerate_fragments(&target) {
            let rebuilt = target.replace_at(&frag.path, frag.exp.clone()).unwrap();
            assert_eq!(rebuilt, target);
        }
    }

    #[test]
    fn branch_conditions_guard_the_branches() {
        let target = sample();
        let frags = enumerate_fragments(&target);
        let x = Var::new("x", Type::Int);
        let y = Var::new("y", Type::Int);

        let then_frag = frags.iter().find(|f| f.exp == add(var(&x), var(&y))).unwrap();
        assert_eq!(then_frag.assumptions, vec![gt(var(&x), num(0))]);

        let else_frag = frags.iter().find(|f| f.path == vec![2]).unwrap();
        assert_eq!(else_frag.assumptions, vec![not(gt(var(&x), num(0)))]);

        let cond_frag = frags.iter().find(|f| f.path == vec![0]).unwrap();
        assert!(cond_frag.assumptions.is_empty());
    }

    #[test]
    fn replacement_rewrites_the_addressed_child() {
        let target = sample();
        let rebuilt = target.replace_at(&[2], num(7)).unwrap();
        let x = Var::new("x", Type::Int);
        let y = Var::new("y", Type::Int);
        assert_eq!(rebuilt, cond(gt(var(&x), num(0)), add(var(&x), var(&y)), num(7)));
    }

    #[test]
    fn missing_path_is_an_error() {
        let target = sample();
        assert!(target.replace_at(&[5], num(0)).is_err());
    }
}
