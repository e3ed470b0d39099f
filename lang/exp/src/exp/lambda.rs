use pretty::DocAllocator;
use printer::tokens::{ARROW, BACKSLASH};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg, parens_if};

use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

/// A lambda abstraction.
///
/// Lambdas are second-class: they only occur as the function argument of
/// the collection operators, are never watched as fragments, and their
/// binders are drawn from a shared pool so that alpha-equivalent lambdas
/// collapse to structural equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lambda {
    pub param: Var,
    pub body: Box<Exp>,
}

impl Lambda {
    pub fn new(param: Var, body: Exp) -> Lambda {
        Lambda { param, body: Box::new(body) }
    }
}

impl From<Lambda> for Exp {
    fn from(e: Lambda) -> Exp {
        Exp::Lambda(e)
    }
}

impl HasType for Lambda {
    /// The type a use site projects out of the lambda, i.e. the body type.
    fn typ(&self) -> Type {
        self.body.typ()
    }
}

impl FreeVars for Lambda {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        bound.push(self.param.id.clone());
        self.body.free_vars_mut(bound, fvs);
        bound.pop();
    }
}

impl Substitutable for Lambda {
    type Result = Lambda;

    fn subst(&self, by: &Substitution) -> Lambda {
        if by.contains_key(&self.param.id) {
            let mut by = by.clone();
            by.remove(&self.param.id);
            Lambda { param: self.param.clone(), body: self.body.subst(&by) }
        } else {
            Lambda { param: self.param.clone(), body: self.body.subst(by) }
        }
    }
}

impl Print for Lambda {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let doc = alloc
            .text(BACKSLASH)
            .append(self.param.print(cfg, alloc))
            .append(alloc.space())
            .append(alloc.text(ARROW))
            .append(alloc.space())
            .append(self.body.print(cfg, alloc));
        parens_if(prec > 0, doc)
    }
}
