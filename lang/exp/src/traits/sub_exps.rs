use crate::Exp;

impl Exp {
    /// Every sub-expression in preorder, the expression itself included.
    /// Lambdas are transparent: their bodies are visited, the lambda
    /// nodes themselves are not yielded.
    pub fn sub_exps(&self) -> Vec<&Exp> {
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// Structural containment, lambda-valued fields included.
    pub fn contains(&self, other: &Exp) -> bool {
        if self == other {
            return true;
        }
        if let Exp::Lambda(target) = other {
            if self.own_lambdas().into_iter().any(|l| l == target) {
                return true;
            }
        }
        (0..self.num_children()).any(|i| self.child(i).is_some_and(|c| c.contains(other)))
    }
}

fn collect<'a>(e: &'a Exp, out: &mut Vec<&'a Exp>) {
    out.push(e);
    for i in 0..e.num_children() {
        if let Some(c) = e.child(i) {
            collect(c, out);
        }
    }
}
