use exp::{HashMap, Value};
use pretty::DocAllocator;
use printer::tokens::COMMA;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

/// A total assignment from variable names to concrete values.
///
/// The same structure serves as the evaluation environment and as an
/// example (or counter-example) in the refinement loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Env {
    bindings: HashMap<String, Value>,
}

/// Examples are environments; the alias marks the role.
pub type Example = Env;

impl Env {
    pub fn new() -> Env {
        Env::default()
    }

    pub fn bind(&mut self, id: impl Into<String>, value: Value) {
        self.bindings.insert(id.into(), value);
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.bindings.get(id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in a deterministic order.
    pub fn sorted_bindings(&self) -> Vec<(&String, &Value)> {
        let mut bindings: Vec<_> = self.bindings.iter().collect();
        bindings.sort_by(|a, b| a.0.cmp(b.0));
        bindings
    }
}

impl FromIterator<(String, Value)> for Env {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Env {
        Env { bindings: iter.into_iter().collect() }
    }
}

impl Print for Env {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let sep = alloc.text(COMMA).append(alloc.space());
        alloc
            .intersperse(
                self.sorted_bindings().into_iter().map(|(id, value)| {
                    alloc
                        .text(id)
                        .append(alloc.text(" := "))
                        .append(value.print(cfg, alloc))
                }),
                sep,
            )
            .braces()
    }
}
