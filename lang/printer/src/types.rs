use crate::DEFAULT_WIDTH;
use crate::tokens::INDENT;
use pretty::DocAllocator;

pub type Alloc<'a> = pretty::Arena<'a>;
pub type Builder<'a> = pretty::DocBuilder<'a, Alloc<'a>>;

/// Operator precedence, used to decide where parentheses are needed.
/// Higher binds tighter; `0` never parenthesizes.
pub type Precedence = u32;

pub struct PrintCfg {
    pub width: usize,
    pub indent: isize,
}

impl Default for PrintCfg {
    fn default() -> Self {
        PrintCfg { width: DEFAULT_WIDTH, indent: INDENT }
    }
}

pub trait Print {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a>;

    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.print_prec(cfg, alloc, 0)
    }

    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String {
        let alloc = Alloc::new();
        let default_cfg = PrintCfg::default();
        let cfg = cfg.unwrap_or(&default_cfg);
        let mut buf = Vec::new();
        self.print(cfg, &alloc).1.render(cfg.width, &mut buf).expect("Failed to print to string");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<T: Print> Print for Box<T> {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        self.as_ref().print_prec(cfg, alloc, prec)
    }
}

impl<T: Print> Print for Option<T> {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Some(inner) => inner.print_prec(cfg, alloc, prec),
            None => alloc.nil(),
        }
    }
}

/// Print a comma-separated sequence.
pub fn print_comma_separated<'a, T: Print>(
    items: &'a [T],
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
) -> Builder<'a> {
    let sep = alloc.text(crate::tokens::COMMA).append(alloc.space());
    alloc.intersperse(items.iter().map(|x| x.print(cfg, alloc)), sep)
}

/// Wrap `inner` in parentheses when the surrounding precedence binds
/// tighter than the printed node's own precedence.
pub fn parens_if(cond: bool, inner: Builder<'_>) -> Builder<'_> {
    if cond { inner.parens() } else { inner }
}
