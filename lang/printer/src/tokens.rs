// Default indentation size
pub const INDENT: isize = 4;

// Symbols

pub const COMMA: &str = ",";
pub const DOT: &str = ".";
pub const COLON: &str = ":";
pub const ARROW: &str = "->";
pub const BACKSLASH: &str = "\\";
pub const QUESTION: &str = "?";

// Operators

pub const EQ: &str = "==";
pub const LT: &str = "<";
pub const LE: &str = "<=";
pub const GT: &str = ">";
pub const GE: &str = ">=";
pub const PLUS: &str = "+";
pub const MINUS: &str = "-";
pub const SLASH: &str = "/";

// Keywords

pub const TRUE: &str = "true";
pub const FALSE: &str = "false";
pub const NOT: &str = "not";
pub const AND: &str = "and";
pub const OR: &str = "or";
pub const IN: &str = "in";
pub const SUM: &str = "sum";
pub const LEN: &str = "len";
pub const THE: &str = "the";
pub const DISTINCT: &str = "distinct";
pub const UNIQUE: &str = "unique";
pub const IF: &str = "if";
pub const THEN: &str = "then";
pub const ELSE: &str = "else";
pub const FILTER: &str = "filter";
pub const MAP: &str = "map";
pub const FLAT_MAP: &str = "flat_map";
pub const MAKE_MAP: &str = "make_map";
pub const GET: &str = "get";
