//! Pre-interned pattern keywords.

use std::sync::LazyLock;

use knot_ir::Name;

/// Every symbol with special meaning in pattern syntax.
pub struct Keywords {
    pub wildcard: Name,
    pub ellipsis: Name,
    pub ellipsis_alt: Name,
    pub one_or_more: Name,
    pub tree_search: Name,
    pub quote: Name,
    pub quasiquote: Name,
    pub unquote: Name,
    pub unquote_splicing: Name,
    pub and: Name,
    pub or: Name,
    pub not: Name,
    pub predicate: Name,
    pub transform: Name,
    pub record: Name,
    pub record_named: Name,
    pub getter: Name,
    pub setter: Name,
    pub match_: Name,
    pub failure_arrow: Name,
}

static KEYWORDS: LazyLock<Keywords> = LazyLock::new(|| Keywords {
    wildcard: Name::intern("_"),
    ellipsis: Name::intern("..."),
    ellipsis_alt: Name::intern("___"),
    one_or_more: Name::intern("..1"),
    tree_search: Name::intern("***"),
    quote: Name::intern("quote"),
    quasiquote: Name::intern("quasiquote"),
    unquote: Name::intern("unquote"),
    unquote_splicing: Name::intern("unquote-splicing"),
    and: Name::intern("and"),
    or: Name::intern("or"),
    not: Name::intern("not"),
    predicate: Name::intern("?"),
    transform: Name::intern("="),
    record: Name::intern("$"),
    record_named: Name::intern("@"),
    getter: Name::intern("get!"),
    setter: Name::intern("set!"),
    match_: Name::intern("match"),
    failure_arrow: Name::intern("=>"),
});

impl Keywords {
    pub fn get() -> &'static Keywords {
        &KEYWORDS
    }

    /// Repetition marker, if `name` is one: `...`/`___` (zero or more) or
    /// `..1` (one or more).
    pub fn repeat_marker(&self, name: Name) -> Option<crate::RepeatMin> {
        if name == self.ellipsis || name == self.ellipsis_alt {
            Some(crate::RepeatMin::Zero)
        } else if name == self.one_or_more {
            Some(crate::RepeatMin::One)
        } else {
            None
        }
    }
}
