//! Block lowering: each block header becomes an opening and a closing
//! fragment of host code that bracket the block's body

use super::gensym::Gensym;
use crate::error::Result;
use crate::notation::expand;
use crate::parser::{BlockHeader, Expr, ForClause, RangeBound, WithClause};

/// Host code placed before and after a block body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lowered {
    pub open: String,
    pub close: String,
}

impl Lowered {
    fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Lowered {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Nests `inner` directly inside `self`
    fn wrap(self, inner: Lowered) -> Self {
        Lowered {
            open: format!("{} {}", self.open, inner.open),
            close: format!("{} {}", inner.close, self.close),
        }
    }
}

/// A guarded suspension point taken once every `mask + 1` passes
pub fn suspension_point(mask: u32) -> String {
    format!(
        "{{if (!(__yieldCounter = (__yieldCounter + 1) & {})) {{ yield; }}}}",
        mask
    )
}

/// Lowers a block header to its bracketing host code
pub fn lower_header(header: &BlockHeader, line: usize, gensym: &mut Gensym) -> Result<Lowered> {
    Ok(match header {
        BlockHeader::If(test) => Lowered::new(format!("if ({}) {{", expand(test, line)?), "}"),
        BlockHeader::ElseIf(test) => {
            Lowered::new(format!("else if ({}) {{", expand(test, line)?), "}")
        }
        BlockHeader::Else => Lowered::new("else {", "}"),
        BlockHeader::While(test) => {
            Lowered::new(format!("while ({}) {{", expand(test, line)?), "}")
        }
        BlockHeader::Until(test) => {
            Lowered::new(format!("while (! ({})) {{", expand(test, line)?), "}")
        }
        BlockHeader::Local => Lowered::new("{", "}"),
        BlockHeader::PreservingTransform => Lowered::new(
            "try { _pushGraphicsState();",
            "} finally { _popGraphicsState(); }",
        ),
        BlockHeader::Def { name, params } => {
            let params = if params.is_empty() {
                String::new()
            } else {
                expand(params, line)?
            };
            Lowered::new(format!("const {} = (function({}) {{", name, params), "});")
        }
        BlockHeader::With(clause) => lower_with(clause, line, gensym)?,
        BlockHeader::For(clause) => lower_for(clause, line, gensym)?,
    })
}

/// `with a, b ∊ expr`
///
/// Aliases `a` and `b` as locals backed by accessors on the object; on every
/// exit the original descriptors come back and the locals are written back.
pub fn lower_with(clause: &WithClause, line: usize, gensym: &mut Gensym) -> Result<Lowered> {
    let object = expand(&clause.object, line)?;
    Ok(with_members(&clause.members, &object, gensym))
}

fn with_members(members: &[String], object: &str, gensym: &mut Gensym) -> Lowered {
    let obj = gensym.fresh("obj");
    let value = gensym.fresh("v");
    let descriptors: Vec<String> = members
        .iter()
        .map(|m| gensym.fresh(&format!("{}Descriptor", m)))
        .collect();

    let mut open = format!("{{ let {} = ({})", obj, object);
    for member in members {
        open.push_str(&format!(", {m} = {obj}.{m}", m = member, obj = obj));
    }
    for (member, descriptor) in members.iter().zip(&descriptors) {
        open.push_str(&format!(
            ", {d} = _Object.getOwnPropertyDescriptor({obj}, '{m}')",
            d = descriptor,
            obj = obj,
            m = member
        ));
    }
    open.push_str(&format!("; _Object.defineProperties({}, {{", obj));
    for member in members {
        open.push_str(&format!(
            "{m}: {{configurable: true, get() {{ return {m}; }}, set({v}) {{ {m} = {v}; }}}}, ",
            m = member,
            v = value
        ));
    }
    open.push_str("}); try {");

    let mut close = String::from("} finally { ");
    for (member, descriptor) in members.iter().zip(&descriptors) {
        close.push_str(&format!(
            "if ({d}) _Object.defineProperty({obj}, '{m}', {d}); else delete {obj}.{m}; {obj}.{m} = {m}; ",
            d = descriptor,
            obj = obj,
            m = member
        ));
    }
    close.push_str("}}");

    Lowered::new(open, close)
}

/// Any FOR form
pub fn lower_for(clause: &ForClause, line: usize, gensym: &mut Gensym) -> Result<Lowered> {
    match clause {
        ForClause::Range {
            variable,
            lower,
            upper,
        } => lower_range(variable, lower.as_ref(), upper, line, gensym),

        ForClause::Container {
            variable,
            container,
        } => lower_container(variable, container, line, gensym),

        ForClause::WithContainer {
            members,
            variable,
            container,
        } => {
            let with = with_members(members, variable, gensym);
            Ok(lower_container(variable, container, line, gensym)?.wrap(with))
        }
    }
}

/// First value of a range loop
///
/// An inclusive bound is used as written. A strict bound becomes the first
/// integer above it: integer literals stay as they are, other literals fold
/// to `floor + 1`, and expressions get `floor(a) + 1` at run time.
fn range_start(bound: &RangeBound, line: usize) -> Result<String> {
    if bound.inclusive {
        return expand(&bound.expr, line);
    }

    if let Some(literal) = bound.expr.as_number() {
        if let Some(value) = parse_number(literal) {
            return Ok(if value.fract() == 0.0 {
                literal.to_string()
            } else {
                (value.floor() + 1.0).to_string()
            });
        }
    }

    Ok(format!("_Math.floor({}) + 1", expand(&bound.expr, line)?))
}

fn parse_number(literal: &str) -> Option<f64> {
    match literal.strip_prefix("0x").or_else(|| literal.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok().map(|v| v as f64),
        None => literal.parse::<f64>().ok(),
    }
}

fn lower_range(
    variable: &str,
    lower: Option<&RangeBound>,
    upper: &RangeBound,
    line: usize,
    gensym: &mut Gensym,
) -> Result<Lowered> {
    let start = match lower {
        Some(bound) => range_start(bound, line)?,
        None => "0".to_string(),
    };
    let end = expand(&upper.expr, line)?;
    let op = if upper.inclusive { "<=" } else { "<" };
    let counter = gensym.fresh(variable);

    Ok(Lowered::new(
        format!(
            "for (let {c} = {start}; {c} {op} {end}; ++{c}) {{ let {v} = {c};",
            c = counter,
            start = start,
            op = op,
            end = end,
            v = variable
        ),
        "}",
    ))
}

/// Iterates a snapshot: the keys of a plain object, else a clone of the elements
fn lower_container(
    variable: &str,
    container: &Expr,
    line: usize,
    gensym: &mut Gensym,
) -> Result<Lowered> {
    let expr = expand(container, line)?;
    let snapshot = gensym.fresh("cntnr");
    let index = gensym.fresh("index");
    let tmp = gensym.fresh("tmp");
    let count = gensym.fresh("N");

    Ok(Lowered::new(
        format!(
            "for (let {tmp} = {expr}, {s} = isObject({tmp}) ? _Object.keys({tmp}) : _clone({tmp}), {n} = {s}.length, {i} = 0; {i} < {n}; ++{i}) {{ let {v} = {s}[{i}];",
            tmp = tmp,
            expr = expr,
            s = snapshot,
            n = count,
            i = index,
            v = variable
        ),
        "}",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan_line;
    use crate::notation::expand_literals;
    use crate::parser::parse_block_header;

    fn lower(source: &str) -> Lowered {
        let tokens = expand_literals(scan_line(source, 1).unwrap()).unwrap();
        let header = parse_block_header(&tokens[..tokens.len() - 1], 1).unwrap();
        lower_header(&header, 1, &mut Gensym::new()).unwrap()
    }

    #[test]
    fn test_exclusive_range_from_zero() {
        let lowered = lower("for i ∊ 0 < i < 5:");
        assert_eq!(
            lowered.open,
            "for (let __i1__ = 0; __i1__ < 5; ++__i1__) { let i = __i1__;"
        );
        assert_eq!(lowered.close, "}");
    }

    #[test]
    fn test_inclusive_range() {
        assert_eq!(
            lower("for 0 ≤ i ≤ 5:").open,
            "for (let __i1__ = 0; __i1__ <= 5; ++__i1__) { let i = __i1__;"
        );
    }

    #[test]
    fn test_strict_fractional_lower_bound() {
        assert_eq!(
            lower("for 2.3 < i < 5:").open,
            "for (let __i1__ = 3; __i1__ < 5; ++__i1__) { let i = __i1__;"
        );
        assert_eq!(
            lower("for a < i < b:").open,
            "for (let __i1__ = _Math.floor(a) + 1; __i1__ < b; ++__i1__) { let i = __i1__;"
        );
    }

    #[test]
    fn test_implicit_zero_lower_bound() {
        assert_eq!(
            lower("for k < n:").open,
            "for (let __k1__ = 0; __k1__ < n; ++__k1__) { let k = __k1__;"
        );
    }

    #[test]
    fn test_container_loop() {
        assert_eq!(
            lower("for x ∊ xs:").open,
            "for (let __tmp3__ = xs, __cntnr1__ = isObject(__tmp3__) ? _Object.keys(__tmp3__) : _clone(__tmp3__), __N4__ = __cntnr1__.length, __index2__ = 0; __index2__ < __N4__; ++__index2__) { let x = __cntnr1__[__index2__];"
        );
    }

    #[test]
    fn test_with_block() {
        let lowered = lower("with a ∊ obj:");
        assert_eq!(
            lowered.open,
            "{ let __obj1__ = (obj), a = __obj1__.a, __aDescriptor3__ = _Object.getOwnPropertyDescriptor(__obj1__, 'a'); _Object.defineProperties(__obj1__, {a: {configurable: true, get() { return a; }, set(__v2__) { a = __v2__; }}, }); try {"
        );
        assert_eq!(
            lowered.close,
            "} finally { if (__aDescriptor3__) _Object.defineProperty(__obj1__, 'a', __aDescriptor3__); else delete __obj1__.a; __obj1__.a = a; }}"
        );
    }

    #[test]
    fn test_for_with_opens_with_inside_loop() {
        let lowered = lower("for x, y ∊ p ∊ points:");
        assert!(lowered.open.starts_with("for (let "));
        assert!(lowered.open.contains("{ let p = "));
        assert!(lowered.open.ends_with("{ let __obj1__ = (p), x = __obj1__.x, y = __obj1__.y, __xDescriptor3__ = _Object.getOwnPropertyDescriptor(__obj1__, 'x'), __yDescriptor4__ = _Object.getOwnPropertyDescriptor(__obj1__, 'y'); _Object.defineProperties(__obj1__, {x: {configurable: true, get() { return x; }, set(__v2__) { x = __v2__; }}, y: {configurable: true, get() { return y; }, set(__v2__) { y = __v2__; }}, }); try {"));
        assert!(lowered.close.ends_with("}} }"));
    }

    #[test]
    fn test_simple_blocks() {
        assert_eq!(lower("until done:").open, "while (! (done)) {");
        assert_eq!(lower("else if x ≥ 2:").open, "else if (x >= 2) {");
        assert_eq!(
            lower("def area(w, h):"),
            Lowered::new("const area = (function(w, h) {", "});")
        );
        assert_eq!(
            lower("preservingTransform:").close,
            "} finally { _popGraphicsState(); }"
        );
    }

    #[test]
    fn test_suspension_point_mask() {
        assert_eq!(
            suspension_point(8191),
            "{if (!(__yieldCounter = (__yieldCounter + 1) & 8191)) { yield; }}"
        );
    }
}
