use super::ast::{BlockHeader, Expr, ForClause, RangeBound, Statement, WithClause};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::notation::is_word_operator;

/// Words that open a block when they begin a statement
const BLOCK_KEYWORDS: &[&str] = &[
    "if",
    "else",
    "while",
    "until",
    "for",
    "with",
    "local",
    "preservingTransform",
    "def",
];

/// The block keyword a token spells, if any
pub fn block_keyword(token: &Token) -> Option<&'static str> {
    match &token.kind {
        TokenKind::Identifier(id) => BLOCK_KEYWORDS.iter().copied().find(|k| k == id),
        _ => None,
    }
}

/// Index of the first `kind` token outside of any bracket
pub fn find_top_level(tokens: &[Token], kind: &TokenKind) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate() {
        if depth == 0 && &token.kind == kind {
            return Some(i);
        }
        if token.kind.is_open() {
            depth += 1;
        } else if token.kind.is_close() {
            depth -= 1;
        }
    }
    None
}

/// Indices of every top-level token satisfying `pred`
fn top_level_positions(tokens: &[Token], pred: impl Fn(&Token) -> bool) -> Vec<usize> {
    let mut depth = 0i32;
    let mut positions = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if token.kind.is_open() {
            depth += 1;
        } else if token.kind.is_close() {
            depth -= 1;
        } else if depth == 0 && pred(token) {
            positions.push(i);
        }
    }
    positions
}

/// Index of the bracket closing the one at `open`
pub fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.kind.is_open() {
            depth += 1;
        } else if token.kind.is_close() {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Drops one pair of parentheses enclosing the whole run
fn strip_parens(tokens: &[Token]) -> &[Token] {
    match tokens.first() {
        Some(first)
            if first.kind == TokenKind::LeftParen
                && matching_close(tokens, 0) == Some(tokens.len() - 1) =>
        {
            &tokens[1..tokens.len() - 1]
        }
        _ => tokens,
    }
}

fn single_identifier(tokens: &[Token]) -> Option<String> {
    match tokens {
        [Token {
            kind: TokenKind::Identifier(id),
            ..
        }] if !is_word_operator(id) && !BLOCK_KEYWORDS.contains(&id.as_str()) => {
            Some(id.clone())
        }
        _ => None,
    }
}

fn identifier_list(tokens: &[Token]) -> Option<Vec<String>> {
    tokens
        .split(|t| t.kind == TokenKind::Comma)
        .map(single_identifier)
        .collect()
}

fn nonempty(tokens: &[Token], line: usize, message: &str) -> Result<Expr> {
    if tokens.is_empty() {
        Err(Error::syntax(line, message))
    } else {
        Ok(Expr::new(tokens.to_vec()))
    }
}

/// Splits a line into statements
///
/// A block keyword at the start of a statement makes the rest of the line,
/// including later `;`-separated statements, the body of a single-line block.
pub fn parse_statements(tokens: &[Token], line: usize) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    let mut rest = tokens;

    while let Some(first) = rest.first() {
        if first.kind == TokenKind::Semicolon {
            rest = &rest[1..];
            continue;
        }

        if let Some(keyword) = block_keyword(first) {
            let colon = find_top_level(rest, &TokenKind::Colon).ok_or_else(|| {
                let message = match keyword {
                    "def" => "Ill-formed single-line function definition".to_string(),
                    "else" if rest.get(1).map_or(false, |t| t.is_ident("if")) => {
                        "Missing : after single-line \"else if\".".to_string()
                    }
                    _ => format!("Missing : after single-line \"{}\".", keyword),
                };
                Error::syntax(line, message)
            })?;

            let header = parse_block_header(&rest[..colon], line)?;
            let body = parse_statements(&rest[colon + 1..], line)?;
            statements.push(Statement::Inline {
                header,
                body,
                suspend: false,
            });
            break;
        }

        if first.is_ident("debugWatch")
            && rest.get(1).map(|t| &t.kind) == Some(&TokenKind::LeftParen)
        {
            let close = matching_close(rest, 1)
                .ok_or_else(|| Error::syntax(line, "Unbalanced parentheses in debugWatch"))?;
            let watched = nonempty(&rest[2..close], line, "debugWatch requires an expression")?;
            statements.push(Statement::DebugWatch(watched));
            rest = &rest[close + 1..];
            continue;
        }

        let end = find_top_level(rest, &TokenKind::Semicolon).unwrap_or(rest.len());
        statements.push(Statement::Expression(Expr::new(rest[..end].to_vec())));
        rest = &rest[end..];
    }

    Ok(statements)
}

/// Parses the tokens of a block header, without its trailing `:`
pub fn parse_block_header(tokens: &[Token], line: usize) -> Result<BlockHeader> {
    let illegal = || Error::syntax(line, "Illegal block statement");
    let keyword = tokens.first().and_then(block_keyword).ok_or_else(illegal)?;
    let rest = &tokens[1..];

    let condition = |tokens: &[Token], keyword: &str| {
        nonempty(
            tokens,
            line,
            &format!("Missing condition after \"{}\"", keyword),
        )
    };

    match keyword {
        "if" => Ok(BlockHeader::If(condition(rest, "if")?)),
        "else" => match rest.first() {
            None => Ok(BlockHeader::Else),
            Some(t) if t.is_ident("if") => Ok(BlockHeader::ElseIf(condition(&rest[1..], "else if")?)),
            Some(_) => Err(illegal()),
        },
        "while" => Ok(BlockHeader::While(condition(rest, "while")?)),
        "until" => Ok(BlockHeader::Until(condition(rest, "until")?)),
        "for" => Ok(BlockHeader::For(parse_for_clause(strip_parens(rest), line)?)),
        "with" => Ok(BlockHeader::With(parse_with_clause(strip_parens(rest), line)?)),
        "local" if rest.is_empty() => Ok(BlockHeader::Local),
        "preservingTransform" if rest.is_empty() => Ok(BlockHeader::PreservingTransform),
        "def" => parse_def(rest, line),
        _ => Err(illegal()),
    }
}

fn parse_def(tokens: &[Token], line: usize) -> Result<BlockHeader> {
    let ill_formed = || Error::syntax(line, "Ill-formed function definition");

    let name = tokens
        .first()
        .and_then(|t| single_identifier(std::slice::from_ref(t)))
        .ok_or_else(ill_formed)?;

    if tokens.get(1).map(|t| &t.kind) != Some(&TokenKind::LeftParen)
        || matching_close(tokens, 1) != Some(tokens.len() - 1)
    {
        return Err(ill_formed());
    }

    Ok(BlockHeader::Def {
        name,
        params: Expr::new(tokens[2..tokens.len() - 1].to_vec()),
    })
}

/// `a, b ∊ expr`
pub fn parse_with_clause(tokens: &[Token], line: usize) -> Result<WithClause> {
    let syntax = || Error::syntax(line, "Incorrect WITH statement syntax");

    let positions = top_level_positions(tokens, |t| t.kind == TokenKind::ElementOf);
    let &[split] = positions.as_slice() else {
        return Err(syntax());
    };

    let members = identifier_list(&tokens[..split]).ok_or_else(syntax)?;
    let object = &tokens[split + 1..];
    if object.is_empty() {
        return Err(syntax());
    }

    Ok(WithClause {
        members,
        object: Expr::new(object.to_vec()),
    })
}

/// Any of the three FOR-loop forms
pub fn parse_for_clause(tokens: &[Token], line: usize) -> Result<ForClause> {
    let variable_syntax = || Error::syntax(line, "Illegal FOR-loop variable syntax");
    let positions = top_level_positions(tokens, |t| t.kind == TokenKind::ElementOf);

    match positions.as_slice() {
        [] => parse_range(tokens, line),

        &[split] => {
            let variable = single_identifier(&tokens[..split]).ok_or_else(variable_syntax)?;
            let container = nonempty(
                &tokens[split + 1..],
                line,
                "Missing container in FOR loop declaration",
            )?;

            // `for i ∊ 0 < i < 5` is a range over the same variable
            if let Ok(ForClause::Range {
                variable: ranged,
                lower,
                upper,
            }) = parse_range(&container.tokens, line)
            {
                if ranged == variable {
                    return Ok(ForClause::Range {
                        variable,
                        lower,
                        upper,
                    });
                }
            }

            Ok(ForClause::Container {
                variable,
                container,
            })
        }

        &[first, second] => {
            let members = identifier_list(&tokens[..first])
                .ok_or_else(|| Error::syntax(line, "Incorrect WITH statement syntax"))?;
            let variable =
                single_identifier(&tokens[first + 1..second]).ok_or_else(variable_syntax)?;
            let container = nonempty(
                &tokens[second + 1..],
                line,
                "Missing container in FOR loop declaration",
            )?;
            Ok(ForClause::WithContainer {
                members,
                variable,
                container,
            })
        }

        _ => Err(variable_syntax()),
    }
}

fn parse_range(tokens: &[Token], line: usize) -> Result<ForClause> {
    let descending = top_level_positions(tokens, |t| t.is_op(">") || t.is_op("≥"));
    let comparators = top_level_positions(tokens, |t| t.is_op("<") || t.is_op("≤"));

    if !descending.is_empty() {
        return Err(Error::syntax(
            line,
            "FOR-loop ranges may only use < or ≤ around the loop variable",
        ));
    }
    if comparators.is_empty() {
        return Err(Error::syntax(line, "No < or ≤ found in FOR loop declaration"));
    }

    let bound = |expr: &[Token], comparator: usize| -> Result<RangeBound> {
        Ok(RangeBound {
            expr: nonempty(expr, line, "Missing bound in FOR loop declaration")?,
            inclusive: tokens[comparator].is_op("≤"),
        })
    };
    let variable_syntax = || Error::syntax(line, "Illegal FOR-loop variable syntax");

    match comparators.as_slice() {
        &[op] => Ok(ForClause::Range {
            variable: single_identifier(&tokens[..op]).ok_or_else(variable_syntax)?,
            lower: None,
            upper: bound(&tokens[op + 1..], op)?,
        }),
        &[low, high] => Ok(ForClause::Range {
            variable: single_identifier(&tokens[low + 1..high]).ok_or_else(variable_syntax)?,
            lower: Some(bound(&tokens[..low], low)?),
            upper: bound(&tokens[high + 1..], high)?,
        }),
        _ => Err(variable_syntax()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan_line;

    fn tokens(source: &str) -> Vec<Token> {
        scan_line(source, 1).unwrap()
    }

    fn header(source: &str) -> Result<BlockHeader> {
        let tokens = tokens(source);
        parse_block_header(&tokens[..tokens.len() - 1], 1)
    }

    fn range_parts(clause: ForClause) -> (String, Option<(String, bool)>, (String, bool)) {
        match clause {
            ForClause::Range {
                variable,
                lower,
                upper,
            } => (
                variable,
                lower.map(|b| (b.expr.source_text(), b.inclusive)),
                (upper.expr.source_text(), upper.inclusive),
            ),
            other => panic!("expected a range, got {:?}", other),
        }
    }

    #[test]
    fn test_range_forms() {
        let BlockHeader::For(clause) = header("for 0 < i ≤ n + 1:").unwrap() else {
            panic!("expected a FOR header");
        };
        assert_eq!(
            range_parts(clause),
            (
                "i".to_string(),
                Some(("0".to_string(), false)),
                ("n + 1".to_string(), true)
            )
        );

        let BlockHeader::For(clause) = header("for i < 10:").unwrap() else {
            panic!("expected a FOR header");
        };
        assert_eq!(
            range_parts(clause),
            ("i".to_string(), None, ("10".to_string(), false))
        );
    }

    #[test]
    fn test_range_written_with_membership() {
        let BlockHeader::For(clause) = header("for i ∊ 0 < i < 5:").unwrap() else {
            panic!("expected a FOR header");
        };
        assert_eq!(range_parts(clause).0, "i");
    }

    #[test]
    fn test_container_forms() {
        match header("for (x ∊ [1, 2]):").unwrap() {
            BlockHeader::For(ForClause::Container {
                variable,
                container,
            }) => {
                assert_eq!(variable, "x");
                assert_eq!(container.source_text(), "[1, 2]");
            }
            other => panic!("unexpected {:?}", other),
        }

        match header("for a, b ∊ p ∊ points:").unwrap() {
            BlockHeader::For(ForClause::WithContainer {
                members, variable, ..
            }) => {
                assert_eq!(members, vec!["a", "b"]);
                assert_eq!(variable, "p");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_range_errors() {
        assert_eq!(
            header("for i:").unwrap_err(),
            Error::syntax(1, "No < or ≤ found in FOR loop declaration")
        );
        assert_eq!(
            header("for 2 < 3 < 4:").unwrap_err(),
            Error::syntax(1, "Illegal FOR-loop variable syntax")
        );
        for descending in ["for 5 > i > 0:", "for i ≥ 0:"] {
            assert_eq!(
                header(descending).unwrap_err(),
                Error::syntax(
                    1,
                    "FOR-loop ranges may only use < or ≤ around the loop variable"
                )
            );
        }
    }

    #[test]
    fn test_with_clause() {
        match header("with x, y ∊ pos:").unwrap() {
            BlockHeader::With(clause) => {
                assert_eq!(clause.members, vec!["x", "y"]);
                assert_eq!(clause.object.source_text(), "pos");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            header("with x + 1 ∊ pos:").unwrap_err(),
            Error::syntax(1, "Incorrect WITH statement syntax")
        );
    }

    #[test]
    fn test_def_header() {
        match header("def area(w, h = 1):").unwrap() {
            BlockHeader::Def { name, params } => {
                assert_eq!(name, "area");
                assert_eq!(params.source_text(), "w, h = 1");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_illegal_block_statement() {
        assert_eq!(
            header("x = 1:").unwrap_err(),
            Error::syntax(1, "Illegal block statement")
        );
        assert_eq!(
            header("local x:").unwrap_err(),
            Error::syntax(1, "Illegal block statement")
        );
    }

    #[test]
    fn test_statement_splitting() {
        let statements = parse_statements(&tokens("a = 1; b = 2"), 1).unwrap();
        assert_eq!(statements.len(), 2);

        let statements = parse_statements(&tokens("x = 0; if a: b(); c()"), 1).unwrap();
        assert_eq!(statements.len(), 2);
        match &statements[1] {
            Statement::Inline { header, body, .. } => {
                assert_eq!(header.keyword(), "if");
                assert_eq!(body.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_single_line_without_colon() {
        assert_eq!(
            parse_statements(&tokens("if a b()"), 4).unwrap_err(),
            Error::syntax(4, "Missing : after single-line \"if\".")
        );
    }

    #[test]
    fn test_debug_watch() {
        let statements = parse_statements(&tokens("debugWatch(a + b)"), 1).unwrap();
        match &statements[0] {
            Statement::DebugWatch(expr) => assert_eq!(expr.source_text(), "a + b"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
