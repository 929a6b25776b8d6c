//! Table-reference extraction
//!
//! Scans the raw query text for the tables it reads from: every identifier
//! appearing after a FROM or JOIN keyword, at any nesting level. The scan
//! works on the flat token stream (sqlparser's tokenizer, generic dialect)
//! and is deliberately best-effort: aliases are skipped, dotted names are
//! reduced to their last segment, expression operands and function calls
//! are not treated as tables, and unparsable text yields an empty list
//! instead of an error.
//!
//! Once a FROM or JOIN has been seen the table context stays on for the
//! rest of the statement, so identifiers in later clauses (GROUP BY, ORDER
//! BY, subqueries) are collected too. Downstream base-cardinality features
//! were built against this behavior; do not tighten it without re-deriving
//! those statistics.
//!
//! Duplicates are kept and order is preserved: the caller sums per
//! occurrence.

use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Returns the ordered, non-deduplicated list of table names referenced by
/// `query`. Never fails: malformed SQL degrades to a partial or empty list.
pub fn extract_table_names(query: &str) -> Vec<String> {
    let dialect = GenericDialect {};
    let tokens = match Tokenizer::new(&dialect, query).tokenize() {
        Ok(tokens) => tokens,
        Err(_) => return Vec::new(),
    };
    let tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|t| !matches!(t, Token::Whitespace(_)))
        .collect();

    let mut tables = Vec::new();
    let mut table_context = false;
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Word(w) if matches!(w.keyword, Keyword::FROM | Keyword::JOIN) => {
                table_context = true;
                i += 1;
            }
            Token::Word(w) if table_context && w.keyword == Keyword::NoKeyword => {
                let (base, end) = read_dotted_name(&tokens, i, &w.value);
                // A FROM/JOIN keyword always precedes this arm, so i >= 1.
                let in_expression = is_operator(tokens.get(end))
                    || is_operator(Some(&tokens[i - 1]))
                    || tokens.get(end) == Some(&Token::LParen)
                    || tokens[i - 1] == Token::LParen;
                if !in_expression && !base.is_empty() {
                    tables.push(base);
                }
                i = skip_alias(&tokens, end, in_expression);
            }
            _ => i += 1,
        }
    }
    tables
}

/// Consumes `first [. word]*` starting at `start`; the base name is the
/// last dotted segment. Returns the name and the index after the run.
fn read_dotted_name(tokens: &[Token], start: usize, first: &str) -> (String, usize) {
    let mut base = first.to_string();
    let mut i = start + 1;
    while i + 1 < tokens.len() && tokens[i] == Token::Period {
        match &tokens[i + 1] {
            Token::Word(part) => {
                base = part.value.clone();
                i += 2;
            }
            _ => break,
        }
    }
    (base, i)
}

/// Steps over an `AS alias` or bare-word alias following a table name.
fn skip_alias(tokens: &[Token], end: usize, in_expression: bool) -> usize {
    if in_expression {
        return end;
    }
    match tokens.get(end) {
        Some(Token::Word(w)) if w.keyword == Keyword::AS => match tokens.get(end + 1) {
            Some(Token::Word(a)) if a.keyword == Keyword::NoKeyword => end + 2,
            _ => end + 1,
        },
        Some(Token::Word(w)) if w.keyword == Keyword::NoKeyword => end + 1,
        _ => end,
    }
}

fn is_operator(token: Option<&Token>) -> bool {
    matches!(
        token,
        Some(
            Token::Eq
                | Token::Neq
                | Token::Lt
                | Token::Gt
                | Token::LtEq
                | Token::GtEq
                | Token::Plus
                | Token::Minus
                | Token::Mul
                | Token::Div
                | Token::Mod
                | Token::StringConcat
        )
    )
}
