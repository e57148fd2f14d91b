//! Parenthesis nesting parser
//!
//! Splits a statement into the text found at each parenthesis depth. Quoted
//! regions (`'...'` and `"..."`) are opaque: parentheses inside them do not
//! open or close groups. This is not a SQL parser; it only tells the
//! canonicalizer which text sits outside every subquery and column list.
//!
//! # Guarantees
//!
//! - Total: every input yields a tree, balanced or not
//! - Lossless for balanced input: `parse_nesting(s).to_string() == s`

use std::fmt;

/// One node of a [`ParseTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Text between two structural parentheses
    Text(String),
    /// Contents of one `( ... )` pair
    Group(Vec<Node>),
}

/// Parenthesis structure of a single statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTree {
    /// Children of the implicit root, in source order
    pub nodes: Vec<Node>,
}

impl ParseTree {
    /// Text segments that are direct children of the root, i.e. not inside
    /// any parentheses.
    pub fn top_level_text(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Text(text) => Some(text.as_str()),
            Node::Group(_) => None,
        })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Text(text) => f.write_str(text),
            Node::Group(children) => {
                f.write_str("(")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

/// Build the nesting tree of `statement`.
///
/// A `)` with no open group is kept as ordinary text. Groups still open at
/// the end of input are closed into their parents, so they stay nested
/// inside the root, and the text after the last boundary becomes the final
/// segment of the root.
pub fn parse_nesting(statement: &str) -> ParseTree {
    // Bottom entry is the root accumulator and is never popped in the loop.
    let mut stack: Vec<Vec<Node>> = vec![Vec::new()];
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (pos, c) in statement.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (Some(_), _) => {}
            (None, '(') => {
                push_text(&mut stack, &statement[start..pos]);
                stack.push(Vec::new());
                start = pos + 1;
            }
            (None, ')') if stack.len() > 1 => {
                push_text(&mut stack, &statement[start..pos]);
                close_group(&mut stack);
                start = pos + 1;
            }
            _ => {}
        }
    }

    while stack.len() > 1 {
        close_group(&mut stack);
    }
    push_text(&mut stack, &statement[start..]);

    ParseTree {
        nodes: stack.pop().unwrap_or_default(),
    }
}

fn push_text(stack: &mut [Vec<Node>], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(top) = stack.last_mut() {
        top.push(Node::Text(text.to_string()));
    }
}

fn close_group(stack: &mut Vec<Vec<Node>>) {
    if let Some(group) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.push(Node::Group(group));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    #[test]
    fn test_flat_statement_is_single_segment() {
        let tree = parse_nesting("select 1 from dual");
        assert_eq!(tree.nodes, vec![text("select 1 from dual")]);
    }

    #[test]
    fn test_empty_statement() {
        let tree = parse_nesting("");
        assert!(tree.nodes.is_empty());
        assert_eq!(tree.to_string(), "");
    }

    #[test]
    fn test_groups_are_nested() {
        let tree = parse_nesting("with a as (select f(x) from t) select * from a");
        assert_eq!(
            tree.nodes,
            vec![
                text("with a as "),
                Node::Group(vec![
                    text("select f"),
                    Node::Group(vec![text("x")]),
                    text(" from t"),
                ]),
                text(" select * from a"),
            ]
        );
    }

    #[test]
    fn test_top_level_text_skips_groups() {
        let tree = parse_nesting("with a as (select 1), b as (select 2) select * from a, b");
        let top: Vec<&str> = tree.top_level_text().collect();
        assert_eq!(top, vec!["with a as ", ", b as ", " select * from a, b"]);
    }

    #[test]
    fn test_parens_inside_quotes_are_text() {
        let tree = parse_nesting("select '(' || \")\" from t");
        assert_eq!(tree.nodes, vec![text("select '(' || \")\" from t")]);
    }

    #[test]
    fn test_other_quote_inside_quote_is_ignored() {
        let tree = parse_nesting("select 'it\"s (x' from (t)");
        assert_eq!(
            tree.nodes,
            vec![
                text("select 'it\"s (x' from "),
                Node::Group(vec![text("t")]),
            ]
        );
    }

    #[test]
    fn test_balanced_input_reconstructs_exactly() {
        let inputs = [
            "select (1 + (2 * 3)) from t where x in ('(', ')')",
            "with q as (select * from (select 1 from dual)) select * from q\n",
            "()",
            "(((a)))b",
        ];
        for input in inputs {
            assert_eq!(parse_nesting(input).to_string(), input);
        }
    }

    #[test]
    fn test_unbalanced_close_is_text() {
        let tree = parse_nesting("select 1) from t");
        assert_eq!(tree.nodes, vec![text("select 1) from t")]);
        assert_eq!(tree.to_string(), "select 1) from t");
    }

    #[test]
    fn test_unbalanced_close_after_group() {
        let tree = parse_nesting("f(x)) y");
        assert_eq!(
            tree.nodes,
            vec![text("f"), Node::Group(vec![text("x")]), text(") y")]
        );
    }

    #[test]
    fn test_unbalanced_open_stays_nested() {
        let tree = parse_nesting("select (a, (b from t");
        assert_eq!(
            tree.nodes,
            vec![
                text("select "),
                Node::Group(vec![text("a, "), Node::Group(vec![])]),
                text("b from t"),
            ]
        );
        let top: Vec<&str> = tree.top_level_text().collect();
        assert_eq!(top, vec!["select ", "b from t"]);
    }

    #[test]
    fn test_trailing_text_after_unclosed_group_goes_to_root() {
        let tree = parse_nesting("with a as (select (1), c as d from t\n");
        assert_eq!(
            tree.nodes,
            vec![
                text("with a as "),
                Node::Group(vec![text("select "), Node::Group(vec![text("1")])]),
                text(", c as d from t\n"),
            ]
        );
        assert!(matches!(tree.nodes.last(), Some(Node::Text(_))));
    }

    #[test]
    fn test_unterminated_quote_swallows_parens() {
        let tree = parse_nesting("select 'abc (def");
        assert_eq!(tree.nodes, vec![text("select 'abc (def")]);
    }

    #[test]
    fn test_multibyte_text_is_sliced_on_char_boundaries() {
        let tree = parse_nesting("select 'é' (ü)");
        assert_eq!(
            tree.nodes,
            vec![text("select 'é' "), Node::Group(vec![text("ü")])]
        );
    }
}
