//! Structural complexity scoring via tree-sitter traversal
//!
//! Two measurements are combined by taking their maximum:
//!
//! 1. Per-block cyclomatic complexity: `1 + branching constructs` for every
//!    function- or method-level block, counted over the nodes belonging to
//!    that block only. Nested block definitions score separately and are
//!    never double-counted into their parent.
//! 2. Top-level complexity: the same formula over module-scope statements,
//!    recursing through top-level constructs but never entering a block
//!    definition.
//!
//! The second measurement exists so a zero-function script with deeply
//! branching top-level logic does not score as trivially simple.

use crate::models::{ComplexityReport, ScoreSource};
use crate::parsers::Language;
use thiserror::Error;
use tree_sitter::{Node, Parser};

#[derive(Debug, Error)]
pub enum ParseError {
    /// Grammar could not be loaded into the parser (ABI mismatch)
    #[error("failed to load {0} grammar: {1}")]
    Grammar(&'static str, tree_sitter::LanguageError),

    /// Source is not syntactically valid in the target language
    #[error("source is not syntactically valid {0}")]
    Unparseable(&'static str),
}

/// Measure the cyclomatic complexity of `source`.
///
/// Returns a report with score >= 1, or [`ParseError::Unparseable`] when
/// the syntax tree contains errors. Callers must not persist or report
/// unparseable input.
pub fn measure(source: &str, lang: Language) -> Result<ComplexityReport, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&lang.grammar())
        .map_err(|e| ParseError::Grammar(lang.name(), e))?;

    let tree = parser
        .parse(source, None)
        .ok_or(ParseError::Unparseable(lang.name()))?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(ParseError::Unparseable(lang.name()));
    }

    // Top-level measurement: module scope only, blocks opaque.
    let mut best = 1 + branches_outside_blocks(root, lang);

    // Per-block measurement for every block definition in the tree.
    let mut blocks = Vec::new();
    collect_blocks(root, lang, &mut blocks);
    for block in blocks {
        let mut count = 0;
        let mut cursor = block.walk();
        for child in block.children(&mut cursor) {
            count += count_branches(child, lang);
        }
        best = best.max(1 + count);
    }

    Ok(ComplexityReport {
        score: best,
        source: ScoreSource::Structural,
    })
}

/// Count branch nodes in a subtree without descending into nested blocks.
/// The node itself is counted if it is a branch construct.
fn count_branches(node: Node, lang: Language) -> u32 {
    if lang.block_kinds().contains(&node.kind()) {
        return 0;
    }
    let mut count = if lang.branch_kinds().contains(&node.kind()) {
        1
    } else {
        0
    };
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        count += count_branches(child, lang);
    }
    count
}

/// Branch count reachable from the root without entering any block
fn branches_outside_blocks(root: Node, lang: Language) -> u32 {
    let mut count = 0;
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        count += count_branches(child, lang);
    }
    count
}

/// Gather every block-definition node, including blocks nested in blocks
fn collect_blocks<'t>(node: Node<'t>, lang: Language, out: &mut Vec<Node<'t>>) {
    if lang.block_kinds().contains(&node.kind()) {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_blocks(child, lang, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branchless_source_scores_one() {
        let score = measure("x = 1\ny = x + 2\nprint(y)\n", Language::Python).unwrap().score;
        assert_eq!(score, 1);
    }

    #[test]
    fn branchless_function_scores_one() {
        let source = "def simple():\n    print(\"hello\")\n";
        assert_eq!(measure(source, Language::Python).unwrap().score, 1);
    }

    #[test]
    fn loop_and_conditional_in_function_score_three() {
        let source = "def f():\n    for i in r:\n        if c:\n            pass\n";
        assert_eq!(measure(source, Language::Python).unwrap().score, 3);
    }

    #[test]
    fn top_level_branches_are_not_trivially_simple() {
        // Spaghetti script: three top-level branching constructs, no functions.
        let source = "\
for i in range(10):
    if i % 2 == 0:
        print(i)
while x:
    x -= 1
";
        assert_eq!(measure(source, Language::Python).unwrap().score, 4);
    }

    #[test]
    fn final_score_is_max_of_block_and_top_level() {
        // Block scores 3, top level scores 2; max wins.
        let source = "\
def hairy():
    for i in r:
        if c:
            pass
if flag:
    print(1)
";
        assert_eq!(measure(source, Language::Python).unwrap().score, 3);
    }

    #[test]
    fn nested_function_branches_not_double_counted() {
        // Outer has one loop; inner has if+while. Outer must score 2, inner 3.
        let source = "\
def outer():
    for i in r:
        pass
    def inner():
        if a:
            pass
        while b:
            pass
";
        assert_eq!(measure(source, Language::Python).unwrap().score, 3);
    }

    #[test]
    fn code_inside_top_level_loop_counts_toward_top_level() {
        let source = "\
for i in range(3):
    if i:
        print(i)
";
        assert_eq!(measure(source, Language::Python).unwrap().score, 3);
    }

    #[test]
    fn except_clauses_count_as_branches() {
        let source = "\
def risky():
    try:
        go()
    except ValueError:
        pass
    except KeyError:
        pass
";
        assert_eq!(measure(source, Language::Python).unwrap().score, 3);
    }

    #[test]
    fn invalid_python_is_unparseable() {
        let err = measure("def broken(:\n    pass\n", Language::Python).unwrap_err();
        assert!(matches!(err, ParseError::Unparseable(_)));
    }

    #[test]
    fn rust_branches_count() {
        let source = "\
fn decide(x: i32) -> i32 {
    if x > 0 {
        for _ in 0..x {}
        x
    } else {
        -x
    }
}
";
        assert_eq!(measure(source, Language::Rust).unwrap().score, 3);
    }

    #[test]
    fn javascript_function_with_branches() {
        let source = "\
function pick(items) {
  for (const it of items) {
    if (it.ok) {
      return it;
    }
  }
  return null;
}
";
        assert_eq!(measure(source, Language::JavaScript).unwrap().score, 3);
    }

    #[test]
    fn go_method_branches_count() {
        let source = "\
package main

func scan(xs []int) int {
    n := 0
    for _, x := range xs {
        if x > 0 {
            n++
        }
    }
    return n
}
";
        assert_eq!(measure(source, Language::Go).unwrap().score, 3);
    }

    #[test]
    fn java_catch_counts() {
        let source = "\
class A {
    void run() {
        try {
            go();
        } catch (Exception e) {
            log(e);
        }
    }
}
";
        assert_eq!(measure(source, Language::Java).unwrap().score, 2);
    }
}
