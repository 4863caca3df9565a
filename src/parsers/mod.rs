//! Source language registry for the structural scorer
//!
//! Maps file extensions to tree-sitter grammars and to the node kinds the
//! complexity traversal cares about: block definitions (function/method
//! bodies) and branching constructs (conditionals, loops, catch clauses,
//! switch cases).

mod complexity;

pub use complexity::{measure, ParseError};

/// Languages critiq can score structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Rust,
    Go,
    Java,
}

impl Language {
    /// Resolve a language from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" | "pyi" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            "rs" => Some(Language::Rust),
            "go" => Some(Language::Go),
            "java" => Some(Language::Java),
            _ => None,
        }
    }

    /// Human-readable language name
    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Tsx => "TSX",
            Language::Rust => "Rust",
            Language::Go => "Go",
            Language::Java => "Java",
        }
    }

    /// The tree-sitter grammar for this language
    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
        }
    }

    /// Node kinds that open a new function- or method-level block.
    ///
    /// Anonymous callables (lambdas, closures, arrow functions) are not
    /// blocks: their branches accrue to whatever scope contains them.
    pub fn block_kinds(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["function_definition", "async_function_definition"],
            Language::JavaScript | Language::TypeScript | Language::Tsx => &[
                "function_declaration",
                "function_expression",
                "generator_function_declaration",
                "generator_function",
                "method_definition",
            ],
            Language::Rust => &["function_item"],
            Language::Go => &["function_declaration", "method_declaration"],
            Language::Java => &["method_declaration", "constructor_declaration"],
        }
    }

    /// Node kinds counted as branching constructs.
    ///
    /// Each switch/match case counts as one conditional branch; boolean
    /// operators do not count.
    pub fn branch_kinds(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &[
                "if_statement",
                "elif_clause",
                "for_statement",
                "while_statement",
                "except_clause",
                "conditional_expression",
                "case_clause",
            ],
            Language::JavaScript | Language::TypeScript | Language::Tsx => &[
                "if_statement",
                "for_statement",
                "for_in_statement",
                "while_statement",
                "do_statement",
                "catch_clause",
                "switch_case",
                "ternary_expression",
            ],
            Language::Rust => &[
                "if_expression",
                "match_arm",
                "for_expression",
                "while_expression",
                "loop_expression",
            ],
            Language::Go => &[
                "if_statement",
                "for_statement",
                "expression_case",
                "type_case",
                "communication_case",
            ],
            Language::Java => &[
                "if_statement",
                "for_statement",
                "enhanced_for_statement",
                "while_statement",
                "do_statement",
                "catch_clause",
                "switch_block_statement_group",
                "switch_rule",
                "ternary_expression",
            ],
        }
    }
}

/// All file extensions with a registered grammar
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "py", "pyi", // Python
        "js", "jsx", "mjs", "cjs", // JavaScript
        "ts", "tsx",  // TypeScript
        "rs",   // Rust
        "go",   // Go
        "java", // Java
    ]
}
