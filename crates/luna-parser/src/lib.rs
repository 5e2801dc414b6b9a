//! Lunatico parser: recursive descent parser producing a rowan-based CST.
//!
//! This crate transforms the token stream from `luna-lexer` into a concrete
//! syntax tree (CST) using the `rowan` library, then exposes a typed AST
//! layer over it. The CST keeps every significant token, so later stages
//! (the type checker, the AST printer) work from the same tree.

pub mod ast;
pub mod cst;
pub mod dump;
pub mod error;
mod parser;
pub mod syntax_kind;

use luna_common::error::LexError;

pub use cst::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

use ast::stmt::SourceFile;
use ast::AstNode;

/// Result of parsing a Lunatico source file.
///
/// Contains the green tree (the immutable, cheap-to-clone CST) plus any
/// scanner and parser errors. With the first-error-only strategy,
/// `errors` holds at most one parse error.
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
    lex_errors: Vec<LexError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The typed view of the root node.
    pub fn tree(&self) -> SourceFile {
        SourceFile::cast(self.syntax()).expect("the parser always produces a SOURCE_FILE root")
    }

    /// Parse errors encountered during parsing.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Lexical errors collected by the scanner.
    pub fn lex_errors(&self) -> &[LexError] {
        &self.lex_errors
    }

    /// Whether scanning and parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty() && self.lex_errors.is_empty()
    }
}

/// Parse a Lunatico source file into a CST.
///
/// This is the main entry point for the parser. It tokenizes the source,
/// parses the token stream, and returns a [`Parse`] result containing the
/// syntax tree and any errors.
pub fn parse(source: &str) -> Parse {
    let (tokens, lex_errors) = luna_lexer::Lexer::tokenize(source);
    let mut parser = parser::Parser::new(tokens, source);
    parser::statements::parse_source_file(&mut parser);
    let (green, errors) = parser.build_tree();
    Parse {
        green,
        errors,
        lex_errors,
    }
}
