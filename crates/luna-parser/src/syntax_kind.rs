//! SyntaxKind enum for the Lunatico CST.
//!
//! The scanner's token vocabulary is deliberately coarse (one `Operator`
//! kind, one `Keyword` kind); the CST wants fine-grained leaves, so
//! [`SyntaxKind::from_token`] refines a token by its lexeme. Composite node
//! kinds represent parser-produced tree nodes. The first two values are
//! sentinels used by the event-based parser.

use luna_common::token::TokenKind;

/// Every kind of syntax element in the Lunatico CST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for incomplete/unfinished parser events.
    TOMBSTONE = 0,
    /// Wrapper for tokens that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Keywords (9) ───────────────────────────────────────────────────
    IF_KW,
    THEN_KW,
    ELSE_KW,
    END_KW,
    FUNCTION_KW,
    LOCAL_KW,
    RETURN_KW,
    WHILE_KW,
    DO_KW,

    // ── Operators (14) ─────────────────────────────────────────────────
    /// `+`
    PLUS,
    /// `-`
    MINUS,
    /// `*`
    STAR,
    /// `/`
    SLASH,
    /// `%`
    PERCENT,
    /// `=`
    EQ,
    /// `==`
    EQ_EQ,
    /// `~=`
    TILDE_EQ,
    /// `<`
    LT,
    /// `>`
    GT,
    /// `<=`
    LT_EQ,
    /// `>=`
    GT_EQ,
    /// `..`
    CONCAT,
    /// `...`
    ELLIPSIS,

    // ── Delimiters and punctuation (7) ─────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACE,
    R_BRACE,
    COMMA,
    SEMICOLON,
    COLON,

    // ── Literals, identifiers, special (5) ─────────────────────────────
    NUMBER,
    STRING,
    IDENT,
    EOF,
    /// Scanner-level garbage (unknown character, unterminated string, or
    /// an operator lexeme with no syntax kind of its own, e.g. a lone `~`).
    ERROR,

    // ── Composite node kinds ───────────────────────────────────────────
    /// Root node: the top-level statement block of a program.
    SOURCE_FILE,
    /// Statement block inside `if`/`while`/`function`.
    BLOCK,
    /// `if cond then block [else block] end`
    IF_STMT,
    /// The `else` arm of an if statement.
    ELSE_BRANCH,
    /// `while cond do block end`
    WHILE_STMT,
    /// `function name(params) block end`
    FN_DECL,
    /// `(a, b, c)` in a function declaration.
    PARAM_LIST,
    /// Single parameter in a parameter list.
    PARAM,
    /// `return [expr]`
    RETURN_STMT,
    /// `local name [: type] [= expr]`
    VAR_DECL,
    /// `: typename` on a variable declaration.
    TYPE_ANNOTATION,
    /// `name = expr`
    ASSIGN_STMT,
    /// `name(args)`
    CALL_EXPR,
    /// `(a, b, c)` at a call site.
    ARG_LIST,
    /// `a + b`, `a == b`, ...
    BINARY_EXPR,
    /// `(expr)` grouping.
    PAREN_EXPR,
    /// Number or string literal.
    LITERAL,
    /// Name in a definition position (function, parameter, declaration).
    NAME,
    /// Identifier used as an expression or assignment/call target.
    NAME_REF,
}

impl SyntaxKind {
    /// Refine a coarse scanner token into a CST leaf kind.
    ///
    /// Keywords and operators are dispatched on their lexeme; everything
    /// else maps 1:1. Lexemes the grammar has no use for (`..`-adjacent
    /// forms aside, e.g. a lone `~`) fall back to `ERROR`.
    pub fn from_token(kind: TokenKind, text: &str) -> SyntaxKind {
        match kind {
            TokenKind::Eof => SyntaxKind::EOF,
            TokenKind::Number => SyntaxKind::NUMBER,
            TokenKind::String => SyntaxKind::STRING,
            TokenKind::Identifier => SyntaxKind::IDENT,
            TokenKind::ParenOpen => SyntaxKind::L_PAREN,
            TokenKind::ParenClose => SyntaxKind::R_PAREN,
            TokenKind::BraceOpen => SyntaxKind::L_BRACE,
            TokenKind::BraceClose => SyntaxKind::R_BRACE,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Unknown => SyntaxKind::ERROR,
            TokenKind::Keyword => match text {
                "if" => SyntaxKind::IF_KW,
                "then" => SyntaxKind::THEN_KW,
                "else" => SyntaxKind::ELSE_KW,
                "end" => SyntaxKind::END_KW,
                "function" => SyntaxKind::FUNCTION_KW,
                "local" => SyntaxKind::LOCAL_KW,
                "return" => SyntaxKind::RETURN_KW,
                "while" => SyntaxKind::WHILE_KW,
                "do" => SyntaxKind::DO_KW,
                _ => SyntaxKind::ERROR,
            },
            TokenKind::Operator => match text {
                "+" => SyntaxKind::PLUS,
                "-" => SyntaxKind::MINUS,
                "*" => SyntaxKind::STAR,
                "/" => SyntaxKind::SLASH,
                "%" => SyntaxKind::PERCENT,
                "=" => SyntaxKind::EQ,
                "==" => SyntaxKind::EQ_EQ,
                "~=" => SyntaxKind::TILDE_EQ,
                "<" => SyntaxKind::LT,
                ">" => SyntaxKind::GT,
                "<=" => SyntaxKind::LT_EQ,
                ">=" => SyntaxKind::GT_EQ,
                ".." => SyntaxKind::CONCAT,
                "..." => SyntaxKind::ELLIPSIS,
                _ => SyntaxKind::ERROR,
            },
        }
    }

    /// Whether this kind is a binary operator leaf.
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::PLUS
                | SyntaxKind::MINUS
                | SyntaxKind::STAR
                | SyntaxKind::SLASH
                | SyntaxKind::PERCENT
                | SyntaxKind::EQ_EQ
                | SyntaxKind::TILDE_EQ
                | SyntaxKind::LT
                | SyntaxKind::GT
                | SyntaxKind::LT_EQ
                | SyntaxKind::GT_EQ
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_refine_by_lexeme() {
        assert_eq!(
            SyntaxKind::from_token(TokenKind::Keyword, "if"),
            SyntaxKind::IF_KW
        );
        assert_eq!(
            SyntaxKind::from_token(TokenKind::Keyword, "local"),
            SyntaxKind::LOCAL_KW
        );
    }

    #[test]
    fn operators_refine_by_lexeme() {
        assert_eq!(
            SyntaxKind::from_token(TokenKind::Operator, "=="),
            SyntaxKind::EQ_EQ
        );
        assert_eq!(
            SyntaxKind::from_token(TokenKind::Operator, "~="),
            SyntaxKind::TILDE_EQ
        );
        assert_eq!(
            SyntaxKind::from_token(TokenKind::Operator, "="),
            SyntaxKind::EQ
        );
    }

    #[test]
    fn unknown_operator_lexeme_is_error() {
        assert_eq!(
            SyntaxKind::from_token(TokenKind::Operator, "~"),
            SyntaxKind::ERROR
        );
    }

    #[test]
    fn roundtrip_through_rowan_raw() {
        use rowan::Language;
        let kind = SyntaxKind::BINARY_EXPR;
        let raw = crate::cst::LunaLanguage::kind_to_raw(kind);
        assert_eq!(crate::cst::LunaLanguage::kind_from_raw(raw), kind);
    }
}
