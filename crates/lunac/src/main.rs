//! The Lunatico front-end CLI.
//!
//! `lunac [--debug] [--lexer] <arquivo.lua>`
//!
//! - `--lexer` stops after scanning and prints the token stream.
//! - `--debug` emits the per-token lexer trace and per-production parser
//!   trace to stdout.
//! - The default pipeline lexes, parses, prints the AST, runs semantic
//!   analysis, prints the AST again, and reports success.
//!
//! Every error is reported to stderr and exits non-zero; the first error
//! wins, there is no recovery.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use luna_common::error::LexError;
use luna_common::span::{line_col, Span};
use luna_common::token::{Token, TokenKind};
use luna_parser::dump::dump_ast;
use luna_parser::ParseError;

#[derive(Parser)]
#[command(name = "lunac", version, about = "Analisador léxico, sintático e semântico para Lunatico")]
struct Cli {
    /// Emite o rastreamento do lexer e do parser em stdout
    #[arg(long)]
    debug: bool,

    /// Para após a análise léxica e imprime cada token
    #[arg(long)]
    lexer: bool,

    /// Arquivo fonte (.lua)
    file: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stdout)
            .with_ansi(false)
            .init();
    }

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Erro ao abrir o arquivo: {err}");
            process::exit(1);
        }
    };

    let code = if cli.lexer {
        run_lexer(&source)
    } else {
        run_pipeline(&source)
    };
    process::exit(code);
}

/// `--lexer`: print the token stream, then report the first lexical error
/// if the scanner collected any.
fn run_lexer(source: &str) -> i32 {
    let (tokens, lex_errors) = luna_lexer::Lexer::tokenize(source);

    for token in &tokens {
        let pos = line_col(source, token.span.start);
        println!(
            "Token(Type: {}, Value: '{}', Line: {}, Column: {})",
            token.kind,
            lexeme_of(source, token),
            pos.line,
            pos.column
        );
    }

    match lex_errors.first() {
        Some(err) => {
            report_lex_error(source, err);
            1
        }
        None => 0,
    }
}

/// The printable lexeme of a token: strings drop their quotes, end of
/// input prints as `EOF`.
fn lexeme_of<'a>(source: &'a str, token: &Token) -> &'a str {
    let text = &source[token.span.start as usize..token.span.end as usize];
    match token.kind {
        TokenKind::Eof => "EOF",
        TokenKind::String if text.len() >= 2 => &text[1..text.len() - 1],
        _ => text,
    }
}

/// The default pipeline: parse, print the AST, check, print it again.
fn run_pipeline(source: &str) -> i32 {
    let parse = luna_parser::parse(source);

    if let Some(err) = parse.lex_errors().first() {
        report_lex_error(source, err);
        return 1;
    }
    if let Some(err) = parse.errors().first() {
        report_parse_error(source, err);
        return 1;
    }

    let tree = parse.tree();
    print!("{}", dump_ast(&tree));

    let typeck = luna_typeck::check(&parse);
    if let Some(err) = typeck.errors.first() {
        eprint!("{}", luna_typeck::diagnostics::render_diagnostic(err, source));
        return 1;
    }

    print!("{}", dump_ast(&tree));
    println!("Análise semântica concluída com sucesso.");
    0
}

// ── Error reporting ────────────────────────────────────────────────────

fn report_lex_error(source: &str, err: &LexError) {
    let pos = line_col(source, err.span.start);
    let message = format!(
        "Erro léxico: {} na linha {}, coluna {}",
        err.kind, pos.line, pos.column
    );
    report(source, err.span, &message);
}

fn report_parse_error(source: &str, err: &ParseError) {
    let pos = line_col(source, err.span.start);
    let message = format!(
        "Erro de sintaxe: {} na linha {}, coluna {}",
        err.message, pos.line, pos.column
    );
    report(source, err.span, &message);
}

/// Render one labeled ariadne report to stderr.
fn report(source: &str, span: Span, message: &str) {
    use ariadne::{Config, Label, Report, ReportKind, Source};

    let len = source.len();
    if len == 0 {
        eprintln!("{message}");
        return;
    }

    // Clamp to the source and keep the span at least one character wide.
    let mut start = (span.start as usize).min(len.saturating_sub(1));
    let mut end = (span.end as usize).min(len);
    if end <= start {
        start = start.min(len.saturating_sub(1));
        end = start + 1;
    }

    let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
        .with_config(Config::default().with_color(false))
        .with_message(message)
        .with_label(Label::new(start..end).with_message("aqui"))
        .finish()
        .eprint(Source::from(source));
}
