use ccc::driver::{compile_file, compile_source, front_end, CompileError};
use ccc::lexer::token::TerminalKind;
use ccc::lexer::{kinds_and_lexemes, tokenize_str, LexError};
use ccc::parser::ParseError;
use ccc::vm::VmError;

fn result_of(path: &str) -> (TerminalKind, String) {
    let compilation = compile_file(path).unwrap_or_else(|e| panic!("{}: {}", path, e));
    (compilation.result.kind, compilation.result.lexeme)
}

#[test]
fn test_precedence() {
    let tokens = tokenize_str("3+4*2;").unwrap();
    assert_eq!(
        kinds_and_lexemes(&tokens),
        vec![
            (TerminalKind::IntLiteral, "3"),
            (TerminalKind::ArithmeticOpPlus, "+"),
            (TerminalKind::IntLiteral, "4"),
            (TerminalKind::ArithmeticOpMult, "*"),
            (TerminalKind::IntLiteral, "2"),
            (TerminalKind::Semicolon, ";"),
        ]
    );
    assert!(tokens.last().is_some_and(|t| t.is_end_of_input()));

    assert_eq!(
        result_of("demos/precedence.c"),
        (TerminalKind::IntLiteral, "11".to_string())
    );
}

#[test]
fn test_grouping() {
    assert_eq!(
        result_of("demos/grouping.c"),
        (TerminalKind::IntLiteral, "14".to_string())
    );
}

#[test]
fn test_division_is_left_associative() {
    assert_eq!(
        result_of("demos/division_chain.c"),
        (TerminalKind::IntLiteral, "1".to_string())
    );
    assert_eq!(compile_source("1-2-3").unwrap().result.lexeme, "-4");
}

#[test]
fn test_float_promotion() {
    assert_eq!(
        result_of("demos/float_promotion.c"),
        (TerminalKind::FloatLiteral, "4.0".to_string())
    );
}

#[test]
fn test_multiline_input() {
    assert_eq!(
        result_of("demos/multiline.c"),
        (TerminalKind::IntLiteral, "1332".to_string())
    );
}

#[test]
fn test_assignment_lexes_but_does_not_parse() {
    let tokens = tokenize_str("x=1+2;").unwrap();
    assert_eq!(
        kinds_and_lexemes(&tokens),
        vec![
            (TerminalKind::Id, "x"),
            (TerminalKind::AssignmentOp, "="),
            (TerminalKind::IntLiteral, "1"),
            (TerminalKind::ArithmeticOpPlus, "+"),
            (TerminalKind::IntLiteral, "2"),
            (TerminalKind::Semicolon, ";"),
        ]
    );

    let err = compile_file("demos/assignment.c").unwrap_err();
    assert!(matches!(err, CompileError::Parse(ParseError::TableMiss { .. })));
    assert!(err.to_string().starts_with("Parse error"));
}

#[test]
fn test_unterminated_string_is_a_lex_error() {
    match front_end("demos/unterminated_string.c") {
        Err(CompileError::Lex(LexError::UnrecognizedInput { byte, location })) => {
            assert_eq!(byte, b'"');
            assert_eq!((location.line, location.column), (1, 5));
        }
        other => panic!("expected lex error, got {:?}", other.map(|t| t.render_levels())),
    }
}

#[test]
fn test_divide_by_zero() {
    let err = compile_file("demos/divide_by_zero.c").unwrap_err();
    assert!(matches!(err, CompileError::Vm(VmError::DivisionByZero { .. })));
}

#[test]
fn test_trailing_input() {
    assert!(matches!(
        compile_source("1 )"),
        Err(CompileError::Parse(ParseError::TrailingInput { .. }))
    ));
    assert!(matches!(
        compile_source("1;;"),
        Err(CompileError::Parse(ParseError::TrailingInput { .. }))
    ));
}

#[test]
fn test_missing_file() {
    let err = compile_file("demos/does_not_exist.c").unwrap_err();
    assert!(matches!(err, CompileError::Lex(LexError::Io { .. })));
    assert!(err.to_string().contains("does_not_exist.c"));
}

#[test]
fn test_trees_in_level_order() {
    let compilation = compile_source("3+4*2;").unwrap();
    assert_eq!(compilation.ast.render_levels(), "+(2)\n3(0) *(2)\n4(0) 2(0)");
    assert_eq!(
        compilation.syntax_tree.render_levels().lines().next(),
        Some("E(2)")
    );
}

#[test]
fn test_many_files_in_parallel() {
    let handles: Vec<_> = (0..8)
        .map(|i| std::thread::spawn(move || compile_source(&format!("{} * ({} + 1)", i, i))))
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let compilation = handle.join().unwrap().unwrap();
        assert_eq!(compilation.result.lexeme, (i * (i + 1)).to_string());
    }
}

#[test]
fn test_long_generated_chain() {
    let terms = 120_000;
    let source = format!("{}1;", "1+".repeat(terms - 1));
    let compilation = compile_source(&source).unwrap();
    assert_eq!(compilation.result.lexeme, terms.to_string());

    // left to right: 1 - 1 - ... - 1 - 0
    let source = format!("{}0;", "1-".repeat(terms - 1));
    let expected = 3 - terms as i64;
    assert_eq!(compile_source(&source).unwrap().result.lexeme, expected.to_string());
}

#[test]
fn test_deeply_nested_operand() {
    let depth = 50_000;
    let source = format!("2 * {}21{} - 1;", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(compile_source(&source).unwrap().result.lexeme, "41");
}
