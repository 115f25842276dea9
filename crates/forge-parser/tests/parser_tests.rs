//! End-to-end parser tests: statements, `when` clauses, dialect drivers,
//! the indentation machine, style warnings, and error recovery.

#![allow(clippy::unwrap_used)]

mod common;

use forge_ast::{DeclarationKind, Statement};
use forge_diagnostics::WarningCode;
use forge_parser::{parse_cake, parse_forge, parse_suflae, Dialect, Parser};
use forge_token::TokenKind;
use pretty_assertions::assert_eq;

fn parse_stmt(source: &str) -> Statement {
    let mut parser = Parser::new(common::forge_tokens(source), "stmt.forge", Dialect::forge());
    parser.parse_statement().unwrap()
}

fn stmt_sexp(source: &str) -> String {
    parse_stmt(source).to_sexp()
}

// ——— Test-lexer sanity ———

#[test]
fn tokenizer_emits_expected_kinds() {
    let tokens = common::forge_tokens("a < b");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Less,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizer_synthesizes_indent_structure() {
    let tokens = common::indent_tokens("while go:\n    pass\n");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::While,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent,
            TokenKind::Pass,
            TokenKind::Newline,
            TokenKind::Dedent,
            TokenKind::Eof,
        ]
    );
}

// ——— Control flow ———

#[test]
fn if_elseif_else_chains_by_nesting() {
    assert_eq!(
        stmt_sexp("if a { pass } elseif b { pass } else { pass }"),
        "(if (identifier a) (block (pass)) (if (identifier b) (block (pass)) (block (pass))))"
    );
}

#[test]
fn unless_negates_the_condition() {
    assert_eq!(stmt_sexp("unless done { pass }"), "(if (unary not (identifier done)) (block (pass)))");
}

#[test]
fn while_and_loop() {
    assert_eq!(stmt_sexp("while running { pass }"), "(while (identifier running) (block (pass)))");
    assert_eq!(stmt_sexp("loop { pass }"), "(while (bool true) (block (pass)))");
}

#[test]
fn for_over_range() {
    assert_eq!(
        stmt_sexp("for i in 1 to 10 { pass }"),
        "(for i (range to (integer 1) (integer 10)) (block (pass)))"
    );
}

#[test]
fn control_transfer_statements() {
    assert_eq!(stmt_sexp("return"), "(return)");
    assert_eq!(stmt_sexp("return x + 1"), "(return (binary + (identifier x) (integer 1)))");
    assert_eq!(stmt_sexp("break"), "(break)");
    assert_eq!(stmt_sexp("continue"), "(continue)");
    assert_eq!(stmt_sexp("throw failure"), "(throw (identifier failure))");
    assert_eq!(stmt_sexp("absent"), "(absent)");
    assert_eq!(stmt_sexp("pass"), "(pass)");
}

// ——— Scoped-access statements ———

#[test]
fn viewing_and_hijacking_take_source_as_handle() {
    assert_eq!(
        stmt_sexp("viewing buffer as view { pass }"),
        "(viewing (identifier buffer) view (block (pass)))"
    );
    assert_eq!(
        stmt_sexp("hijacking buffer as grip { pass }"),
        "(hijacking (identifier buffer) grip (block (pass)))"
    );
}

#[test]
fn inspecting_and_seizing_take_handle_from_source() {
    assert_eq!(
        stmt_sexp("inspecting view from buffer { pass }"),
        "(inspecting view (identifier buffer) (block (pass)))"
    );
    assert_eq!(
        stmt_sexp("seizing grip from buffer { pass }"),
        "(seizing grip (identifier buffer) (block (pass)))"
    );
}

#[test]
fn danger_and_mayhem_blocks() {
    assert_eq!(stmt_sexp("danger! { pass }"), "(danger (block (pass)))");
    assert_eq!(stmt_sexp("mayhem! { pass }"), "(mayhem (block (pass)))");
}

// ——— Bindings ———

#[test]
fn variable_statement() {
    assert_eq!(stmt_sexp("var x: Int = 5"), "(var x (type Int) (integer 5))");
}

#[test]
fn destructuring_let() {
    // Positional `x`, renamed `y` to `py`.
    assert_eq!(
        stmt_sexp("let (x, y: py) = point"),
        "(destructuring_let (destructuring (x) (y: py)) (identifier point))"
    );
}

#[test]
fn destructuring_var_is_mutable() {
    assert_eq!(
        stmt_sexp("var (a, b) = pair"),
        "(destructuring_var (destructuring (a) (b)) (identifier pair))"
    );
}

// ——— `when` ———

#[test]
fn when_with_type_pattern_binding_and_guard() {
    let source = "when x {\n    is Circle c if c.radius > 0 => area(c),\n    is Square => 0,\n    else => -1\n}";
    assert_eq!(
        stmt_sexp(source),
        "(when (identifier x) \
         (clause (guard (type_pattern (type Circle) c) (binary > (member (identifier c) radius) (integer 0))) \
         (expression_statement (call (identifier area) (identifier c)))) \
         (clause (type_pattern (type Square)) (expression_statement (integer 0))) \
         (clause (wildcard) (expression_statement (integer -1))))"
    );
}

#[test]
fn when_with_only_an_else_clause() {
    assert_eq!(
        stmt_sexp("when x { else => 0 }"),
        "(when (identifier x) (clause (wildcard) (expression_statement (integer 0))))"
    );
}

#[test]
fn when_else_may_bind_a_name() {
    assert_eq!(
        stmt_sexp("when x { else other => other }"),
        "(when (identifier x) (clause (binding other) (expression_statement (identifier other))))"
    );
}

#[test]
fn when_without_subject_accepts_expression_patterns() {
    assert_eq!(
        stmt_sexp("when { not done => pass, else => pass }"),
        "(when (clause (expr_pattern (unary not (identifier done))) (pass)) (clause (wildcard) (pass)))"
    );
}

#[test]
fn when_literal_patterns() {
    assert_eq!(
        stmt_sexp("when n { 0 => pass, -1 => pass, else => pass }"),
        "(when (identifier n) (clause (literal_pattern (integer 0)) (pass)) \
         (clause (literal_pattern (integer -1)) (pass)) (clause (wildcard) (pass)))"
    );
}

// ——— Dialect drivers ———

#[test]
fn indented_routine_parses() {
    let source = "routine add(a: Int, b: Int) -> Int:\n    return a + b\n";
    let (program, warnings) = parse_suflae(common::indent_tokens(source), "add.suflae");
    assert!(warnings.is_empty());
    assert_eq!(
        program.to_sexp(),
        "(program (routine add ((a (type Int)) (b (type Int))) (type Int) \
         (block (return (binary + (identifier a) (identifier b))))))"
    );
}

#[test]
fn all_three_dialects_produce_the_same_tree() {
    let (forge, _) = parse_forge(
        common::forge_tokens("routine add(a: Int, b: Int) -> Int { return a + b }"),
        "add.forge",
    );
    let (suflae, _) = parse_suflae(
        common::indent_tokens("routine add(a: Int, b: Int) -> Int:\n    return a + b\n"),
        "add.suflae",
    );
    let (cake, _) = parse_cake(
        common::indent_tokens("recipe add(a: Int, b: Int) -> Int:\n    return a + b\n"),
        "add.cake",
    );
    assert_eq!(forge.to_sexp(), suflae.to_sexp());
    assert_eq!(suflae.to_sexp(), cake.to_sexp());
}

#[test]
fn cake_display_sugar_is_a_plain_call() {
    let (program, warnings) = parse_cake(
        common::indent_tokens("recipe greet(name: Text):\n    display(name)\n"),
        "greet.cake",
    );
    assert!(warnings.is_empty());
    assert_eq!(
        program.to_sexp(),
        "(program (routine greet ((name (type Text))) \
         (block (expression_statement (call (identifier display) (identifier name))))))"
    );
}

#[test]
fn display_outside_cake_draws_a_deprecation_warning() {
    let mut parser = Parser::new(
        common::forge_tokens("display(x)"),
        "legacy.forge",
        Dialect::forge(),
    );
    parser.parse_statement().unwrap();
    assert_eq!(parser.warnings()[0].code, WarningCode::DeprecatedKeyword);
}

#[test]
fn step_outside_cake_draws_a_deprecation_warning() {
    let source = "for i in 1 to 10 step 2:\n    pass\n";
    let (_, warnings) = parse_suflae(common::indent_tokens(source), "step.suflae");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, WarningCode::DeprecatedKeyword);
}

// ——— Indentation machine ———

#[test]
fn indents_and_dedents_balance() {
    // Every Indent consumed must be matched by exactly one Dedent.
    let source = "entity Circle:\n    routine area(me) -> F64:\n        return r\n";
    let mut parser = Parser::new(common::indent_tokens(source), "bal.suflae", Dialect::suflae());
    let program = parser.parse_program();
    assert_eq!(program.declarations.len(), 1);
    let (indents, dedents) = parser.indent_balance();
    assert!(indents > 0);
    assert_eq!(indents, dedents);
}

#[test]
fn stray_closing_brace_draws_ck001() {
    let source = "routine f():\n    pass\n    }\n";
    let (program, warnings) = parse_suflae(common::indent_tokens(source), "ck.suflae");
    assert_eq!(program.declarations.len(), 1);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, WarningCode::UnnecessaryClosingBrace);
}

#[test]
fn parenthesized_condition_draws_st001_in_indent_dialects() {
    let source = "routine f():\n    if (ready):\n        pass\n";
    let (_, warnings) = parse_suflae(common::indent_tokens(source), "st.suflae");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, WarningCode::CStyleSyntax);
}

// ——— Boundary behaviors ———

#[test]
fn empty_program_still_produces_a_program_node() {
    let (program, warnings) = parse_forge(common::forge_tokens(""), "empty.forge");
    assert!(program.declarations.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn nested_generics_eight_levels_deep() {
    let source = "var m: L1<L2<L3<L4<L5<L6<L7<L8<T>>>>>>>> = none";
    let mut parser = Parser::new(common::forge_tokens(source), "deep.forge", Dialect::forge());
    let decl = parser.parse_declaration().unwrap();
    match decl.kind {
        DeclarationKind::Variable { ty: Some(ty), .. } => {
            assert_eq!(ty.nesting_depth(), 9);
        }
        other => panic!("expected typed variable, got {other:?}"),
    }
}

// ——— Location fidelity ———

#[test]
fn locations_point_into_the_parsed_file() {
    // Node locations point into the file they were parsed from.
    let source = "routine add(a: Int, b: Int) -> Int:\n    return a + b\n";
    let (program, _) = parse_suflae(common::indent_tokens(source), "add.suflae");
    let routine = &program.declarations[0];
    assert_eq!(&*routine.location.file, "add.suflae");
    assert_eq!(routine.location.line, 1);

    let DeclarationKind::Routine { body: Some(body), .. } = &routine.kind else {
        panic!("expected routine with body");
    };
    let forge_ast::StatementKind::Block(statements) = &body.kind else {
        panic!("expected block body");
    };
    assert_eq!(statements[0].location.line, 2);
    assert_eq!(statements[0].location.column, 5);
}
