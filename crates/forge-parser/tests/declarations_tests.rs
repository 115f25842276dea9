//! Declaration parsing tests across all fourteen forms, plus visibility,
//! attributes, generic constraints, and per-declaration error recovery.

#![allow(clippy::unwrap_used)]

mod common;

use forge_ast::{ConstraintKind, Declaration, DeclarationKind, Visibility};
use forge_diagnostics::WarningCode;
use forge_parser::{Dialect, ParseError, Parser};
use pretty_assertions::assert_eq;

fn parse_decl(source: &str) -> Declaration {
    let mut parser = Parser::new(common::forge_tokens(source), "decl.forge", Dialect::forge());
    parser.parse_declaration().unwrap()
}

fn decl_sexp(source: &str) -> String {
    parse_decl(source).to_sexp()
}

// ——— Simple forms ———

#[test]
fn namespace_declaration() {
    assert_eq!(decl_sexp("namespace Geo.Shapes"), "(namespace Geo.Shapes)");
}

#[test]
fn import_with_alias_and_specific_names() {
    assert_eq!(decl_sexp("import Core.Collections"), "(import Core.Collections)");
    assert_eq!(
        decl_sexp("import Core.Collections as Col (List, Dict)"),
        "(import Core.Collections as Col (List Dict))"
    );
}

#[test]
fn define_and_using() {
    assert_eq!(decl_sexp("define Int32 as I32"), "(define (type Int32) I32)");
    assert_eq!(
        decl_sexp("using Geo.Shapes.Circle as Round"),
        "(using (type Geo.Shapes.Circle) Round)"
    );
}

#[test]
fn preset_constant() {
    assert_eq!(
        decl_sexp("preset MAX_DEPTH: s32 = 64"),
        "(preset MAX_DEPTH (type s32) (integer 64))"
    );
}

// ——— Variables ———

#[test]
fn variable_with_nested_generic_type() {
    // The two closing `>` arrive as one right-shift token.
    assert_eq!(
        decl_sexp("var m: Dict<String, List<Int>> = none"),
        "(var m (type Dict (type String) (type List (type Int))) (none))"
    );
}

#[test]
fn let_is_immutable() {
    let decl = parse_decl("let name = \"forge\"");
    match decl.kind {
        DeclarationKind::Variable { mutable, .. } => assert!(!mutable),
        other => panic!("expected variable, got {other:?}"),
    }
}

#[test]
fn setter_visibility_may_be_more_restrictive() {
    let decl = parse_decl("public private(set) var count: Int = 0");
    match decl.kind {
        DeclarationKind::Variable { visibility, setter_visibility, .. } => {
            assert_eq!(visibility, Visibility::Public);
            assert_eq!(setter_visibility, Some(Visibility::Private));
        }
        other => panic!("expected variable, got {other:?}"),
    }
}

#[test]
fn looser_setter_visibility_is_rejected() {
    let mut parser = Parser::new(
        common::forge_tokens("private public(set) var x: Int = 0"),
        "vis.forge",
        Dialect::forge(),
    );
    let err = parser.parse_declaration().unwrap_err();
    assert!(matches!(err, ParseError::InvalidSetterVisibility { .. }));
}

// ——— Routines ———

#[test]
fn routine_with_body() {
    assert_eq!(
        decl_sexp("routine add(a: Int, b: Int) -> Int { return a + b }"),
        "(routine add ((a (type Int)) (b (type Int))) (type Int) (block (return (binary + (identifier a) (identifier b)))))"
    );
}

#[test]
fn empty_block_parses_to_empty_body() {
    assert_eq!(decl_sexp("routine noop() { }"), "(routine noop () (block))");
}

#[test]
fn namespace_qualified_routine_name_with_generics() {
    assert_eq!(
        decl_sexp("routine List<T>.push<U>(me, item: T) { pass }"),
        "(routine List<T>.push<U> ((me) (item (type T))) (block (pass)))"
    );
}

#[test]
fn failable_routine() {
    assert_eq!(
        decl_sexp("routine parse!(s: Text) -> s32 { absent }"),
        "(routine parse! ((s (type Text))) (type s32) (block (absent)))"
    );
}

#[test]
fn default_parameter_values() {
    let decl = parse_decl("routine pad(width: Int = 4) { pass }");
    match decl.kind {
        DeclarationKind::Routine { parameters, .. } => {
            assert!(parameters[0].default.is_some());
        }
        other => panic!("expected routine, got {other:?}"),
    }
}

#[test]
fn intrinsic_routine_is_signature_only() {
    let decl = parse_decl("@intrinsic\nroutine sqrt(x: F64) -> F64");
    match decl.kind {
        DeclarationKind::Routine { body, attributes, .. } => {
            assert!(body.is_none());
            assert_eq!(attributes[0].name, "intrinsic");
        }
        other => panic!("expected routine, got {other:?}"),
    }
}

#[test]
fn requires_clause_merges_with_inline_constraints() {
    let decl = parse_decl(
        "routine sort<T follows Orderable>(items: List<T>) requires T follows Copyable { pass }",
    );
    match decl.kind {
        DeclarationKind::Routine { constraints, .. } => {
            assert_eq!(constraints.len(), 1);
            assert_eq!(constraints[0].param, "T");
            assert_eq!(constraints[0].kinds.len(), 2);
        }
        other => panic!("expected routine, got {other:?}"),
    }
}

#[test]
fn undeclared_constraint_parameter_is_rejected() {
    let mut parser = Parser::new(
        common::forge_tokens("routine f<T>(x: T) requires Z follows P { pass }"),
        "gen.forge",
        Dialect::forge(),
    );
    let err = parser.parse_declaration().unwrap_err();
    assert!(matches!(err, ParseError::UndeclaredGenericParameter { name, .. } if name == "Z"));
}

#[test]
fn legacy_where_clause_warns_outside_cake() {
    let mut parser = Parser::new(
        common::forge_tokens("routine f<T>(x: T) where T follows P { pass }"),
        "gen.forge",
        Dialect::forge(),
    );
    parser.parse_declaration().unwrap();
    assert_eq!(parser.warnings()[0].code, WarningCode::LegacyWhereClause);
}

#[test]
fn variadic_is_rejected_outside_imported() {
    let mut parser = Parser::new(
        common::forge_tokens("routine log(items: Text, ...) { pass }"),
        "var.forge",
        Dialect::forge(),
    );
    assert!(parser.parse_declaration().is_err());
}

// ——— Type declarations ———

#[test]
fn entity_with_base_protocols_and_members() {
    assert_eq!(
        decl_sexp(
            "entity Circle from Shape follows Drawable {\n    var radius: F64\n    routine area(me) -> F64 { return radius }\n}"
        ),
        "(entity Circle (var radius (type F64)) (routine area ((me)) (type F64) (block (return (identifier radius)))))"
    );
}

#[test]
fn record_and_resident_share_the_outline() {
    assert_eq!(
        decl_sexp("record Point {\n    var x: F64\n    var y: F64\n}"),
        "(record Point (var x (type F64)) (var y (type F64)))"
    );
    assert_eq!(
        decl_sexp("resident Registry {\n    var entries: Int\n}"),
        "(resident Registry (var entries (type Int)))"
    );
}

#[test]
fn entity_base_and_protocols_are_recorded() {
    let decl = parse_decl("entity Circle from Shape follows Drawable, Comparable { }");
    match decl.kind {
        DeclarationKind::Entity { base_class, protocols, .. } => {
            assert_eq!(base_class.map(|ty| ty.name), Some("Shape".to_string()));
            assert_eq!(protocols.len(), 2);
        }
        other => panic!("expected entity, got {other:?}"),
    }
}

// ——— Choice ———

#[test]
fn choice_with_values_and_methods() {
    let decl = parse_decl(
        "choice Color {\n    RED = 1,\n    GREEN,\n    BLUE = -2\n    routine describe(me) -> Text { return label }\n}",
    );
    assert_eq!(decl.to_sexp(), "(choice Color (RED 1) (GREEN) (BLUE -2))");
    match decl.kind {
        DeclarationKind::Choice { methods, .. } => assert_eq!(methods.len(), 1),
        other => panic!("expected choice, got {other:?}"),
    }
}

// ——— Variant ———

#[test]
fn variant_with_associated_types() {
    assert_eq!(
        decl_sexp("variant Shape<T> {\n    Circle(F64),\n    Square(F64),\n    Empty\n}"),
        "(variant Shape (Circle (type F64)) (Square (type F64)) (Empty))"
    );
}

#[test]
fn mutant_keeps_its_kind() {
    assert_eq!(
        decl_sexp("mutant Register {\n    Value(U64),\n    Empty\n}"),
        "(mutant Register (Value (type U64)) (Empty))"
    );
}

#[test]
fn chimera_warns_outside_cake() {
    let mut parser = Parser::new(
        common::forge_tokens("chimera Buffer {\n    Bytes(Text)\n}"),
        "legacy.forge",
        Dialect::forge(),
    );
    let decl = parser.parse_declaration().unwrap();
    assert_eq!(decl.to_sexp(), "(chimera Buffer (Bytes (type Text)))");
    assert_eq!(parser.warnings()[0].code, WarningCode::DeprecatedKeyword);
}

// ——— Protocol ———

#[test]
fn protocol_with_signatures_and_required_fields() {
    assert_eq!(
        decl_sexp("protocol Drawable {\n    routine draw(me)\n    var color: Color\n}"),
        "(protocol Drawable (field color (type Color)) (routine draw ((me))))"
    );
}

#[test]
fn protocol_parents() {
    let decl = parse_decl("protocol Shape follows Drawable, Measurable { }");
    match decl.kind {
        DeclarationKind::Protocol { parent_protocols, .. } => {
            assert_eq!(parent_protocols.len(), 2);
        }
        other => panic!("expected protocol, got {other:?}"),
    }
}

// ——— Imported / FFI ———

#[test]
fn imported_routine_with_variadic() {
    assert_eq!(
        decl_sexp("imported(\"C\") routine printf(fmt: Text8, ...) -> s32"),
        "(imported printf ((fmt (type Text8))) ... (type s32))"
    );
}

#[test]
fn imported_defaults_to_c_convention() {
    let decl = parse_decl("imported routine exit(code: s32)");
    match decl.kind {
        DeclarationKind::Imported { calling_convention, variadic, .. } => {
            assert_eq!(calling_convention, "C");
            assert!(!variadic);
        }
        other => panic!("expected imported, got {other:?}"),
    }
}

// ——— Attributes ———

#[test]
fn attribute_with_arguments() {
    let decl = parse_decl("@inline(always)\nroutine fast() { pass }");
    match decl.kind {
        DeclarationKind::Routine { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].name, "inline");
            assert_eq!(attributes[0].args.len(), 1);
        }
        other => panic!("expected routine, got {other:?}"),
    }
}

// ——— Recovery ———

#[test]
fn one_bad_declaration_does_not_hide_the_next() {
    let mut parser = Parser::new(
        common::forge_tokens("entity { }\nroutine ok() { pass }"),
        "recover.forge",
        Dialect::forge(),
    );
    let program = parser.parse_program();
    assert_eq!(program.declarations.len(), 1);
    assert_eq!(program.declarations[0].to_sexp(), "(routine ok () (block (pass)))");
}

#[test]
fn type_alias_feeds_the_generic_call_heuristic() {
    // A lowercase alias from `define` counts as type-like in the
    // generic-argument lookahead.
    let mut parser = Parser::new(
        common::forge_tokens("define Vector as vec\nlet v = make<vec>(0)"),
        "alias.forge",
        Dialect::forge(),
    );
    let program = parser.parse_program();
    assert_eq!(program.declarations.len(), 2);
    assert_eq!(
        program.declarations[1].to_sexp(),
        "(let v (generic_call (identifier make) ((type vec)) (integer 0)))"
    );
}

#[test]
fn recipe_warns_outside_cake_but_still_parses() {
    let mut parser = Parser::new(
        common::forge_tokens("recipe greet() { pass }"),
        "legacy.forge",
        Dialect::forge(),
    );
    let decl = parser.parse_declaration().unwrap();
    assert_eq!(decl.to_sexp(), "(routine greet () (block (pass)))");
    assert_eq!(parser.warnings()[0].code, WarningCode::DeprecatedKeyword);
}
