mod common;

use bfcc::{
    lexer::scan,
    parser::{parse, printer, AstKind, ParseError},
};

use common::{parse_source, HELLO_WORLD};

fn parse_and_print(source: &str) -> String {
    printer::print(&parse_source(source))
}

#[test]
fn hello_world_round_trips() {
    assert_eq!(parse_and_print(HELLO_WORLD), HELLO_WORLD.replace('\n', ""));
}

#[test]
fn all_commands_round_trip() {
    assert_eq!(parse_and_print("[+-]<>,."), "[+-]<>,.");
}

#[test]
fn non_commands_are_ignored() {
    assert_eq!(parse_and_print("Hello [+-]<>,. World!"), "[+-]<>,.");
}

#[test]
fn zero_idiom_prints_canonically() {
    assert_eq!(parse_source("[-]").body.instructions, vec![AstKind::Zero]);
    assert_eq!(parse_and_print(",[-]"), ",[+]");
}

#[test]
fn errors_carry_the_line() {
    assert_eq!(
        parse(&scan("+\n-\n]")).unwrap_err(),
        ParseError::new("Unexpected ']'.", 3)
    );
    let err = parse(&scan("[[]\n")).unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.to_string(), "Error encountered on line 2: Expected matching ']'.");
}
