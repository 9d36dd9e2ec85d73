use fstroke::syntax::{Error, Parser, Tree};

fn parse(source: &str) -> Tree {
    Parser::new(source).unwrap().parse().unwrap()
}

fn parse_err(source: &str) -> Error {
    Parser::new(source).and_then(|mut p| p.parse()).unwrap_err()
}

fn atom(name: &str) -> Tree {
    Tree::Atom(name.to_string())
}

fn literal(digits: &str) -> Tree {
    Tree::Literal(digits.to_string())
}

#[test]
fn test_parse_01() {
    assert_eq!(
        parse("(prog ((return 42)))"),
        Tree::Program(vec![Tree::List(vec![
            atom("prog"),
            Tree::List(vec![Tree::List(vec![atom("return"), literal("42")])]),
        ])])
    );
}

#[test]
fn test_parse_02() {
    // Identifiers are case-insensitive, normalized to lower case
    assert_eq!(parse("(PROG ((Return 42)))"), parse("(prog ((return 42)))"));
}

#[test]
fn test_parse_03() {
    // Newlines and tabs read as spaces
    assert_eq!(parse("(plus\n\t1  2)"), parse("(plus 1 2)"));
}

#[test]
fn test_parse_04() {
    // Identifiers may contain digits after the first letter
    assert_eq!(parse("x1"), Tree::Program(vec![atom("x1")]));
}

#[test]
fn test_parse_05() {
    // An empty input is an empty program
    assert_eq!(parse("  "), Tree::Program(vec![]));
}

#[test]
fn test_parse_06() {
    assert_eq!(
        parse("(a (b c) 1)"),
        Tree::Program(vec![Tree::List(vec![
            atom("a"),
            Tree::List(vec![atom("b"), atom("c")]),
            literal("1"),
        ])])
    );
}

#[test]
fn test_parse_07() {
    assert_eq!(parse_err("(prog @)"), Error::UnexpectedCharacter(6));
}

#[test]
fn test_parse_08() {
    assert_eq!(parse_err("(prog ((return 1))"), Error::UnexpectedEof);
}

#[test]
fn test_parse_09() {
    assert_eq!(parse_err(") (prog)"), Error::UnexpectedRightParen(0));
}

#[test]
fn test_parse_10() {
    // Literals keep their digits verbatim; range checking happens at
    // code generation
    assert_eq!(
        parse("115792089237316195423570985008687907853269984665640564039457584007913129639936"),
        Tree::Program(vec![literal(
            "115792089237316195423570985008687907853269984665640564039457584007913129639936"
        )])
    );
}
