// Integration tests for the parser

use offside::{parse, parse_with, Node, NodeKind, ParseOptions, Phase, Recovery, Scalar};

/// Parse and insist on a clean result
fn parse_clean(source: &str) -> Node {
    let output = parse(source);
    assert!(output.errors.is_empty(), "Unexpected errors: {:?}", output.errors);
    output.module
}

fn kinds(nodes: &[Node]) -> Vec<NodeKind> {
    nodes.iter().map(Node::kind).collect()
}

#[test]
fn test_function_definition() {
    let source = r#"
def f(a, b):
    return a + b
"#;

    let module = parse_clean(source);
    assert!(module.is(NodeKind::Module));
    assert_eq!(module.children().len(), 1);

    let def = &module.children()[0];
    assert!(def.is(NodeKind::FunctionDef));
    assert_eq!(def.text(), Some("f"));

    let params = def.child(0).unwrap();
    let names: Vec<&str> = params.children().iter().filter_map(Node::text).collect();
    assert_eq!(names, vec!["a", "b"]);

    let suite = def.child(1).unwrap();
    assert!(suite.is(NodeKind::Suite));
    assert_eq!(suite.children().len(), 1);

    let ret = &suite.children()[0];
    assert!(ret.is(NodeKind::Return));
    let sum = ret.child(0).unwrap();
    assert!(sum.is(NodeKind::BinaryOp));
    assert_eq!(sum.text(), Some("+"));
    assert_eq!(kinds(sum.children()), vec![NodeKind::Identifier, NodeKind::Identifier]);
}

#[test]
fn test_if_else() {
    let module = parse_clean("if x == 1:\n    y = 2\nelse:\n    y = 3\n");
    let node = &module.children()[0];

    assert!(node.is(NodeKind::If));
    assert_eq!(
        kinds(node.children()),
        vec![NodeKind::Comparison, NodeKind::Suite, NodeKind::Else]
    );
    assert_eq!(node.children()[0].text(), Some("=="));

    let else_branch = &node.children()[2];
    assert_eq!(kinds(else_branch.children()), vec![NodeKind::Suite]);
    let assign = &else_branch.children()[0].children()[0];
    assert!(assign.is(NodeKind::Assignment));
    assert_eq!(assign.child(1).and_then(Node::value), Some(&Scalar::Int(3)));
}

#[test]
fn test_program_with_loops_and_calls() {
    let source = r#"
def fibonacci(n):
    if n == 1 or n == 2:
        return 1
    return fibonacci(n - 1) + fibonacci(n - 2)

total = 0
for i in range(10):
    if i % 2 == 0:
        continue
    total += fibonacci(i)
while total > 100:
    total //= 2
print("total:", total)
"#;

    let module = parse_clean(source);
    assert_eq!(
        kinds(module.children()),
        vec![
            NodeKind::FunctionDef,
            NodeKind::Assignment,
            NodeKind::For,
            NodeKind::While,
            NodeKind::ExpressionStmt,
        ]
    );

    let for_loop = &module.children()[2];
    let iterable = for_loop.child(1).unwrap();
    assert!(iterable.is(NodeKind::Call));
    assert_eq!(iterable.child(0).and_then(Node::text), Some("range"));
}

#[test]
fn test_trailing_comma_is_ignored() {
    let with = parse_clean("x = [1, 2,]\n");
    let without = parse_clean("x = [1, 2]\n");
    assert!(with.same_shape(&without));
}

#[test]
fn test_inline_and_multiline_literals_match() {
    let cases = [
        ("x = [1, 2, 3]\n", "x = [\n    1,\n    2,\n    3,\n]\n"),
        (
            "x = {'a': 1, 'b': [2, 3]}\n",
            "x = {\n    'a': 1,\n    'b': [2, 3]\n}\n",
        ),
        ("x = {1, 2}\n", "x = {\n    1\n    2\n}\n"),
    ];

    for (inline, multiline) in cases {
        let a = parse_clean(inline);
        let b = parse_clean(multiline);
        assert!(a.same_shape(&b), "{} vs {}\n{}\n{}", inline, multiline, a, b);
    }
}

#[test]
fn test_multiline_literal_inside_block() {
    let source = "def f():\n    x = [\n        1,\n        2,\n    ]\n    return x\n";
    let module = parse_clean(source);
    let suite = module.children()[0].child(1).unwrap();
    assert_eq!(kinds(suite.children()), vec![NodeKind::Assignment, NodeKind::Return]);
}

#[test]
fn test_empty_input() {
    let output = parse("");
    assert!(output.errors.is_empty());
    assert!(output.module.is(NodeKind::Module));
    assert!(output.module.children().is_empty());

    let output = parse("\n\n# only a comment\n");
    assert!(output.errors.is_empty());
    assert!(output.module.children().is_empty());
}

#[test]
fn test_malformed_indentation_still_returns_module() {
    let output = parse("if x:\n  y=1\n    z=2\n");
    assert!(output
        .errors
        .iter()
        .any(|e| e.phase == Phase::Indentation));
    assert!(output.module.is(NodeKind::Module));
    assert!(!output.module.children().is_empty());
}

#[test]
fn test_unterminated_string_recovers_on_next_line() {
    let output = parse("x = \"abc\ny = 1\n");
    assert_eq!(output.errors.first().map(|e| e.phase), Some(Phase::Lexical));
    assert_eq!(output.errors[0].location.line, 1);

    let last = output.module.children().last().unwrap();
    assert!(last.is(NodeKind::Assignment));
    assert_eq!(last.child(0).and_then(Node::text), Some("y"));
}

#[test]
fn test_syntax_error_names_token_and_line() {
    let output = parse("x = 1\nif x\n    pass\n");
    let syntax = output
        .errors
        .iter()
        .find(|e| e.phase == Phase::Syntax)
        .unwrap();
    assert_eq!(syntax.location.line, 2);
    assert!(syntax.message.contains("NEWLINE"), "{}", syntax.message);
    assert!(syntax.to_string().contains("line 2"));
}

#[test]
fn test_recovery_modes() {
    let source = "a = (\nb = 1\nc = ]\nd = 2\n";

    let permissive = parse(source);
    let syntax_errors = permissive
        .errors
        .iter()
        .filter(|e| e.phase == Phase::Syntax)
        .count();
    assert!(syntax_errors >= 2);
    assert!(permissive
        .module
        .children()
        .iter()
        .any(|s| s.child(0).and_then(Node::text) == Some("d")));

    let options = ParseOptions::default().with_recovery(Recovery::Conservative);
    let conservative = parse_with(source, &options);
    assert_eq!(conservative.errors.len(), 1);
    assert!(conservative.module.children().is_empty());
}

#[test]
fn test_errors_are_ordered_by_detection() {
    let output = parse("a = $\nif b:\nc\nd = )\n");
    let phases: Vec<Phase> = output.errors.iter().map(|e| e.phase).collect();
    assert_eq!(phases[0], Phase::Lexical);
    assert!(phases.contains(&Phase::Indentation));
    let lines: Vec<usize> = output.errors.iter().map(|e| e.location.line).collect();
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
}

#[test]
fn test_recovery_keeps_statements_in_their_blocks() {
    let output = parse("def f():\n    x = [\n        1 2,\n    ]\n    y = 1\nz = 2\n");
    assert_eq!(kinds(output.module.children()), vec![NodeKind::FunctionDef, NodeKind::Assignment]);
    let body = output.module.children()[0].child(1).unwrap();
    assert_eq!(body.children()[0].child(0).and_then(Node::text), Some("y"));
    assert!(output.errors.iter().all(|e| !e.message.contains("DEDENT")));

    let output = parse("foo bar:\n    if a:\n        b\n    c\nd\n");
    let inner_if = output
        .module
        .children()
        .iter()
        .find(|s| s.is(NodeKind::If))
        .unwrap();
    assert_eq!(inner_if.child(1).unwrap().children().len(), 1);
}

#[test]
fn test_bare_carriage_returns_separate_statements() {
    let output = parse("a = 1\rb = 2\r");
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    assert_eq!(output.module.children().len(), 2);
    assert_eq!(output.module.children()[1].location().line, 2);
}
