use tinyc::{
    ast,
    ir::{Label, Opcode, Operand, Quad, listing, read_listing},
    irgen::{IRGenerator, lower},
    lexer::tokenize,
    tokens::TokenTable,
};

fn lower_src(src: &str) -> Vec<Quad> {
    let (tokens, _) = tokenize(src, &TokenTable::default());
    let (program, diagnostics) = ast::parse(&tokens);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    lower(&program)
}

/// Listing without the `<index>: ` prefixes.
fn quads_text(quads: &[Quad]) -> Vec<String> {
    quads.iter().map(ToString::to_string).collect()
}

#[test]
fn test_assignment_lowering() {
    let quads = lower_src("void main() { int a; int x; x = a + 1; }");
    assert_eq!(
        quads_text(&quads),
        vec!["(LABEL, _, _, FUNC_main)", "(+, a, 1, t1)", "(=, t1, _, x)", "(RET, _, _, _)"]
    );
}

#[test]
fn test_if_lowering() {
    let quads = lower_src("void main() { int a; if (a > 0) { a = 1; } }");
    assert_eq!(
        quads_text(&quads),
        vec![
            "(LABEL, _, _, FUNC_main)",
            "(>, a, 0, t1)",
            "(IF_NOT, t1, _, L1)",
            "(=, 1, _, a)",
            "(GOTO, _, _, L2)",
            "(LABEL, _, _, L1)",
            "(LABEL, _, _, L2)",
            "(RET, _, _, _)",
        ]
    );
}

#[test]
fn test_while_lowering() {
    let quads = lower_src("void main() { int i; while (i < 3) { i = i + 1; } }");
    assert_eq!(
        quads_text(&quads),
        vec![
            "(LABEL, _, _, FUNC_main)",
            "(GOTO, _, _, L2)",
            "(LABEL, _, _, L1)",
            "(+, i, 1, t1)",
            "(=, t1, _, i)",
            "(LABEL, _, _, L2)",
            "(<, i, 3, t2)",
            "(IF, t2, _, L1)",
            "(LABEL, _, _, L3)",
            "(RET, _, _, _)",
        ]
    );
}

#[test]
fn test_do_while_lowering() {
    let quads = lower_src("void main() { int i; do { i = i + 1; } while (i < 3); }");
    assert_eq!(
        quads_text(&quads),
        vec![
            "(LABEL, _, _, FUNC_main)",
            "(LABEL, _, _, L1)",
            "(+, i, 1, t1)",
            "(=, t1, _, i)",
            "(<, i, 3, t2)",
            "(IF, t2, _, L1)",
            "(LABEL, _, _, L2)",
            "(RET, _, _, _)",
        ]
    );
}

#[test]
fn test_for_lowering() {
    let quads = lower_src("void main() { int i; int s; for (i = 0; i < 4; i = i + 1) { s = s + i; } }");
    assert_eq!(
        quads_text(&quads),
        vec![
            "(LABEL, _, _, FUNC_main)",
            "(=, 0, _, i)",
            "(GOTO, _, _, L2)",
            "(LABEL, _, _, L1)",
            "(+, s, i, t1)",
            "(=, t1, _, s)",
            "(+, i, 1, t2)",
            "(=, t2, _, i)",
            "(LABEL, _, _, L2)",
            "(<, i, 4, t3)",
            "(IF, t3, _, L1)",
            "(LABEL, _, _, L3)",
            "(RET, _, _, _)",
        ]
    );
}

#[test]
fn test_globals_come_first() {
    let quads = lower_src("void main() { int a = b; } int b = 2 * 3;");
    assert_eq!(
        quads_text(&quads),
        vec![
            "(*, 2, 3, t1)",
            "(=, t1, _, b)",
            "(LABEL, _, _, FUNC_main)",
            "(=, b, _, a)",
            "(RET, _, _, _)",
        ]
    );
}

#[test]
fn test_counters_restart_per_run() {
    let (tokens, _) = tokenize("void main() { int a = 1 + 2; }", &TokenTable::default());
    let (program, _) = ast::parse(&tokens);

    let mut generator = IRGenerator::new();
    let first = generator.generate(&program);
    let second = generator.generate(&program);
    assert_eq!(first, second);
    assert_eq!(first[1].result, Operand::Temp(1));
}

#[test]
fn test_temps_and_labels_never_repeat() {
    let quads = lower_src(
        "void main() { int i; int j; while (i < 3) { if (j > 1) { j = j - 1; } i = i + 1; } }",
    );

    let temps: Vec<u32> = quads.iter().filter_map(|q| q.result.as_temp().copied()).collect();
    assert!(temps.windows(2).all(|w| w[0] < w[1]));

    let labels: Vec<&Label> = quads
        .iter()
        .filter(|q| q.op == Opcode::Label)
        .filter_map(Quad::target)
        .collect();
    for (i, label) in labels.iter().enumerate() {
        assert!(!labels[i + 1..].contains(label));
    }
}

#[test]
fn test_listing_round_trip() {
    let quads = lower_src("void main() { float f = 2.5; int i; if (i != 0) { i = i / 2; } }");
    let text = listing(&quads);
    assert!(text.starts_with("0: (LABEL, _, _, FUNC_main)\n1: (=, 2.5, _, f)\n"));
    assert_eq!(read_listing(&text).unwrap(), quads);
}
