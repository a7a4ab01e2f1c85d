use tinyc::{
    ast,
    ir::{Label, Opcode, Operand, Quad, read_listing},
    irgen::lower,
    lexer::tokenize,
    opt::{
        eliminate_dead_temps, fold_constants, optimize, propagate_constants, remove_redundant,
        simplify_algebra,
    },
    tokens::TokenTable,
};

fn quads(text: &str) -> Vec<Quad> {
    read_listing(text).unwrap()
}

fn optimized_src(src: &str) -> Vec<String> {
    let (tokens, _) = tokenize(src, &TokenTable::default());
    let (program, _) = ast::parse(&tokens);
    optimize(&lower(&program))
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_fold_single_quad() {
    assert_eq!(
        fold_constants(&quads("0: (+, 3, 4, t1)")),
        quads("0: (=, 7, _, t1)")
    );
}

#[test]
fn test_algebraic_single_quad() {
    assert_eq!(
        simplify_algebra(&quads("0: (*, x, 0, t2)")),
        quads("0: (=, 0, _, t2)")
    );
}

#[test]
fn test_pipeline_drops_folded_temps() {
    let input = quads(
        "0: (+, 3, 4, t1)
         1: (=, t1, _, x)
         2: (*, x, 0, t2)
         3: (=, t2, _, y)",
    );

    assert_eq!(
        optimize(&input),
        quads(
            "0: (=, 7, _, x)
             1: (=, 0, _, y)",
        )
    );
}

#[test]
fn test_if_without_else_collapses() {
    assert_eq!(
        optimized_src("void main() { int a; if (a > 0) { a = 1; } }"),
        vec![
            "(LABEL, _, _, FUNC_main)",
            "(>, a, 0, t1)",
            "(IF_NOT, t1, _, L1)",
            "(=, 1, _, a)",
            "(GOTO, _, _, L1)",
            "(LABEL, _, _, L1)",
            "(RET, _, _, _)",
        ]
    );
}

#[test]
fn test_loop_bodies_are_not_propagated_into() {
    let out = optimized_src("void main() { int i = 0; while (i < 3) { i = i + 1; } }");
    assert!(out.contains(&"(<, i, 3, t2)".to_owned()));
    assert!(out.contains(&"(+, i, 1, t1)".to_owned()));
}

#[test]
fn test_global_initializers_fold() {
    let out = optimized_src("int g = 2 * 3 + 1; void main() { int x = g; }");
    assert_eq!(
        out,
        vec![
            "(=, 7, _, g)",
            "(LABEL, _, _, FUNC_main)",
            "(=, g, _, x)",
            "(RET, _, _, _)",
        ]
    );
}

#[test]
fn test_folding_matches_word_arithmetic() {
    let out = optimized_src("void main() { int x = 0; if (30000 + 30000 > 0) { x = 1; } }");
    assert!(out.contains(&"(IF_NOT, 0, _, L1)".to_owned()), "{out:?}");
}

#[test]
fn test_division_by_zero_survives() {
    let input = quads("0: (/, 1, 0, t1)\n1: (=, t1, _, x)");
    assert_eq!(optimize(&input), input);
}

#[test]
fn test_redundant_jumps_keep_targets_defined() {
    let input = quads(
        "0: (IF_NOT, c, _, L1)
         1: (GOTO, _, _, L2)
         2: (LABEL, _, _, L1)
         3: (LABEL, _, _, L2)
         4: (GOTO, _, _, L2)",
    );
    let output = remove_redundant(&input);

    let defined: Vec<&Label> = output
        .iter()
        .filter(|q| q.op == Opcode::Label)
        .filter_map(Quad::target)
        .collect();
    for quad in output.iter().filter(|q| q.op != Opcode::Label) {
        if let Some(target) = quad.target() {
            assert!(defined.contains(&target), "{quad} jumps nowhere");
        }
    }
}

#[test]
fn test_propagation_stops_at_redefinition() {
    let input = quads(
        "0: (=, 5, _, x)
         1: (+, x, 1, t1)
         2: (=, t1, _, x)
         3: (+, x, 1, t2)",
    );
    let output = propagate_constants(&input);
    assert_eq!(output[1].arg1, Operand::Int(5));
    assert_eq!(output[3].arg1, Operand::Var("x".to_owned()));
}

#[test]
fn test_unused_temps_removed() {
    let input = quads("0: (+, a, b, t1)\n1: (+, a, b, t2)\n2: (=, t2, _, c)");
    assert_eq!(
        eliminate_dead_temps(&input),
        quads("0: (+, a, b, t2)\n1: (=, t2, _, c)")
    );
}

#[test]
fn test_clean_output_is_a_fixed_point() {
    for src in [
        "void main() { int i; for (i = 0; i < 10; i = i + 1) { } }",
        "void main() { int a; int b; do { a = a + b; } while (a < 100); }",
        "void main() { int a = 5; int b = a * 2; }",
    ] {
        let (tokens, _) = tokenize(src, &TokenTable::default());
        let (program, _) = ast::parse(&tokens);
        let once = optimize(&lower(&program));
        let twice = optimize(&once);
        if twice != once {
            assert_eq!(optimize(&twice), twice, "{src}");
        }
    }
}
