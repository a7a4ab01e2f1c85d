use tinyc::{
    codegen::{CodeGenerator, emit},
    ir::{Quad, read_listing},
};

fn emit_listing(text: &str) -> String {
    emit(&read_listing(text).unwrap()).text
}

fn data_segment(asm: &str) -> &str {
    let start = asm.find("DATAS SEGMENT").unwrap();
    let end = asm.find("DATAS ENDS").unwrap();
    &asm[start..end]
}

#[test]
fn test_single_assignment() {
    let asm = emit(&read_listing("0: (=, 5, _, x)").unwrap());
    assert!(asm.text.contains("    MOV AX, 5\n    MOV [x], AX\n"));

    let data = data_segment(&asm.text);
    assert_eq!(data.matches(" DW 0").count(), 1);
    assert!(data.contains("    x DW 0\n"));
    assert_eq!(asm.layout.variables, vec!["x"]);
    assert!(asm.layout.temporaries.is_empty());
}

#[test]
fn test_arithmetic_mapping() {
    let asm = emit_listing(
        "0: (+, a, 1, t1)
         1: (-, t1, b, t2)
         2: (*, t2, 3, t3)",
    );
    assert!(asm.contains("    MOV AX, [a]\n    ADD AX, 1\n    MOV [t1], AX\n"));
    assert!(asm.contains("    MOV AX, [t1]\n    SUB AX, [b]\n    MOV [t2], AX\n"));
    assert!(asm.contains("    MOV AX, [t2]\n    MOV BX, 3\n    IMUL BX\n    MOV [t3], AX\n"));

    let data = data_segment(&asm);
    assert_eq!(data.matches(" DW 0").count(), 5);
    assert!(data.find("a DW").unwrap() < data.find("b DW").unwrap());
    assert!(data.find("b DW").unwrap() < data.find("t1 DW").unwrap());
}

#[test]
fn test_logical_operators() {
    let asm = emit_listing("0: (&&, a, b, t1)\n1: (||, a, b, t2)");
    assert!(asm.contains(concat!(
        "    MOV AX, [a]\n",
        "    CMP AX, 0\n",
        "    JE FALSE_0\n",
        "    MOV AX, [b]\n",
        "    CMP AX, 0\n",
        "    JE FALSE_0\n",
        "    MOV WORD PTR [t1], 1\n",
        "    JMP END_0\n",
        "FALSE_0:\n",
        "    MOV WORD PTR [t1], 0\n",
        "END_0:\n",
    )));
    assert!(asm.contains("    JNE TRUE_1\n"));
    assert!(asm.contains("TRUE_1:\n    MOV WORD PTR [t2], 1\nEND_1:\n"));
}

#[test]
fn test_control_flow() {
    let asm = emit_listing(
        "0: (LABEL, _, _, FUNC_main)
         1: (GOTO, _, _, L2)
         2: (LABEL, _, _, L1)
         3: (LABEL, _, _, L2)
         4: (IF, t1, _, L1)
         5: (RET, _, _, _)",
    );
    assert!(asm.contains("FUNC_main:\n"));
    assert!(asm.contains("    JMP L2\n"));
    assert!(asm.contains("L1:\nL2:\n"));
    assert!(asm.contains("    MOV AX, [t1]\n    CMP AX, 1\n    JNE SKIP_0\n    JMP L1\nSKIP_0:\n"));
}

#[test]
fn test_reals_are_truncated() {
    let asm = emit_listing("0: (=, 2.75, _, f)\n1: (=, -1.5, _, g)");
    assert!(asm.contains("    MOV AX, 2\n    MOV [f], AX\n"));
    assert!(asm.contains("    MOV AX, -1\n    MOV [g], AX\n"));
}

#[test]
fn test_declare_registers_slot() {
    let asm = emit_listing("0: (DECLARE, _, _, unused)");
    assert!(data_segment(&asm).contains("    unused DW 0\n"));
    assert!(asm.contains("MOV DL, 'u'"));
}

#[test]
fn test_reserved_names_are_prefixed() {
    let asm = emit_listing("0: (=, 1, _, cx)\n1: (+, cx, 1, t1)\n2: (=, t1, _, end)");
    assert!(asm.contains("    var_cx DW 0\n"));
    assert!(asm.contains("    var_end DW 0\n"));
    assert!(asm.contains("    MOV AX, [var_cx]\n    ADD AX, 1\n"));
    // reported under the source name
    assert!(asm.contains("MOV DL, 'c'\n    MOV AH, 02h\n    INT 21h\n    MOV DL, 'x'"));
}

#[test]
fn test_generator_is_reusable() {
    let quads: Vec<Quad> = read_listing("0: (<, a, b, t1)").unwrap();
    let mut generator = CodeGenerator::new();
    let first = generator.generate(&quads);
    let second = generator.generate(&quads);
    assert_eq!(first, second);
    assert!(first.text.contains("TRUE_0:"));
    assert!(!first.text.contains("TRUE_1:"));
}
