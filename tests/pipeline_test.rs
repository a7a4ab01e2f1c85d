use std::{fs, panic};

use tinyc::{
    diagnostic::Stage,
    driver::compile,
    tokens::TokenTable,
    utils::test::{TestCaseInfo, run},
};

fn run_test_cases(case_path: &str) {
    let mut entries: Vec<_> = fs::read_dir(case_path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    entries.sort_by_key(|x| x.file_name());
    assert!(!entries.is_empty());

    for x in entries {
        let name = x.file_name().into_string().unwrap();
        let path = x.path();
        let info_path = path.join("testcase_info.json");
        let info: TestCaseInfo =
            serde_json::from_str(fs::read_to_string(info_path).unwrap().as_str()).unwrap();
        assert_eq!(info.name, name);

        let src_path = path.join(format!("{}.c", name));
        let src = fs::read_to_string(src_path).unwrap();
        let should_pass = info.compileexitcode == 0;
        let result = match panic::catch_unwind(|| run(src.as_str())) {
            Ok(result) => result,
            Err(_) => {
                panic!("{} caused panic!", name);
            }
        };

        match (should_pass, result) {
            (true, Ok(_)) | (false, Err(_)) => println!("{} passed!", name),
            (true, Err(e)) => {
                panic!("{} check failed, expect pass!\n{}", name, e);
            }
            (false, Ok(_)) => {
                panic!("{} check passed, expect fail!", name);
            }
        }
    }
}

#[test]
fn testcases() {
    run_test_cases("testcases");
}

#[test]
fn test_full_program() {
    let src = fs::read_to_string("testcases/sum_loop/sum_loop.c").unwrap();
    let asm = run(&src).unwrap();

    assert!(asm.starts_with("DATAS SEGMENT\n"));
    assert!(asm.contains("    total DW 0\n"));
    assert!(asm.contains("    i DW 0\n"));
    assert!(asm.contains("FUNC_main:\n"));
    assert!(asm.contains("    JLE TRUE_"));
    assert!(asm.contains("MOV DL, 't'"));
    assert!(asm.contains("    CALL PrintNumber\n"));
}

#[test]
fn test_lenient_pipeline_keeps_going() {
    let out = compile("void main() { int a = 1 a = b; }", &TokenTable::default(), false);

    let stages: Vec<Stage> = out.diagnostics().map(|d| d.stage()).collect();
    assert_eq!(stages, vec![Stage::Syntax, Stage::Semantic]);
    assert!(!out.ir.is_empty());
    assert!(out.assembly.is_some());
}

#[test]
fn test_diagnostic_format() {
    let out = compile("void main() {\n  int a = 089;\n}", &TokenTable::default(), false);
    let first = out.diagnostics().next().unwrap();
    assert_eq!(first.to_string(), "2:11: lexical error: Invalid octal (found '089')");
}

#[test]
fn test_strict_pipeline_stops() {
    let out = compile("void main() { x = 1; }", &TokenTable::default(), true);
    assert!(out.has_errors());
    assert!(out.ir.is_empty());
    assert!(out.optimized.is_empty());
    assert!(out.assembly.is_none());
}
