use crate::{driver, tokens::TokenTable};

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct TestCaseInfo {
    pub name: String,
    pub compileexitcode: i32,
}

/// Compiles `src` with the built-in table. `Err` carries every diagnostic,
/// one per line.
pub fn run(src: &str) -> Result<String, String> {
    let out = driver::compile(src, &TokenTable::default(), false);

    let errors: Vec<String> = out.diagnostics().map(ToString::to_string).collect();
    if !errors.is_empty() {
        return Err(errors.join("\n"));
    }

    out.assembly
        .map(|asm| asm.text)
        .ok_or_else(|| "no assembly produced".to_owned())
}
