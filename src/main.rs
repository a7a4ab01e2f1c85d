use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use tinyc::{
    driver::{self, Compilation, DriverError},
    ir, lexer,
    tokens::TokenTable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stage {
    Lex,
    Parse,
    Sema,
    Ir,
    Opt,
    Asm,
}

const STAGES: [Stage; 6] = [
    Stage::Lex,
    Stage::Parse,
    Stage::Sema,
    Stage::Ir,
    Stage::Opt,
    Stage::Asm,
];

impl Stage {
    fn title(self) -> &'static str {
        match self {
            Stage::Lex => "tokens",
            Stage::Parse => "syntax tree",
            Stage::Sema => "symbol table",
            Stage::Ir => "intermediate code",
            Stage::Opt => "optimized code",
            Stage::Asm => "assembly",
        }
    }

    fn artifact(self, out: &Compilation, table: &TokenTable) -> String {
        match self {
            Stage::Lex => lexer::tokens_listing(&out.tokens, table),
            Stage::Parse => out.program.to_string(),
            Stage::Sema => out.symbols.to_string(),
            Stage::Ir => ir::listing(&out.ir),
            Stage::Opt => ir::listing(&out.optimized),
            Stage::Asm => out
                .assembly
                .as_ref()
                .map(|asm| asm.text.clone())
                .unwrap_or_default(),
        }
    }
}

/// Compiles a small C-like language to 16-bit 8086 MASM.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Source file.
    input: PathBuf,

    /// Last artifact to produce.
    #[arg(long, value_enum, default_value_t = Stage::Asm)]
    stage: Stage,

    /// Write the artifact here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON token-category table replacing the built-in codes.
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// Skip code generation once any diagnostic has been recorded.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Print every intermediate artifact up to the selected stage.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<bool, DriverError> {
    let table = driver::load_token_table(cli.tokens.as_deref())?;
    let out = driver::compile_file(&cli.input, &table, cli.strict)?;

    for diagnostic in out.diagnostics() {
        eprintln!("{}:{diagnostic}", cli.input.display());
    }

    if cli.verbose {
        for stage in STAGES.into_iter().take_while(|s| *s != cli.stage) {
            println!("==== {} ====", stage.title());
            print!("{}", stage.artifact(&out, &table));
            println!();
        }
    }

    let artifact = cli.stage.artifact(&out, &table);
    match &cli.output {
        Some(path) => fs::write(path, artifact)?,
        None => {
            if cli.verbose {
                println!("==== {} ====", cli.stage.title());
            }
            print!("{artifact}");
        }
    }

    Ok(!out.has_errors())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("tinyc: {err}");
            ExitCode::from(2)
        }
    }
}
