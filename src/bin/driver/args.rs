use clap::Parser;
use std::path::PathBuf;

/// A C compiler for x86-64 Linux. Preprocessing, assembling and linking
/// are delegated to gcc.
#[derive(Debug, Parser)]
#[command(name = "occ", version, about)]
pub struct Args {
    /// C source file
    pub input: PathBuf,

    /// Output path (defaults to the source path without its extension)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Preprocess without linemarkers
    #[arg(short = 'P', long = "no-linemarkers")]
    pub no_linemarkers: bool,

    /// Stop after preprocessing
    #[arg(short = 'E', long = "preprocess")]
    pub preprocess: bool,

    /// Stop after lexing and print the tokens
    #[arg(long)]
    pub lex: bool,

    /// Stop after parsing and print the C AST
    #[arg(long)]
    pub parse: bool,

    /// Stop after semantic analysis and print the validated AST
    #[arg(long)]
    pub validate: bool,

    /// Stop after producing TAC IR and print it
    #[arg(long)]
    pub tacky: bool,

    /// Stop after code generation and print the assembly AST
    #[arg(long)]
    pub codegen: bool,

    /// Compile only; do not assemble or link (output assembly file)
    #[arg(short = 'S', long = "assembly")]
    pub assembly: bool,

    /// Compile and assemble, but do not link (output object file)
    #[arg(short = 'c')]
    pub no_link: bool,
}

impl Args {
    /// Base path for every produced file; extensions are swapped in as
    /// the pipeline advances (.i, .s, .o, executable).
    pub fn output_stem(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut stem = self.input.clone();
            stem.set_extension("");
            stem
        })
    }
}
