mod args;

use anyhow::{anyhow, Result};
use args::Args;
use clap::Parser;
use occ::{codegen, emission, lexer, parser, semantic_analysis, tacky};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn preprocess(args: &Args) -> Result<PathBuf> {
    let mut preprocessed = args.output_stem();
    preprocessed.set_extension("i");

    let mut command = Command::new("gcc");
    command.arg("-E");
    // Linemarkers would derail the lexer; they are only kept when the user
    // stops at preprocessing and did not ask for -P.
    if args.no_linemarkers || !args.preprocess {
        command.arg("-P");
    }
    let status = command
        .arg(&args.input)
        .arg("-o")
        .arg(&preprocessed)
        .status()
        .map_err(|e| anyhow!("failed to run gcc as the preprocessor: {e}"))?;

    if !status.success() {
        return Err(anyhow!("preprocessor failed"));
    }
    Ok(preprocessed)
}

/// Runs the compilation stages, honoring the stage-stop flags. Returns the
/// path of the emitted assembly file, or None if a flag stopped the
/// pipeline early.
fn compile(args: &Args) -> Result<Option<PathBuf>> {
    let preprocessed = preprocess(args)?;
    if args.preprocess {
        return Ok(None);
    }

    // the .i file is spent once read; remove it even when the read fails
    let read = fs::read_to_string(&preprocessed);
    let _ = fs::remove_file(&preprocessed);
    let source = read.map_err(|e| anyhow!("can't read preprocessed file: {e}"))?;

    let tokens = lexer::lex(&source)?;
    if args.lex {
        dbg!(&tokens);
        return Ok(None);
    }

    let ast = parser::parse(&tokens)?;
    if args.parse {
        dbg!(&ast);
        return Ok(None);
    }

    let (validated_ast, mut symbols) = semantic_analysis::validate(ast)?;
    if args.validate {
        dbg!(&validated_ast);
        return Ok(None);
    }

    let tacky = tacky::emit_tacky(validated_ast);
    if args.tacky {
        dbg!(&tacky);
        return Ok(None);
    }

    let asm_ast = codegen::codegen(tacky, &mut symbols);
    if args.codegen {
        dbg!(&asm_ast);
        return Ok(None);
    }

    let mut asm_file = args.output_stem();
    asm_file.set_extension("s");
    fs::write(&asm_file, emission::emit_asm(&asm_ast, &symbols))?;

    Ok(Some(asm_file))
}

fn assemble(args: &Args, asm_file: &Path) -> Result<()> {
    let mut out_file = args.output_stem();

    let mut command = Command::new("gcc");
    if args.no_link {
        out_file.set_extension("o");
        command.arg("-c");
    }
    let status = command
        .arg(asm_file)
        .arg("-o")
        .arg(&out_file)
        .status()
        .map_err(|e| anyhow!("failed to run gcc as the assembler: {e}"));

    // the .s file is intermediate output; clean it up on failure too
    fs::remove_file(asm_file)?;

    if !status?.success() {
        return Err(anyhow!("assembler failed"));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !fs::exists(&args.input)? {
        return Err(anyhow!(
            "file {} does not exist",
            args.input.to_string_lossy()
        ));
    }

    let Some(asm_file) = compile(&args)? else {
        return Ok(());
    };

    if args.assembly {
        return Ok(());
    }

    assemble(&args, &asm_file)
}
