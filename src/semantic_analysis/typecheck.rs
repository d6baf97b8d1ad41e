use crate::ast::*;
use crate::semantic_analysis::{Result, SemAnalysisError};

use std::collections::HashMap;

pub type SymbolTable = HashMap<Identifier, SymbolInfo>;

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub sym_type: Type,
    pub defined: bool,
    pub has_external_linkage: bool,
    /// Bytes of stack the function's locals occupy. Written by codegen's
    /// pseudo replacement pass; 0 until then.
    pub stack_size: i32,
}

impl SymbolInfo {
    fn local_int() -> Self {
        Self {
            sym_type: Type::Int,
            defined: true,
            has_external_linkage: false,
            stack_size: 0,
        }
    }
}

fn typecheck_call(name: &Identifier, args: &[Exp], sym_table: &mut SymbolTable) -> Result<()> {
    use SemAnalysisError::ExpectedArgsCountButGot as ArgsCountErr;
    use SemAnalysisError::UndeclaredFunction as UnknownFunErr;
    use SemAnalysisError::VariableCall as VarCallErr;

    let entry = sym_table
        .get(name)
        .ok_or_else(|| UnknownFunErr(name.clone()))?;
    match entry.sym_type {
        Type::Fun { param_count } if param_count == args.len() => (),
        Type::Fun { param_count } => {
            return Err(ArgsCountErr(param_count, args.len(), name.clone()));
        }
        Type::Int => return Err(VarCallErr(name.clone())),
    }

    args.iter().try_for_each(|arg| typecheck_exp(arg, sym_table))
}

fn typecheck_var(name: &Identifier, sym_table: &mut SymbolTable) -> Result<()> {
    use SemAnalysisError::FunctionNameAsVariable as FunAsVarErr;
    use SemAnalysisError::VariableNotDeclared as UnknownVarErr;

    let entry = sym_table
        .get(name)
        .ok_or_else(|| UnknownVarErr(name.clone()))?;
    if entry.sym_type.is_function() {
        return Err(FunAsVarErr(name.clone()));
    }

    Ok(())
}

fn typecheck_exp(exp: &Exp, sym_table: &mut SymbolTable) -> Result<()> {
    match exp {
        Exp::Assignment(left, right) => {
            typecheck_exp(left, sym_table)?;
            typecheck_exp(right, sym_table)
        }
        Exp::Unary(_, inner) => typecheck_exp(inner, sym_table),
        Exp::Binary(_, left, right) => {
            typecheck_exp(left, sym_table)?;
            typecheck_exp(right, sym_table)
        }
        Exp::Conditional(cond) => {
            typecheck_exp(&cond.condition, sym_table)?;
            typecheck_exp(&cond.then, sym_table)?;
            typecheck_exp(&cond.els, sym_table)
        }
        Exp::Call(name, args) => typecheck_call(name, args, sym_table),
        Exp::Var(name) => typecheck_var(name, sym_table),
        Exp::Constant(_) => Ok(()),
    }
}

fn typecheck_optional_exp(exp: Option<&Exp>, sym_table: &mut SymbolTable) -> Result<()> {
    exp.map_or(Ok(()), |e| typecheck_exp(e, sym_table))
}

fn typecheck_forinit(init: &AstForInit, sym_table: &mut SymbolTable) -> Result<()> {
    match init {
        AstForInit::InitDecl(vardec) => typecheck_vardec(vardec, sym_table),
        AstForInit::InitExp(exp) => typecheck_optional_exp(exp.as_ref(), sym_table),
    }
}

fn typecheck_statement(st: &Statement, sym_table: &mut SymbolTable) -> Result<()> {
    use Statement as S;
    match st {
        S::While(while_st) => {
            typecheck_exp(&while_st.condition, sym_table)?;
            typecheck_statement(&while_st.body, sym_table)
        }
        S::DoWhile(dowhile) => {
            typecheck_statement(&dowhile.body, sym_table)?;
            typecheck_exp(&dowhile.condition, sym_table)
        }
        S::For(for_st) => {
            typecheck_forinit(&for_st.init, sym_table)?;
            typecheck_optional_exp(for_st.condition.as_ref(), sym_table)?;
            typecheck_optional_exp(for_st.post.as_ref(), sym_table)?;
            typecheck_statement(&for_st.body, sym_table)
        }
        S::If(if_st) => {
            typecheck_exp(&if_st.condition, sym_table)?;
            typecheck_statement(&if_st.then, sym_table)?;
            if_st
                .els
                .as_deref()
                .map_or(Ok(()), |els| typecheck_statement(els, sym_table))
        }
        S::Switch(switch) => {
            typecheck_exp(&switch.ctrl_exp, sym_table)?;
            typecheck_statement(&switch.body, sym_table)
        }
        S::Cased(cased) => {
            typecheck_exp(&cased.exp, sym_table)?;
            typecheck_statement(&cased.body, sym_table)
        }
        S::DCased(dcased) => typecheck_statement(&dcased.body, sym_table),
        S::Labeled(_, st) => typecheck_statement(st, sym_table),
        S::Compound(block) => typecheck_block(block, sym_table),
        S::Return(exp) | S::Exp(exp) => typecheck_exp(exp, sym_table),
        S::Goto(_) | S::Continue(_) | S::Break(_) | S::Null => Ok(()),
    }
}

fn typecheck_vardec(vardec: &VarDec, sym_table: &mut SymbolTable) -> Result<()> {
    sym_table.insert(vardec.name.clone(), SymbolInfo::local_int());
    typecheck_optional_exp(vardec.init.as_ref(), sym_table)
}

fn typecheck_fundec(fundec: &FunDec, sym_table: &mut SymbolTable) -> Result<()> {
    let fun_type = Type::Fun {
        param_count: fundec.params.len(),
    };
    let has_body = fundec.body.is_some();
    let mut already_defined = false;

    if let Some(old_dec) = sym_table.get(&fundec.name) {
        if old_dec.sym_type != fun_type {
            return Err(SemAnalysisError::IncompatibleFunDec(fundec.name.clone()));
        }
        already_defined = old_dec.defined;
        if already_defined && has_body {
            return Err(SemAnalysisError::FunctionRedefinition(fundec.name.clone()));
        }
    }

    let entry = SymbolInfo {
        sym_type: fun_type,
        defined: already_defined || has_body,
        has_external_linkage: true,
        stack_size: 0,
    };
    sym_table.insert(fundec.name.clone(), entry);

    if has_body {
        for param in &fundec.params {
            sym_table.insert(param.clone(), SymbolInfo::local_int());
        }
    }

    fundec
        .body
        .as_ref()
        .map_or(Ok(()), |block| typecheck_block(block, sym_table))
}

fn typecheck_declaration(dec: &Declaration, sym_table: &mut SymbolTable) -> Result<()> {
    match dec {
        Declaration::Var(vardec) => typecheck_vardec(vardec, sym_table),
        Declaration::Fun(fundec) => typecheck_fundec(fundec, sym_table),
    }
}

fn typecheck_block(block: &AstBlock, sym_table: &mut SymbolTable) -> Result<()> {
    block.items.iter().try_for_each(|item| match item {
        AstBlockItem::D(dec) => typecheck_declaration(dec, sym_table),
        AstBlockItem::S(st) => typecheck_statement(st, sym_table),
    })
}

pub fn check_types(ast: &Ast) -> Result<SymbolTable> {
    let mut sym_table = SymbolTable::new();

    for fundec in &ast.functions {
        typecheck_fundec(fundec, &mut sym_table)?;
    }

    Ok(sym_table)
}
