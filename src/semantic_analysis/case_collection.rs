use super::{Result, SemAnalysisError};
use crate::ast::*;

use std::collections::HashSet;

// None stands for the default case; the label disambiguates equal values
// that belong to different (nested) switches.
type Cases = HashSet<(Option<i32>, Identifier)>;

fn collect_labeled_st(label: Identifier, st: Statement) -> Result<(Statement, Cases)> {
    let (body, cases) = collect_statement(st)?;
    let result = Statement::Labeled(label, Box::new(body));

    Ok((result, cases))
}

fn collect_dcased(dcased: DCasedStatement) -> Result<(Statement, Cases)> {
    let DCasedStatement { body, label } = dcased;
    let (body, mut cases) = collect_statement(*body)?;

    if !cases.insert((None, label.clone())) {
        return Err(SemAnalysisError::DuplicateCase("default".into()));
    }

    let body = Box::new(body);
    let result = Statement::DCased(DCasedStatement { body, label });

    Ok((result, cases))
}

fn collect_cased(cased: CasedStatement) -> Result<(Statement, Cases)> {
    let CasedStatement { exp, body, label } = cased;
    let value = exp
        .get_const()
        .ok_or_else(|| SemAnalysisError::NotAConstCase(exp.clone()))?;
    let (body, mut cases) = collect_statement(*body)?;

    if !cases.insert((Some(value), label.clone())) {
        return Err(SemAnalysisError::DuplicateCase(value.to_string()));
    }

    let body = Box::new(body);
    let result = Statement::Cased(CasedStatement { exp, body, label });

    Ok((result, cases))
}

fn collect_switch(mut switch: Switch) -> Result<(Statement, Cases)> {
    let (body, cases) = collect_statement(*switch.body)?;
    switch.body = Box::new(body);
    switch.has_default = cases.iter().any(|(value, _)| value.is_none());
    switch.cases = cases.into_iter().filter_map(|(value, _)| value).collect();
    // The set iterates in arbitrary order; keep the dispatch sequence stable.
    switch.cases.sort_unstable();

    // Cases never escape their switch.
    Ok((Statement::Switch(switch), Cases::new()))
}

fn collect_if_st(if_st: If) -> Result<(Statement, Cases)> {
    let If {
        condition,
        then,
        els,
    } = if_st;
    let (then_body, then_cases) = collect_statement(*then)?;
    let then = Box::new(then_body);

    let Some(els) = els else {
        let result = If {
            condition,
            then,
            els: None,
        };
        return Ok((Statement::If(result), then_cases));
    };

    let (els_body, els_cases) = collect_statement(*els)?;
    if let Some(case) = els_cases.intersection(&then_cases).next() {
        return Err(SemAnalysisError::DuplicateCase(case.1.clone()));
    }
    let cases = els_cases.union(&then_cases).cloned().collect();
    let result = If {
        condition,
        then,
        els: Some(Box::new(els_body)),
    };
    Ok((Statement::If(result), cases))
}

fn collect_for_st(mut for_st: For) -> Result<(Statement, Cases)> {
    let (body, cases) = collect_statement(*for_st.body)?;
    for_st.body = Box::new(body);
    Ok((Statement::For(for_st), cases))
}

fn collect_dowhile(mut dowhile: DoWhile) -> Result<(Statement, Cases)> {
    let (body, cases) = collect_statement(*dowhile.body)?;
    dowhile.body = Box::new(body);
    Ok((Statement::DoWhile(dowhile), cases))
}

fn collect_while(mut while_st: While) -> Result<(Statement, Cases)> {
    let (body, cases) = collect_statement(*while_st.body)?;
    while_st.body = Box::new(body);
    Ok((Statement::While(while_st), cases))
}

fn collect_statement(statement: Statement) -> Result<(Statement, Cases)> {
    use Statement as S;
    match statement {
        S::Compound(block) => {
            collect_block(block).map(|(block, cases)| (S::Compound(block), cases))
        }
        S::Labeled(label, st) => collect_labeled_st(label, *st),
        S::DCased(dcased) => collect_dcased(dcased),
        S::Cased(cased) => collect_cased(cased),
        S::Switch(switch) => collect_switch(switch),
        S::If(if_st) => collect_if_st(if_st),
        S::For(for_st) => collect_for_st(for_st),
        S::DoWhile(dowhile) => collect_dowhile(dowhile),
        S::While(while_st) => collect_while(while_st),
        S::Null | S::Goto(_) | S::Return(_) | S::Continue(_) | S::Break(_) | S::Exp(_) => {
            Ok((statement, Cases::new()))
        }
    }
}

fn collect_bi(item: AstBlockItem) -> Result<(AstBlockItem, Cases)> {
    match item {
        AstBlockItem::S(st) => {
            let (st, cases) = collect_statement(st)?;
            Ok((AstBlockItem::S(st), cases))
        }
        AstBlockItem::D(_) => Ok((item, Cases::new())),
    }
}

fn collect_block(block: AstBlock) -> Result<(AstBlock, Cases)> {
    let AstBlock { items } = block;
    let mut cases = Cases::new();
    let mut result_items = AstBlockItems::new();

    for item in items {
        let (new_item, inner_cases) = collect_bi(item)?;
        if let Some(next) = cases.intersection(&inner_cases).next() {
            return Err(SemAnalysisError::DuplicateCase(next.1.clone()));
        }
        cases = cases.union(&inner_cases).cloned().collect();
        result_items.push(new_item);
    }
    let result_block = AstBlock {
        items: result_items,
    };
    Ok((result_block, cases))
}

fn collect_fundec(mut fundec: FunDec) -> Result<FunDec> {
    if let Some(body) = fundec.body {
        let (body, cases) = collect_block(body)?;
        if !cases.is_empty() {
            return Err(SemAnalysisError::CaseNotInSwitch);
        }
        fundec.body = Some(body);
    }
    Ok(fundec)
}

pub fn collect_cases(ast: Ast) -> Result<Ast> {
    let Ast { functions } = ast;
    let functions = functions
        .into_iter()
        .map(collect_fundec)
        .collect::<Result<Vec<_>>>()?;
    Ok(Ast { functions })
}
