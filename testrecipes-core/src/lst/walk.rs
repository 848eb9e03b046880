//! Pre-order traversal over the typed tree
//!
//! Recipes see every node through one [`NodeRef`] tag and dispatch with a
//! single `match`; the walker owns the recursion.

use super::*;

/// A borrowed node of any kind.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Class(&'a ClassDecl),
    Method(&'a MethodDecl),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

/// Visit every node of the unit, parents before children.
pub fn walk<'a>(unit: &'a CompilationUnit, visit: &mut dyn FnMut(NodeRef<'a>)) {
    for class in &unit.types {
        walk_class(class, visit);
    }
}

fn walk_class<'a>(class: &'a ClassDecl, visit: &mut dyn FnMut(NodeRef<'a>)) {
    visit(NodeRef::Class(class));
    for field in &class.fields {
        for init in &field.initializers {
            walk_expr(init, visit);
        }
    }
    for method in &class.methods {
        visit(NodeRef::Method(method));
        if let Some(body) = &method.body {
            walk_block(body, visit);
        }
    }
    for nested in &class.nested {
        walk_class(nested, visit);
    }
}

pub fn walk_block<'a>(block: &'a Block, visit: &mut dyn FnMut(NodeRef<'a>)) {
    for stmt in &block.statements {
        walk_stmt(stmt, visit);
    }
}

pub fn walk_stmt<'a>(stmt: &'a Stmt, visit: &mut dyn FnMut(NodeRef<'a>)) {
    visit(NodeRef::Stmt(stmt));
    match stmt {
        Stmt::Expression { expr, .. } => walk_expr(expr, visit),
        Stmt::LocalVar { initializers, .. } => {
            for init in initializers {
                walk_expr(init, visit);
            }
        }
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                walk_expr(value, visit);
            }
        }
        Stmt::Throw { value, .. } => walk_expr(value, visit),
        Stmt::Block(block) => walk_block(block, visit),
        Stmt::Compound { exprs, body, .. } => {
            for expr in exprs {
                walk_expr(expr, visit);
            }
            for s in body {
                walk_stmt(s, visit);
            }
        }
        Stmt::Other { .. } => {}
    }
}

pub fn walk_expr<'a>(expr: &'a Expr, visit: &mut dyn FnMut(NodeRef<'a>)) {
    visit(NodeRef::Expr(expr));
    if let Expr::Lambda(Lambda {
        body: LambdaBody::Block(block),
        ..
    }) = expr
    {
        walk_block(block, visit);
        return;
    }
    for child in expr.children() {
        walk_expr(child, visit);
    }
}

/// Every method invocation below a block, lambdas included.
pub fn invocations_in_block(block: &Block) -> Vec<&MethodInvocation> {
    let mut out = Vec::new();
    walk_block(block, &mut |node| {
        if let NodeRef::Expr(Expr::Invocation(inv)) = node {
            out.push(inv);
        }
    });
    out
}

/// Every method invocation in the unit.
pub fn invocations(unit: &CompilationUnit) -> Vec<&MethodInvocation> {
    let mut out = Vec::new();
    walk(unit, &mut |node| {
        if let NodeRef::Expr(Expr::Invocation(inv)) = node {
            out.push(inv);
        }
    });
    out
}
