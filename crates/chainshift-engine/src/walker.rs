//! Depth-first traversal of a test or callback body.
//!
//! Call-expression statements are handed to the chain translator;
//! control-flow statements keep their header text verbatim and recurse one
//! indent level deeper; everything else is traversed transparently so
//! chains buried in arbitrary nesting are still found.

use chainshift_parser::{ExprKind, Stmt};

use crate::chain::extract_chain;
use crate::context::EmitCx;
use crate::diag::Translation;
use crate::registry::CommandRegistry;
use crate::translator::translate_chain;

pub fn walk_block(
    stmts: &[Stmt],
    receiver: &str,
    cx: &mut EmitCx,
    registry: &CommandRegistry,
) -> Translation {
    let mut out = Translation::new();
    for stmt in stmts {
        walk_stmt(stmt, receiver, cx, registry, &mut out);
    }
    out
}

/// Entry point for chain-step callbacks (`then`, `within`): the body is
/// walked one indent level deeper.
pub fn walk_callback(
    stmts: &[Stmt],
    receiver: &str,
    cx: &mut EmitCx,
    registry: &CommandRegistry,
) -> Translation {
    cx.indent += 1;
    let out = walk_block(stmts, receiver, cx, registry);
    cx.indent -= 1;
    out
}

fn walk_stmt(
    stmt: &Stmt,
    receiver: &str,
    cx: &mut EmitCx,
    registry: &CommandRegistry,
    out: &mut Translation,
) {
    match stmt {
        Stmt::Expr(expr) => {
            let items = extract_chain(expr);
            if items.is_empty() {
                return;
            }
            out.absorb(translate_chain(&items, receiver, cx, registry));
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            out.push_line(&format!("{}if ({}) {{", cx.pad(), condition.text));
            cx.indent += 1;
            let then_t = walk_block(then_branch, receiver, cx, registry);
            cx.indent -= 1;
            out.absorb(then_t);
            if let Some(else_branch) = else_branch {
                out.push_line(&format!("{}}} else {{", cx.pad()));
                cx.indent += 1;
                let else_t = walk_block(else_branch, receiver, cx, registry);
                cx.indent -= 1;
                out.absorb(else_t);
            }
            out.push_line(&format!("{}}}", cx.pad()));
        }
        Stmt::Loop { header, body } => {
            out.push_line(&format!("{}{} {{", cx.pad(), header));
            cx.indent += 1;
            let body_t = walk_block(body, receiver, cx, registry);
            cx.indent -= 1;
            out.absorb(body_t);
            out.push_line(&format!("{}}}", cx.pad()));
        }
        Stmt::Block(stmts) => {
            out.absorb(walk_block(stmts, receiver, cx, registry));
        }
        Stmt::Decl { init: Some(init), .. } => {
            // Function-valued declarations are traversed so chains inside
            // helper closures are not lost; nothing is emitted for the
            // declaration itself.
            if let ExprKind::Function { body, .. } = &init.kind {
                out.absorb(walk_block(body, receiver, cx, registry));
            }
        }
        Stmt::Decl { init: None, .. } | Stmt::Return(_) | Stmt::Empty => {}
    }
}
