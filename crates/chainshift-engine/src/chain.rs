//! Unrolls a nested call/member expression into a flat verb sequence.

use std::collections::VecDeque;

use chainshift_parser::{Expr, ExprKind};

/// One step of a fluent chain, in written order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainItem {
    pub verb: String,
    pub args: Vec<Expr>,
}

impl ChainItem {
    /// Best-effort reconstruction of the original call, for diagnostics.
    pub fn call_text(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(|a| a.text.as_str()).collect();
        format!("{}({})", self.verb, args.join(", "))
    }
}

/// Walks from the outermost call inward, collecting one item per verb.
/// Items are inserted at the front so the result reads left-to-right as
/// written. A bare identifier at the root terminates the walk; anything
/// else at the bottom truncates it silently. No verb is interpreted here.
pub fn extract_chain(expr: &Expr) -> Vec<ChainItem> {
    let mut items = VecDeque::new();
    let mut node = expr;
    loop {
        match &node.kind {
            ExprKind::Call { callee, args } => match &callee.kind {
                ExprKind::Member { object, property } => {
                    items.push_front(ChainItem {
                        verb: property.clone(),
                        args: args.clone(),
                    });
                    node = object;
                }
                ExprKind::Ident(name) => {
                    items.push_front(ChainItem {
                        verb: name.clone(),
                        args: args.clone(),
                    });
                    break;
                }
                _ => break,
            },
            ExprKind::Member { object, property } => {
                items.push_front(ChainItem {
                    verb: property.clone(),
                    args: Vec::new(),
                });
                node = object;
            }
            _ => break,
        }
    }
    items.into()
}
