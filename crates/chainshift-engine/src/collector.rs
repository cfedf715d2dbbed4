//! Collects custom command definitions and generates the driver subclass
//! that carries them.

use chainshift_parser::{Expr, ExprKind, Program, Stmt};
use thiserror::Error;

use crate::chain::extract_chain;
use crate::context::EmitCx;
use crate::diag::Diagnostic;
use crate::registry::CommandRegistry;
use crate::translator::translate_chain;

/// Name of the generated driver subclass.
pub const DRIVER_CLASS: &str = "CustomDriver";

/// A malformed definition is fatal: the registry must not be built from
/// undefined data.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("custom command name must be a string literal: `{text}`")]
    InvalidCommandName { text: String },
    #[error("custom command '{name}' must have a function body")]
    InvalidCommandBody { name: String },
}

#[derive(Debug)]
pub struct CollectedCommands {
    pub class_code: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Matches `Cypress.Commands.add(name, fn)`.
fn command_definition(expr: &Expr) -> Option<&[Expr]> {
    let (callee, args) = match &expr.kind {
        ExprKind::Call { callee, args } => (callee, args),
        _ => return None,
    };
    let (object, property) = match &callee.kind {
        ExprKind::Member { object, property } => (object, property),
        _ => return None,
    };
    if property != "add" {
        return None;
    }
    match &object.kind {
        ExprKind::Member { object, property } if property == "Commands" => match &object.kind {
            ExprKind::Ident(root) if root == "Cypress" => Some(args),
            _ => None,
        },
        _ => None,
    }
}

struct Definition<'a> {
    name: &'a str,
    params: &'a [String],
    body: &'a [Stmt],
}

pub fn collect_commands(
    program: &Program,
    registry: &mut CommandRegistry,
    cx: &mut EmitCx,
) -> Result<CollectedCommands, CollectError> {
    let mut definitions = Vec::new();

    // Register every name before translating any body, so commands that
    // call each other pass through instead of surfacing as unknown verbs.
    for stmt in &program.body {
        let expr = match stmt {
            Stmt::Expr(expr) => expr,
            _ => continue,
        };
        let args = match command_definition(expr) {
            Some(args) => args,
            None => continue,
        };
        let name = match args.first().and_then(|a| a.as_str_lit()) {
            Some(name) => name,
            None => {
                return Err(CollectError::InvalidCommandName {
                    text: expr.text.clone(),
                })
            }
        };
        let (params, body) = match args.get(1).map(|a| &a.kind) {
            Some(ExprKind::Function { params, body }) => (params.as_slice(), body.as_slice()),
            _ => {
                return Err(CollectError::InvalidCommandBody {
                    name: name.to_string(),
                })
            }
        };
        registry.insert(name.to_string());
        definitions.push(Definition { name, params, body });
    }

    let mut diagnostics = Vec::new();
    let mut code = String::new();
    code.push_str(&format!(
        "public class {} extends ChromeDriver {{\n",
        DRIVER_CLASS
    ));

    cx.indent = 2;
    for definition in &definitions {
        let params: Vec<String> = definition
            .params
            .iter()
            .map(|p| format!("String {}", p))
            .collect();
        code.push_str(&format!(
            "\n    public {} {}({}) {{\n",
            DRIVER_CLASS,
            definition.name,
            params.join(", ")
        ));
        for stmt in definition.body {
            let expr = match stmt {
                Stmt::Expr(expr) => expr,
                _ => continue,
            };
            let items = extract_chain(expr);
            if items.is_empty() {
                continue;
            }
            let translated = translate_chain(&items, "this", cx, registry);
            code.push_str(&translated.text);
            diagnostics.extend(translated.diagnostics);
        }
        // Returning the instance keeps caller chains fluent.
        code.push_str("        return this;\n    }\n");
    }
    cx.indent = 0;

    code.push_str("}\n");

    Ok(CollectedCommands {
        class_code: code,
        diagnostics,
    })
}
