//! Assembles translated hook and test bodies into Java test classes.

use chainshift_parser::{Expr, ExprKind, Program, Stmt};

use crate::context::EmitCx;
use crate::diag::{Diagnostic, Translation};
use crate::registry::CommandRegistry;
use crate::walker::walk_block;

/// Receiver name chains are rewritten against inside test bodies.
pub const DEFAULT_RECEIVER: &str = "driver";

/// Statement indent inside a test method body.
const BODY_INDENT: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedClass {
    pub class_name: String,
    pub code: String,
}

#[derive(Debug, Default)]
pub struct AssembledSuites {
    pub classes: Vec<GeneratedClass>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Splits a statement of the shape `name(...)` into callee name and args.
fn call_parts(expr: &Expr) -> Option<(&str, &[Expr])> {
    match &expr.kind {
        ExprKind::Call { callee, args } => match &callee.kind {
            ExprKind::Ident(name) => Some((name.as_str(), args)),
            _ => None,
        },
        _ => None,
    }
}

/// The trailing callback argument, when present.
fn callback_body(args: &[Expr]) -> Option<&[Stmt]> {
    match args.last().map(|a| &a.kind) {
        Some(ExprKind::Function { body, .. }) => Some(body),
        _ => None,
    }
}

/// Strips whitespace from a suite description and appends the class
/// suffix.
pub fn class_name(description: &str) -> String {
    let base: String = description
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if base.is_empty() {
        "GeneratedTest".to_string()
    } else {
        format!("{}Test", base)
    }
}

/// Replaces whitespace in a test description with underscores.
pub fn method_name(description: &str) -> String {
    let mut name: String = description
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        name = "test".to_string();
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

pub fn assemble_suites(
    program: &Program,
    cx: &mut EmitCx,
    registry: &CommandRegistry,
) -> AssembledSuites {
    let mut result = AssembledSuites::default();

    for stmt in &program.body {
        let expr = match stmt {
            Stmt::Expr(expr) => expr,
            _ => continue,
        };
        let Some(("describe", args)) = call_parts(expr) else {
            continue;
        };
        let description = args.first().and_then(|a| a.as_str_lit());
        let body = callback_body(args);
        match (description, body) {
            (Some(description), Some(body)) => {
                let (class, diags) = assemble_class(description, body, cx, registry);
                result.classes.push(class);
                result.diagnostics.extend(diags);
            }
            _ => {
                result.diagnostics.push(Diagnostic::new(
                    "describe",
                    expr.text.clone(),
                    "describe() requires a literal description and a callback",
                ));
            }
        }
    }

    result
}

fn assemble_class(
    description: &str,
    suite_body: &[Stmt],
    cx: &mut EmitCx,
    registry: &CommandRegistry,
) -> (GeneratedClass, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut setup = Translation::new();
    let mut teardown = Translation::new();
    let mut tests: Vec<(String, Translation)> = Vec::new();

    cx.indent = BODY_INDENT;
    for stmt in suite_body {
        let expr = match stmt {
            Stmt::Expr(expr) => expr,
            _ => continue,
        };
        let Some((name, args)) = call_parts(expr) else {
            continue;
        };
        match name {
            "beforeEach" | "before" => match callback_body(args) {
                Some(body) => setup.absorb(walk_block(body, DEFAULT_RECEIVER, cx, registry)),
                None => diagnostics.push(Diagnostic::new(
                    name.to_string(),
                    expr.text.clone(),
                    format!("{}() without a callback", name),
                )),
            },
            "afterEach" | "after" => match callback_body(args) {
                Some(body) => teardown.absorb(walk_block(body, DEFAULT_RECEIVER, cx, registry)),
                None => diagnostics.push(Diagnostic::new(
                    name.to_string(),
                    expr.text.clone(),
                    format!("{}() without a callback", name),
                )),
            },
            "it" => {
                let test_description = args.first().and_then(|a| a.as_str_lit());
                match (test_description, callback_body(args)) {
                    (Some(test_description), Some(body)) => {
                        let translated = walk_block(body, DEFAULT_RECEIVER, cx, registry);
                        tests.push((method_name(test_description), translated));
                    }
                    _ => diagnostics.push(Diagnostic::new(
                        "it",
                        expr.text.clone(),
                        "it() requires a literal description and a callback",
                    )),
                }
            }
            _ => {}
        }
    }
    cx.indent = 0;

    let mut code = String::new();
    code.push_str(&format!("public class {} {{\n\n", class_name(description)));
    code.push_str("    private WebDriver driver;\n\n");

    // Driver setup always runs first; an explicit hook body follows it.
    code.push_str("    @Before\n    public void setUp() {\n");
    code.push_str("        driver = new ChromeDriver();\n");
    code.push_str(&setup.text);
    code.push_str("    }\n");
    diagnostics.extend(setup.diagnostics);

    for (name, translated) in tests {
        code.push_str(&format!("\n    @Test\n    public void {}() {{\n", name));
        code.push_str(&translated.text);
        code.push_str("    }\n");
        diagnostics.extend(translated.diagnostics);
    }

    code.push_str("\n    @After\n    public void tearDown() {\n");
    code.push_str(&teardown.text);
    code.push_str("        driver.quit();\n");
    code.push_str("    }\n}\n");
    diagnostics.extend(teardown.diagnostics);

    (
        GeneratedClass {
            class_name: class_name(description),
            code,
        },
        diagnostics,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_strips_whitespace() {
        assert_eq!(class_name("Login Page"), "LoginPageTest");
        assert_eq!(class_name("  "), "GeneratedTest");
    }

    #[test]
    fn test_method_name_replaces_whitespace() {
        assert_eq!(method_name("logs in"), "logs_in");
        assert_eq!(method_name("2 items shown"), "_2_items_shown");
        assert_eq!(method_name("strips, punctuation!"), "strips_punctuation");
    }
}
