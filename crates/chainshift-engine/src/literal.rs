//! Renders string and template literals into Java literal and
//! concatenation expressions. Everything the grammar does not treat as a
//! literal is carried through as verbatim source text.

use chainshift_parser::{Expr, ExprKind};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    /// Bracketed placeholder tokens recognized inside typed text.
    static ref KEY_TOKENS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("enter", "Keys.ENTER");
        m.insert("tab", "Keys.TAB");
        m.insert("esc", "Keys.ESCAPE");
        m.insert("escape", "Keys.ESCAPE");
        m.insert("backspace", "Keys.BACK_SPACE");
        m.insert("del", "Keys.DELETE");
        m.insert("uparrow", "Keys.ARROW_UP");
        m.insert("downarrow", "Keys.ARROW_DOWN");
        m.insert("leftarrow", "Keys.ARROW_LEFT");
        m.insert("rightarrow", "Keys.ARROW_RIGHT");
        m.insert("home", "Keys.HOME");
        m.insert("end", "Keys.END");
        m.insert("pageup", "Keys.PAGE_UP");
        m.insert("pagedown", "Keys.PAGE_DOWN");
        m
    };
    static ref KEY_TOKEN_RE: Regex = Regex::new(r"\{([a-zA-Z]+)\}").unwrap();
}

/// Quotes and escapes a value as a Java string literal.
pub fn java_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders an argument expression without placeholder substitution.
pub fn render(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Str(s) => java_string(s),
        ExprKind::Template(raw) => render_template(raw, false),
        ExprKind::Number(n) => n.clone(),
        ExprKind::Bool(b) => b.to_string(),
        ExprKind::Null => "null".to_string(),
        _ => expr.text.clone(),
    }
}

/// Renders typed text: like `render`, but bracketed key tokens in literal
/// segments are replaced by symbolic key constants, splicing the literal
/// into a concatenation when substitutions occur.
pub fn render_typed_text(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Str(s) => render_with_keys(s),
        ExprKind::Template(raw) => render_template(raw, true),
        _ => render(expr),
    }
}

/// Renders an object-literal key: surrounding quote markers are stripped
/// (by taking the cooked value) and the result is re-quoted.
pub fn render_key(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Ident(name) => java_string(name),
        ExprKind::Str(s) => java_string(s),
        ExprKind::Number(n) => java_string(n),
        _ => java_string(&expr.text),
    }
}

fn render_with_keys(value: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut cursor = 0;
    for cap in KEY_TOKEN_RE.captures_iter(value) {
        let whole = cap.get(0).unwrap();
        let name = cap.get(1).unwrap().as_str().to_lowercase();
        let Some(constant) = KEY_TOKENS.get(name.as_str()) else {
            continue; // unknown token stays literal text
        };
        if whole.start() > cursor {
            parts.push(java_string(&value[cursor..whole.start()]));
        }
        parts.push((*constant).to_string());
        cursor = whole.end();
    }
    if parts.is_empty() {
        return java_string(value);
    }
    if cursor < value.len() {
        parts.push(java_string(&value[cursor..]));
    }
    parts.join(" + ")
}

enum TplPart {
    Lit(String),
    Interp(String),
}

/// Splits template inner text into literal and `${...}` segments. The
/// lexer kept interpolation braces balanced, so a depth counter suffices.
fn split_template(raw: &str) -> Vec<TplPart> {
    let mut parts = Vec::new();
    let mut lit = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                chars.next();
                match next {
                    'n' => lit.push('\n'),
                    't' => lit.push('\t'),
                    'r' => lit.push('\r'),
                    other => lit.push(other),
                }
            }
            continue;
        }
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();
            if !lit.is_empty() {
                parts.push(TplPart::Lit(std::mem::take(&mut lit)));
            }
            let mut depth = 1usize;
            let mut interp = String::new();
            for inner in chars.by_ref() {
                match inner {
                    '{' => {
                        depth += 1;
                        interp.push(inner);
                    }
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        interp.push(inner);
                    }
                    _ => interp.push(inner),
                }
            }
            parts.push(TplPart::Interp(interp.trim().to_string()));
            continue;
        }
        lit.push(c);
    }
    if !lit.is_empty() {
        parts.push(TplPart::Lit(lit));
    }
    parts
}

fn render_template(raw: &str, substitute_keys: bool) -> String {
    let parts = split_template(raw);
    if parts.is_empty() {
        return java_string("");
    }
    let mut rendered: Vec<String> = Vec::new();
    for part in &parts {
        match part {
            TplPart::Lit(text) => {
                if substitute_keys {
                    rendered.push(render_with_keys(text));
                } else {
                    rendered.push(java_string(text));
                }
            }
            TplPart::Interp(code) => rendered.push(code.clone()),
        }
    }
    // A leading interpolation needs a string seed to keep the Java
    // expression string-typed.
    if matches!(parts.first(), Some(TplPart::Interp(_))) {
        rendered.insert(0, "\"\"".to_string());
    }
    rendered.join(" + ")
}
