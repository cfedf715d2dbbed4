//! The chain translator: turns an extracted verb sequence into imperative
//! driver statements.
//!
//! Translation of one chain accumulates fragments in a statement buffer.
//! A handler may extend the last fragment, start a new one, rewrite the
//! last one (typically into a temp-variable declaration), or clear the
//! buffer outright when the chain turns out not to be an element chain at
//! all. Gaps degrade to inline comments; a chain never fails as a whole.

use chainshift_parser::{Expr, ExprKind};

use crate::assertion::translate_assertion;
use crate::chain::ChainItem;
use crate::context::EmitCx;
use crate::diag::{Diagnostic, Translation};
use crate::literal::{java_string, render, render_typed_text};
use crate::payload::build_payload;
use crate::registry::CommandRegistry;
use crate::verb::{suggest, Verb};
use crate::walker;

#[derive(Debug)]
enum Fragment {
    /// A single growing statement; padded and terminated at flush time.
    Stmt(String),
    /// Preformatted lines (nested callback output, try/catch); emitted
    /// verbatim.
    Block(String),
}

#[derive(Debug)]
struct StatementBuffer {
    fragments: Vec<Fragment>,
    diagnostics: Vec<Diagnostic>,
}

impl StatementBuffer {
    fn seeded(receiver: &str) -> Self {
        Self {
            fragments: vec![Fragment::Stmt(receiver.to_string())],
            diagnostics: Vec::new(),
        }
    }

    /// Extends the current statement. If there is none to extend (the
    /// buffer was cleared or ended in a block), a new one is started on
    /// the receiver.
    fn append(&mut self, suffix: &str, receiver: &str) {
        match self.fragments.last_mut() {
            Some(Fragment::Stmt(s)) => s.push_str(suffix),
            _ => self
                .fragments
                .push(Fragment::Stmt(format!("{}{}", receiver, suffix))),
        }
    }

    fn push_stmt(&mut self, text: String) {
        self.fragments.push(Fragment::Stmt(text));
    }

    fn push_block(&mut self, text: String) {
        self.fragments.push(Fragment::Block(text));
    }

    /// Removes and returns the current statement expression so it can be
    /// rebuilt (temp declaration, try/catch wrap). Falls back to the
    /// receiver when there is nothing to take.
    fn take_last(&mut self, receiver: &str) -> String {
        match self.fragments.pop() {
            Some(Fragment::Stmt(s)) => s,
            Some(block) => {
                self.fragments.push(block);
                receiver.to_string()
            }
            None => receiver.to_string(),
        }
    }

    fn clear(&mut self) {
        self.fragments.clear();
    }

    fn gap(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    /// Joins everything into one indented statement block. Diagnostic
    /// comments come first; fragments that are still a bare identifier
    /// (a re-exposed temp nothing attached to) are dropped.
    fn flush(self, cx: &EmitCx) -> (String, Vec<Diagnostic>) {
        let pad = cx.pad();
        let mut out = String::new();
        for diag in &self.diagnostics {
            out.push_str(&pad);
            out.push_str(&diag.render_comment());
            out.push('\n');
        }
        for fragment in self.fragments {
            match fragment {
                Fragment::Stmt(s) => {
                    if is_bare_ident(&s) {
                        continue;
                    }
                    out.push_str(&pad);
                    out.push_str(&s);
                    out.push_str(";\n");
                }
                Fragment::Block(b) => out.push_str(&b),
            }
        }
        (out, self.diagnostics)
    }
}

fn is_bare_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Rewrites the single-element lookup in a fragment into a multi-element
/// one. Returns None when the fragment has no lookup to rewrite.
fn to_multi_lookup(fragment: &str) -> Option<String> {
    let at = fragment.rfind(".findElement(")?;
    let mut rewritten = String::with_capacity(fragment.len() + 1);
    rewritten.push_str(&fragment[..at]);
    rewritten.push_str(".findElements(");
    rewritten.push_str(&fragment[at + ".findElement(".len()..]);
    Some(rewritten)
}

/// Recognized `should` state descriptors, mapped to an assert method and
/// an element query.
fn state_descriptor(descriptor: &str) -> Option<(&'static str, &'static str)> {
    match descriptor {
        "be.visible" => Some(("assertTrue", "isDisplayed")),
        "not.be.visible" => Some(("assertFalse", "isDisplayed")),
        "be.checked" => Some(("assertTrue", "isSelected")),
        "not.be.checked" => Some(("assertFalse", "isSelected")),
        "be.enabled" => Some(("assertTrue", "isEnabled")),
        "be.disabled" => Some(("assertFalse", "isEnabled")),
        _ => None,
    }
}

pub fn translate_chain(
    items: &[ChainItem],
    receiver: &str,
    cx: &mut EmitCx,
    registry: &CommandRegistry,
) -> Translation {
    let mut result = Translation::new();
    if items.is_empty() {
        return result;
    }

    // Assertion chains have their own grammar.
    if items[0].verb == "expect" {
        match translate_assertion(items) {
            Ok(stmt) => result.push_line(&format!("{}{};", cx.pad(), stmt)),
            Err(diag) => {
                result.push_line(&format!("{}{}", cx.pad(), diag.render_comment()));
                result.diagnostics.push(diag);
            }
        }
        return result;
    }

    let mut buf = StatementBuffer::seeded(receiver);
    // Gaps from nested callbacks are already rendered inline in their own
    // blocks; they are forwarded to the caller without re-rendering.
    let mut forwarded: Vec<Diagnostic> = Vec::new();

    for (idx, item) in items.iter().enumerate() {
        let is_final = idx + 1 == items.len();
        match Verb::resolve(&item.verb, registry) {
            Verb::Get | Verb::Find => match item.args.first() {
                Some(arg) => {
                    buf.append(
                        &format!(".findElement(By.cssSelector({}))", render(arg)),
                        receiver,
                    );
                }
                None => buf.gap(Diagnostic::new(
                    item.verb.clone(),
                    item.call_text(),
                    format!("{}() without a selector", item.verb),
                )),
            },

            Verb::Contains => match item.args.first() {
                None => buf.gap(Diagnostic::new(
                    "contains",
                    item.call_text(),
                    "contains() without text",
                )),
                Some(arg) if is_final && idx > 0 => {
                    // Trailing contains asserts on the located element.
                    let prior = buf.take_last(receiver);
                    let var = format!("element{}", cx.next_id());
                    buf.push_stmt(format!("WebElement {} = {}", var, prior));
                    buf.push_stmt(format!(
                        "Assert.assertTrue({}.getText().contains({}))",
                        var,
                        render(arg)
                    ));
                }
                Some(arg) => {
                    let xpath = match arg.as_str_lit() {
                        Some(s) => java_string(&format!("//*[contains(text(), '{}')]", s)),
                        None => format!(
                            "\"//*[contains(text(), '\" + {} + \"')]\"",
                            render(arg)
                        ),
                    };
                    buf.append(&format!(".findElement(By.xpath({}))", xpath), receiver);
                }
            },

            Verb::First => match rewrite_lookup(&mut buf, receiver, item) {
                Some(rewritten) => buf.push_stmt(format!("{}.get(0)", rewritten)),
                None => {}
            },
            Verb::Eq => {
                let index = match item.args.first().map(|a| &a.kind) {
                    Some(ExprKind::Number(n)) => Some(n.clone()),
                    _ => None,
                };
                match index {
                    None => buf.gap(Diagnostic::new(
                        "eq",
                        item.call_text(),
                        "eq() with a non-numeric index",
                    )),
                    Some(n) => {
                        if let Some(rewritten) = rewrite_lookup(&mut buf, receiver, item) {
                            buf.push_stmt(format!("{}.get({})", rewritten, n));
                        }
                    }
                }
            }
            Verb::Last => {
                if let Some(rewritten) = rewrite_lookup(&mut buf, receiver, item) {
                    let var = format!("elements{}", cx.next_id());
                    buf.push_stmt(format!("List<WebElement> {} = {}", var, rewritten));
                    buf.push_stmt(format!("{var}.get({var}.size() - 1)", var = var));
                }
            }

            Verb::Click => buf.append(".click()", receiver),
            Verb::Clear => buf.append(".clear()", receiver),
            Verb::Check | Verb::Uncheck => buf.append(".click()", receiver),
            Verb::DblClick => {
                let prior = buf.take_last(receiver);
                let var = format!("element{}", cx.next_id());
                buf.push_stmt(format!("WebElement {} = {}", var, prior));
                buf.push_stmt(format!("{}.click()", var));
                buf.push_stmt(format!("{}.click()", var));
                buf.push_stmt(var);
            }
            Verb::Type => match item.args.first() {
                Some(arg) => {
                    buf.append(&format!(".sendKeys({})", render_typed_text(arg)), receiver)
                }
                None => buf.gap(Diagnostic::new(
                    "type",
                    item.call_text(),
                    "type() without text",
                )),
            },

            Verb::Visit => match item.args.first() {
                Some(arg) => buf.append(&format!(".get({})", render(arg)), receiver),
                None => buf.gap(Diagnostic::new(
                    "visit",
                    item.call_text(),
                    "visit() without a URL",
                )),
            },
            Verb::Reload => buf.append(".navigate().refresh()", receiver),
            Verb::Go => match item.args.first().and_then(|a| a.as_str_lit()) {
                Some("back") => buf.append(".navigate().back()", receiver),
                Some("forward") => buf.append(".navigate().forward()", receiver),
                _ => buf.gap(Diagnostic::new(
                    "go",
                    item.call_text(),
                    "go() expects 'back' or 'forward'",
                )),
            },

            Verb::Wait => match item.args.first().map(|a| &a.kind) {
                Some(ExprKind::Number(ms)) => {
                    let sleep = format!("Thread.sleep({})", ms);
                    let prior = buf.take_last(receiver);
                    if prior == receiver {
                        buf.push_stmt(sleep);
                    } else {
                        let var = format!("element{}", cx.next_id());
                        buf.push_stmt(format!("WebElement {} = {}", var, prior));
                        buf.push_stmt(sleep);
                        buf.push_stmt(var);
                    }
                }
                _ => buf.gap(Diagnostic::new(
                    "wait",
                    item.call_text(),
                    "wait() without a millisecond literal",
                )),
            },

            Verb::Should => {
                translate_should(item, &mut buf, receiver, cx);
            }

            Verb::Request => {
                if idx != 0 {
                    buf.gap(Diagnostic::new(
                        "request",
                        item.call_text(),
                        "request() must start a chain",
                    ));
                } else {
                    translate_request(item, &mut buf, cx);
                }
            }

            Verb::Then => match item.args.first().map(|a| &a.kind) {
                Some(ExprKind::Function { body, .. }) => {
                    let nested = walker::walk_callback(body, receiver, cx, registry);
                    forwarded.extend(nested.diagnostics);
                    buf.push_block(nested.text);
                }
                _ => buf.gap(Diagnostic::new(
                    "then",
                    item.call_text(),
                    "then() without a callback",
                )),
            },
            Verb::Within => match item.args.first().map(|a| &a.kind) {
                Some(ExprKind::Function { body, .. }) => {
                    let prior = buf.take_last(receiver);
                    let var = format!("scopeElement{}", cx.next_id());
                    buf.push_stmt(format!("WebElement {} = {}", var, prior));
                    let nested = walker::walk_callback(body, &var, cx, registry);
                    forwarded.extend(nested.diagnostics);
                    buf.push_block(nested.text);
                    buf.push_stmt(var);
                }
                _ => buf.gap(Diagnostic::new(
                    "within",
                    item.call_text(),
                    "within() without a callback",
                )),
            },

            Verb::Expect => buf.gap(Diagnostic::new(
                "expect",
                item.call_text(),
                "expect() inside a chain",
            )),

            Verb::Custom(name) => {
                let args: Vec<String> = item.args.iter().map(render).collect();
                buf.append(&format!(".{}({})", name, args.join(", ")), receiver);
            }

            Verb::Unknown(name) => {
                let suggestion = suggest(&name);
                buf.gap(
                    Diagnostic::new(
                        name.clone(),
                        item.call_text(),
                        format!("unknown verb '{}'", name),
                    )
                    .with_suggestion(suggestion),
                );
            }
        }
    }

    let (text, diagnostics) = buf.flush(cx);
    result.push_str(&text);
    result.diagnostics.extend(diagnostics);
    result.diagnostics.extend(forwarded);
    result
}

/// Shared first/eq/last prelude: pops the current fragment and switches
/// its lookup to findElements. On failure the fragment is restored and a
/// gap recorded.
fn rewrite_lookup(
    buf: &mut StatementBuffer,
    receiver: &str,
    item: &ChainItem,
) -> Option<String> {
    let prior = buf.take_last(receiver);
    match to_multi_lookup(&prior) {
        Some(rewritten) => Some(rewritten),
        None => {
            buf.push_stmt(prior);
            buf.gap(Diagnostic::new(
                item.verb.clone(),
                item.call_text(),
                format!("{}() without a preceding element lookup", item.verb),
            ));
            None
        }
    }
}

fn translate_should(item: &ChainItem, buf: &mut StatementBuffer, receiver: &str, cx: &mut EmitCx) {
    let descriptor = match item.args.first().and_then(|a| a.as_str_lit()) {
        Some(d) => d.to_string(),
        None => {
            buf.gap(Diagnostic::new(
                "should",
                item.call_text(),
                "should() expects a literal state descriptor",
            ));
            return;
        }
    };

    if descriptor == "not.exist" {
        let prior = buf.take_last(receiver);
        let block = format!(
            "{p}try {{\n{p1}{prior};\n{p1}Assert.fail(\"Element should not exist\");\n{p}}} catch (NoSuchElementException ignored) {{\n{p}}}\n",
            p = cx.pad(),
            p1 = cx.pad_at(1),
            prior = prior,
        );
        buf.push_block(block);
        return;
    }

    if descriptor == "exist" {
        let prior = buf.take_last(receiver);
        let var = format!("element{}", cx.next_id());
        buf.push_stmt(format!("WebElement {} = {}", var, prior));
        buf.push_stmt(format!("Assert.assertNotNull({})", var));
        buf.push_stmt(var);
        return;
    }

    match state_descriptor(&descriptor) {
        Some((assert_method, query_method)) => {
            let prior = buf.take_last(receiver);
            let var = format!("element{}", cx.next_id());
            buf.push_stmt(format!("WebElement {} = {}", var, prior));
            buf.push_stmt(format!(
                "Assert.{}({}.{}())",
                assert_method, var, query_method
            ));
            buf.push_stmt(var);
        }
        None => buf.gap(Diagnostic::new(
            "should",
            item.call_text(),
            format!("unsupported state descriptor '{}'", descriptor),
        )),
    }
}

fn translate_request(item: &ChainItem, buf: &mut StatementBuffer, cx: &mut EmitCx) {
    // The chain is a request block, not an element chain: anything
    // buffered so far (the seeded receiver) is discarded.
    buf.clear();

    let arg = match item.args.first() {
        Some(arg) => arg,
        None => {
            buf.gap(Diagnostic::new(
                "request",
                item.call_text(),
                "request() without a URL or options",
            ));
            return;
        }
    };

    let mut url = None;
    let mut method = "GET".to_string();
    let mut body: Option<&Expr> = None;

    match &arg.kind {
        ExprKind::Object(props) => {
            for prop in props {
                let key = match &prop.key.kind {
                    ExprKind::Ident(name) => name.clone(),
                    ExprKind::Str(s) => s.clone(),
                    _ => continue,
                };
                match key.as_str() {
                    "url" => url = Some(render(&prop.value)),
                    "method" => match prop.value.as_str_lit() {
                        Some(m) => method = m.to_uppercase(),
                        None => buf.gap(Diagnostic::new(
                            "request",
                            item.call_text(),
                            "request() method must be a string literal",
                        )),
                    },
                    "body" => body = Some(&prop.value),
                    _ => {}
                }
            }
        }
        _ => url = Some(render(arg)),
    }

    let url = match url {
        Some(url) => url,
        None => {
            buf.gap(Diagnostic::new(
                "request",
                item.call_text(),
                "request() options without a url",
            ));
            return;
        }
    };

    let id = cx.next_id();
    buf.push_stmt(format!("URL url{} = new URL({})", id, url));
    buf.push_stmt(format!(
        "HttpURLConnection conn{id} = (HttpURLConnection) url{id}.openConnection()",
        id = id
    ));
    buf.push_stmt(format!("conn{}.setRequestMethod(\"{}\")", id, method));

    if let Some(body) = body {
        match &body.kind {
            ExprKind::Object(props) => {
                let payload = build_payload(props, cx);
                for stmt in payload.statements {
                    buf.push_stmt(stmt);
                }
                buf.push_stmt(format!(
                    "String body{} = {}.toString()",
                    id, payload.root_var
                ));
            }
            _ => buf.push_stmt(format!("String body{} = {}", id, render(body))),
        }
        buf.push_stmt(format!("conn{}.setDoOutput(true)", id));
        buf.push_stmt(format!(
            "conn{id}.getOutputStream().write(body{id}.getBytes())",
            id = id
        ));
    }
}
