//! Translates fluent `expect(...)` matcher chains into single assertion
//! statements.

use crate::chain::ChainItem;
use crate::diag::Diagnostic;
use crate::literal::render;

#[derive(Debug, Clone, PartialEq)]
enum Matcher {
    IsTrue,
    IsFalse,
    IsNull,
    Equals,
}

/// Connective tokens that carry no meaning of their own.
const CONNECTIVES: &[&str] = &["to", "be", "and", "have", "that", "with"];

/// Reconstructs the written form of an assertion chain for diagnostics.
fn chain_text(items: &[ChainItem]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        if item.args.is_empty() && i > 0 {
            out.push_str(&item.verb);
        } else {
            out.push_str(&item.call_text());
        }
    }
    out
}

/// Scans an `expect`-headed item sequence and emits one assertion
/// statement (without terminator). Unrecognized vocabulary aborts the scan
/// with a diagnostic instead of an error: the caller splices it inline and
/// keeps going.
pub fn translate_assertion(items: &[ChainItem]) -> Result<String, Diagnostic> {
    debug_assert_eq!(items[0].verb, "expect");

    let target_arg = items[0].args.first().ok_or_else(|| {
        Diagnostic::new("expect", chain_text(items), "expect() without a target")
    })?;
    let mut target = render(target_arg);
    let mut matcher: Option<Matcher> = None;
    let mut expected: Option<String> = None;

    let mut i = 1;
    while i < items.len() {
        let item = &items[i];
        match item.verb.as_str() {
            verb if CONNECTIVES.contains(&verb) => {}
            "true" => matcher = Some(Matcher::IsTrue),
            "false" => matcher = Some(Matcher::IsFalse),
            "null" | "undefined" => matcher = Some(Matcher::IsNull),
            "eq" | "equal" | "equals" => {
                matcher = Some(Matcher::Equals);
                expected = item.args.first().map(render);
            }
            "deep" => {
                // Folds `deep.equal(x)` into plain equality.
                match items.get(i + 1) {
                    Some(next) if next.verb == "equal" || next.verb == "eq" => {
                        matcher = Some(Matcher::Equals);
                        expected = next.args.first().map(render);
                        i += 1;
                    }
                    _ => {
                        return Err(Diagnostic::new(
                            "deep",
                            chain_text(items),
                            "unsupported assertion chain",
                        ));
                    }
                }
            }
            "lessThan" | "greaterThan" => {
                let op = if item.verb == "lessThan" { "<" } else { ">" };
                let arg = item.args.first().ok_or_else(|| {
                    Diagnostic::new(
                        item.verb.clone(),
                        chain_text(items),
                        format!("{} without a comparison value", item.verb),
                    )
                })?;
                target = format!("{} {} {}", target, op, render(arg));
                matcher = Some(Matcher::IsTrue);
            }
            other => {
                return Err(Diagnostic::new(
                    other.to_string(),
                    chain_text(items),
                    format!("unsupported assertion matcher '{}'", other),
                ));
            }
        }
        i += 1;
    }

    match matcher {
        Some(Matcher::IsTrue) => Ok(format!("Assert.assertTrue({})", target)),
        Some(Matcher::IsFalse) => Ok(format!("Assert.assertFalse({})", target)),
        Some(Matcher::IsNull) => Ok(format!("Assert.assertNull({})", target)),
        Some(Matcher::Equals) => match expected {
            Some(expected) => Ok(format!("Assert.assertEquals({}, {})", target, expected)),
            None => Err(Diagnostic::new(
                "equal",
                chain_text(items),
                "equality matcher without an expected value",
            )),
        },
        None => Err(Diagnostic::new(
            "expect",
            chain_text(items),
            "assertion chain without a matcher",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::extract_chain;
    use chainshift_parser::parse_expr;
    use pretty_assertions::assert_eq;

    fn assert_stmt(src: &str) -> String {
        translate_assertion(&extract_chain(&parse_expr(src).unwrap())).unwrap()
    }

    fn assert_gap(src: &str) -> Diagnostic {
        translate_assertion(&extract_chain(&parse_expr(src).unwrap())).unwrap_err()
    }

    #[test]
    fn test_boolean_matchers() {
        assert_eq!(assert_stmt("expect(ok).to.be.true"), "Assert.assertTrue(ok)");
        assert_eq!(
            assert_stmt("expect(flag).to.be.false"),
            "Assert.assertFalse(flag)"
        );
    }

    #[test]
    fn test_null_and_undefined() {
        assert_eq!(assert_stmt("expect(x).to.be.null"), "Assert.assertNull(x)");
        assert_eq!(
            assert_stmt("expect(x).to.be.undefined"),
            "Assert.assertNull(x)"
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            assert_stmt("expect(name).to.equal('bob')"),
            "Assert.assertEquals(name, \"bob\")"
        );
    }

    #[test]
    fn test_deep_equal_folds_to_equality() {
        assert_eq!(
            assert_stmt("expect(a).to.deep.equal(b)"),
            assert_stmt("expect(a).to.equal(b)")
        );
    }

    #[test]
    fn test_relational_comparisons() {
        assert_eq!(
            assert_stmt("expect(count).to.be.lessThan(5)"),
            "Assert.assertTrue(count < 5)"
        );
        assert_eq!(
            assert_stmt("expect(count).to.be.greaterThan(0)"),
            "Assert.assertTrue(count > 0)"
        );
    }

    #[test]
    fn test_unknown_matcher_is_a_gap() {
        let diag = assert_gap("expect(x).to.contain('y')");
        assert!(diag.reason.contains("contain"));
        assert!(diag.call_text.contains("expect(x)"));
    }

    #[test]
    fn test_missing_expected_value_is_a_gap() {
        let diag = assert_gap("expect(x).to.equal()");
        assert!(diag.reason.contains("expected value"));
    }

    #[test]
    fn test_connectives_alone_are_a_gap() {
        let diag = assert_gap("expect(x).to.be");
        assert!(diag.reason.contains("without a matcher"));
    }
}
