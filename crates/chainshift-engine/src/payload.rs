//! Lowers an object-literal request body into an ordered sequence of
//! builder statements.

use chainshift_parser::{ExprKind, Property};

use crate::context::EmitCx;
use crate::literal::{render, render_key};

/// Builder statements (without terminators) plus the root builder name.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub statements: Vec<String>,
    pub root_var: String,
}

/// Each nested object literal allocates a fresh builder temp from the
/// shared counter, fills it, then attaches it to its parent under the
/// rendered key. Scalars attach directly.
pub fn build_payload(properties: &[Property], cx: &mut EmitCx) -> Payload {
    let mut statements = Vec::new();
    let root_var = build_object(properties, cx, &mut statements);
    Payload {
        statements,
        root_var,
    }
}

fn build_object(properties: &[Property], cx: &mut EmitCx, out: &mut Vec<String>) -> String {
    let var = format!("json{}", cx.next_id());
    out.push(format!("JSONObject {} = new JSONObject()", var));
    for property in properties {
        let key = render_key(&property.key);
        match &property.value.kind {
            ExprKind::Object(children) => {
                let child = build_object(children, cx, out);
                out.push(format!("{}.put({}, {})", var, key, child));
            }
            _ => {
                out.push(format!("{}.put({}, {})", var, key, render(&property.value)));
            }
        }
    }
    var
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainshift_parser::{parse_expr, ExprKind};
    use pretty_assertions::assert_eq;

    fn props_of(src: &str) -> Vec<Property> {
        match parse_expr(src).unwrap().kind {
            ExprKind::Object(props) => props,
            other => panic!("expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn test_flat_object() {
        let mut cx = EmitCx::new();
        let payload = build_payload(&props_of("{ a: 1, b: 'x' }"), &mut cx);
        assert_eq!(
            payload.statements,
            vec![
                "JSONObject json1 = new JSONObject()",
                "json1.put(\"a\", 1)",
                "json1.put(\"b\", \"x\")",
            ]
        );
        assert_eq!(payload.root_var, "json1");
    }

    #[test]
    fn test_nested_object_builds_child_first() {
        let mut cx = EmitCx::new();
        let payload = build_payload(&props_of("{ user: { name: 'bob' }, active: true }"), &mut cx);
        assert_eq!(
            payload.statements,
            vec![
                "JSONObject json1 = new JSONObject()",
                "JSONObject json2 = new JSONObject()",
                "json2.put(\"name\", \"bob\")",
                "json1.put(\"user\", json2)",
                "json1.put(\"active\", true)",
            ]
        );
    }

    #[test]
    fn test_quoted_keys_are_requoted() {
        let mut cx = EmitCx::new();
        let payload = build_payload(&props_of("{ 'content-type': 'json' }"), &mut cx);
        assert_eq!(
            payload.statements[1],
            "json1.put(\"content-type\", \"json\")"
        );
    }

    #[test]
    fn test_temp_names_respect_shared_counter() {
        let mut cx = EmitCx::new();
        cx.next_id(); // something else already allocated element1
        let payload = build_payload(&props_of("{ a: { b: 1 } }"), &mut cx);
        assert_eq!(payload.root_var, "json2");
        assert!(payload.statements[1].starts_with("JSONObject json3"));
    }
}
