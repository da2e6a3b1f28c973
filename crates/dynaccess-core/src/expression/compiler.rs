//! Renders condition and update trees into DynamoDB expression strings.
//!
//! All entry points walk the tree left to right and intern every name and
//! value into the caller's [`PlaceholderTable`], so one table can serve
//! several expressions of the same request. Boolean joins are always
//! parenthesized; the output never depends on operator precedence.

use dynaccess_model::AttributeValue;

use super::ExpressionError;
use super::ast::{CompareOp, Condition, FunctionName, Operand, PathElement, SetValue, UpdateAction};
use super::path::Path;
use super::placeholder::PlaceholderTable;

/// Compiles a condition or filter expression.
pub fn compile_condition(
    condition: &Condition,
    table: &mut PlaceholderTable,
) -> Result<String, ExpressionError> {
    match condition {
        Condition::Compare { left, op, right } => {
            let left = render_operand(left, table);
            let right = render_operand(right, table);
            Ok(format!("{left} {op} {right}"))
        }
        Condition::Between { value, low, high } => {
            let value = render_operand(value, table);
            let low = render_operand(low, table);
            let high = render_operand(high, table);
            Ok(format!("{value} BETWEEN {low} AND {high}"))
        }
        Condition::In { value, list } => {
            if list.is_empty() {
                return Err(ExpressionError::InvalidOperand {
                    operation: "IN".to_owned(),
                    message: "at least one candidate value is required".to_owned(),
                });
            }
            let value = render_operand(value, table);
            let list: Vec<String> = list.iter().map(|op| render_operand(op, table)).collect();
            Ok(format!("{value} IN ({})", list.join(", ")))
        }
        Condition::Function { name, args } => {
            validate_function_args(*name, args)?;
            let args: Vec<String> = args.iter().map(|op| render_operand(op, table)).collect();
            Ok(format!("{name} ({})", args.join(", ")))
        }
        Condition::Logical { op, left, right } => {
            let left = compile_condition(left, table)?;
            let right = compile_condition(right, table)?;
            Ok(format!("({left} {op} {right})"))
        }
        Condition::Not(inner) => {
            let inner = compile_condition(inner, table)?;
            Ok(format!("(NOT {inner})"))
        }
    }
}

/// Compiles an update expression.
///
/// Actions are grouped under `SET`, `REMOVE`, `ADD` and `DELETE`, in that
/// order, keeping the caller's order inside each clause.
pub fn compile_update(
    actions: &[UpdateAction],
    table: &mut PlaceholderTable,
) -> Result<String, ExpressionError> {
    if actions.is_empty() {
        return Err(ExpressionError::EmptyUpdate);
    }
    validate_update_actions(actions)?;

    let mut set_parts: Vec<String> = Vec::new();
    let mut remove_parts: Vec<String> = Vec::new();
    let mut add_parts: Vec<String> = Vec::new();
    let mut delete_parts: Vec<String> = Vec::new();

    // Placeholders are numbered in clause order, not in input order.
    for action in actions {
        if let UpdateAction::Set { path, value } = action {
            let path = render_path(path, table);
            let value = render_set_value(value, table);
            set_parts.push(format!("{path} = {value}"));
        }
    }
    for action in actions {
        if let UpdateAction::Remove { path } = action {
            remove_parts.push(render_path(path, table));
        }
    }
    for action in actions {
        if let UpdateAction::Add { path, value } = action {
            let path = render_path(path, table);
            let value = table.intern_value(value.clone());
            add_parts.push(format!("{path} {value}"));
        }
    }
    for action in actions {
        if let UpdateAction::Delete { path, value } = action {
            let path = render_path(path, table);
            let value = table.intern_value(value.clone());
            delete_parts.push(format!("{path} {value}"));
        }
    }

    let mut clauses: Vec<String> = Vec::new();
    if !set_parts.is_empty() {
        clauses.push(format!("SET {}", set_parts.join(", ")));
    }
    if !remove_parts.is_empty() {
        clauses.push(format!("REMOVE {}", remove_parts.join(", ")));
    }
    if !add_parts.is_empty() {
        clauses.push(format!("ADD {}", add_parts.join(", ")));
    }
    if !delete_parts.is_empty() {
        clauses.push(format!("DELETE {}", delete_parts.join(", ")));
    }

    Ok(clauses.join(" "))
}

/// Compiles a key condition expression.
///
/// `partition` must be `hash_key = value`. The partition clause always
/// renders first, ANDed with the optional sort key condition.
pub fn compile_key_condition(
    partition: &Condition,
    sort: Option<&Condition>,
    table: &mut PlaceholderTable,
) -> Result<String, ExpressionError> {
    let hash_key = match partition {
        Condition::Compare {
            left: Operand::Reference(path),
            op: CompareOp::Eq,
            right: Operand::Literal(_),
        } if path.elements().len() == 1 => path.top_attribute().unwrap_or_default(),
        _ => {
            return Err(ExpressionError::InvalidKeyCondition(
                "partition key condition must be an equality on a top-level attribute".to_owned(),
            ));
        }
    };

    let Some(sort) = sort else {
        return compile_condition(partition, table);
    };

    let range_key = sort_key_name(sort).ok_or_else(|| {
        ExpressionError::InvalidKeyCondition(
            "sort key condition must reference a top-level attribute".to_owned(),
        )
    })?;
    if range_key == hash_key {
        return Err(ExpressionError::InvalidKeyCondition(format!(
            "sort key condition references the partition key {hash_key}"
        )));
    }
    if !sort.is_valid_range_key_condition(range_key) {
        return Err(ExpressionError::InvalidKeyCondition(format!(
            "operator not supported on sort key {range_key}; use =, <, <=, >, >=, BETWEEN or begins_with"
        )));
    }

    let partition = compile_condition(partition, table)?;
    let sort = compile_condition(sort, table)?;
    Ok(format!("({partition} AND {sort})"))
}

/// Compiles a projection expression.
#[must_use]
pub fn compile_projection(paths: &[Path], table: &mut PlaceholderTable) -> String {
    paths
        .iter()
        .map(|path| render_path(path, table))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_path(path: &Path, table: &mut PlaceholderTable) -> String {
    let mut out = String::new();
    for (i, elem) in path.elements().iter().enumerate() {
        match elem {
            PathElement::Attribute(name) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(&table.intern_name(name));
            }
            PathElement::Index(idx) => {
                out.push('[');
                out.push_str(&idx.to_string());
                out.push(']');
            }
        }
    }
    out
}

fn render_operand(operand: &Operand, table: &mut PlaceholderTable) -> String {
    match operand {
        Operand::Literal(value) => table.intern_value(value.clone()),
        Operand::Reference(path) => render_path(path, table),
        Operand::Size(path) => format!("size ({})", render_path(path, table)),
    }
}

fn render_set_value(value: &SetValue, table: &mut PlaceholderTable) -> String {
    match value {
        SetValue::Operand(operand) => render_operand(operand, table),
        SetValue::Plus(a, b) => {
            let a = render_set_value(a, table);
            let b = render_set_value(b, table);
            format!("{a} + {b}")
        }
        SetValue::Minus(a, b) => {
            let a = render_set_value(a, table);
            let b = render_set_value(b, table);
            format!("{a} - {b}")
        }
        SetValue::IfNotExists(path, default) => {
            let path = render_path(path, table);
            let default = render_set_value(default, table);
            format!("if_not_exists ({path}, {default})")
        }
        SetValue::ListAppend(a, b) => {
            let a = render_set_value(a, table);
            let b = render_set_value(b, table);
            format!("list_append ({a}, {b})")
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn sort_key_name(condition: &Condition) -> Option<&str> {
    let operand = match condition {
        Condition::Compare { left, .. } => left,
        Condition::Between { value, .. } => value,
        Condition::Function { args, .. } => args.first()?,
        _ => return None,
    };
    match operand {
        Operand::Reference(path) if path.elements().len() == 1 => path.top_attribute(),
        _ => None,
    }
}

fn validate_function_args(name: FunctionName, args: &[Operand]) -> Result<(), ExpressionError> {
    let expected = match name {
        FunctionName::AttributeExists | FunctionName::AttributeNotExists => 1,
        FunctionName::AttributeType | FunctionName::BeginsWith | FunctionName::Contains => 2,
    };
    if args.len() != expected {
        return Err(ExpressionError::InvalidOperand {
            operation: name.to_string(),
            message: format!("expected {expected} argument(s), got {}", args.len()),
        });
    }
    if !matches!(args.first(), Some(Operand::Reference(_))) {
        return Err(ExpressionError::InvalidOperand {
            operation: name.to_string(),
            message: "first argument must be a document path".to_owned(),
        });
    }
    Ok(())
}

fn is_set(value: &AttributeValue) -> bool {
    matches!(
        value,
        AttributeValue::Ss(_) | AttributeValue::Ns(_) | AttributeValue::Bs(_)
    )
}

fn validate_update_actions(actions: &[UpdateAction]) -> Result<(), ExpressionError> {
    for (i, action) in actions.iter().enumerate() {
        match action {
            UpdateAction::Add { value, .. }
                if !(is_set(value) || matches!(value, AttributeValue::N(_))) =>
            {
                return Err(ExpressionError::InvalidOperand {
                    operation: "ADD".to_owned(),
                    message: format!(
                        "value must be a number or a set, got {}",
                        value.type_descriptor()
                    ),
                });
            }
            UpdateAction::Delete { value, .. } if !is_set(value) => {
                return Err(ExpressionError::InvalidOperand {
                    operation: "DELETE".to_owned(),
                    message: format!("value must be a set, got {}", value.type_descriptor()),
                });
            }
            _ => {}
        }

        for earlier in &actions[..i] {
            let clash = matches!(
                (earlier, action),
                (UpdateAction::Add { .. }, UpdateAction::Delete { .. })
                    | (UpdateAction::Delete { .. }, UpdateAction::Add { .. })
            );
            if clash && earlier.path() == action.path() {
                return Err(ExpressionError::ConflictingActions {
                    path: action.path().to_string(),
                    first: earlier.keyword(),
                    second: action.keyword(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_owned())
    }

    #[test]
    fn test_should_compile_key_condition_with_partition_first() {
        let mut table = PlaceholderTable::new();
        let sort = Path::new("Subject").begins_with("thread");
        let partition = Path::new("ForumName").equals("FooForum");
        let expr = compile_key_condition(&partition, Some(&sort), &mut table).unwrap();
        assert_eq!(expr, "(#0 = :0 AND begins_with (#1, :1))");

        let (names, values) = table.into_maps();
        assert_eq!(
            names,
            HashMap::from([
                ("#0".to_owned(), "ForumName".to_owned()),
                ("#1".to_owned(), "Subject".to_owned()),
            ])
        );
        assert_eq!(
            values,
            HashMap::from([(":0".to_owned(), s("FooForum")), (":1".to_owned(), s("thread"))])
        );
    }

    #[test]
    fn test_should_compile_partition_only_key_condition() {
        let mut table = PlaceholderTable::new();
        let partition = Path::new("ForumName").equals("FooForum");
        let expr = compile_key_condition(&partition, None, &mut table).unwrap();
        assert_eq!(expr, "#0 = :0");
    }

    #[test]
    fn test_should_reject_unsupported_sort_operator() {
        let mut table = PlaceholderTable::new();
        let partition = Path::new("ForumName").equals("FooForum");
        for sort in [
            Path::new("Subject").not_equals("x"),
            Path::new("Subject").contains("x"),
            Path::new("Subject").exists(),
            Path::new("Subject").is_in(["a", "b"]),
        ] {
            let err = compile_key_condition(&partition, Some(&sort), &mut table).unwrap_err();
            assert!(matches!(err, ExpressionError::InvalidKeyCondition(_)));
        }
    }

    #[test]
    fn test_should_reject_non_equality_partition() {
        let mut table = PlaceholderTable::new();
        let partition = Path::new("ForumName").begins_with("Foo");
        assert!(compile_key_condition(&partition, None, &mut table).is_err());
    }

    #[test]
    fn test_should_compile_single_set() {
        let mut table = PlaceholderTable::new();
        let expr = compile_update(&[Path::new("Subject").set("foo-subject")], &mut table).unwrap();
        assert_eq!(expr, "SET #0 = :0");
        let (names, values) = table.into_maps();
        assert_eq!(names["#0"], "Subject");
        assert_eq!(values[":0"], s("foo-subject"));
    }

    #[test]
    fn test_should_group_update_clauses_in_keyword_order() {
        let mut table = PlaceholderTable::new();
        let tags = AttributeValue::string_set(["old"]).unwrap();
        let actions = vec![
            Path::new("Views").add(1),
            Path::new("Tags").delete(tags),
            Path::new("Draft").remove(),
            Path::new("Subject").set("hello"),
            Path::new("Replies").set(Path::new("Replies").if_not_exists(0).plus(1)),
        ];
        let expr = compile_update(&actions, &mut table).unwrap();
        assert_eq!(
            expr,
            "SET #0 = :0, #1 = if_not_exists (#1, :1) + :2 REMOVE #2 ADD #3 :3 DELETE #4 :4"
        );
        let names = table.attribute_names();
        assert_eq!(names["#0"], "Subject");
        assert_eq!(names["#2"], "Draft");
        assert_eq!(names["#4"], "Tags");
    }

    #[test]
    fn test_should_render_list_append_and_nested_paths() {
        let mut table = PlaceholderTable::new();
        let comments = Path::parse("doc.comments").unwrap();
        let actions = vec![
            comments.set(comments.append(vec![s("c")])),
            Path::parse("doc.items[2]")
                .unwrap()
                .set(SetValue::from(Path::new("Total")).minus(3)),
        ];
        let expr = compile_update(&actions, &mut table).unwrap();
        assert_eq!(expr, "SET #0.#1 = list_append (#0.#1, :0), #0.#2[2] = #3 - :1");
    }

    #[test]
    fn test_should_reject_add_and_delete_on_same_path() {
        let mut table = PlaceholderTable::new();
        let tags = AttributeValue::string_set(["a"]).unwrap();
        let actions = vec![
            Path::new("Tags").add(tags.clone()),
            Path::new("Tags").delete(tags),
        ];
        let err = compile_update(&actions, &mut table).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::ConflictingActions {
                path: "Tags".to_owned(),
                first: "ADD",
                second: "DELETE",
            }
        );
    }

    #[test]
    fn test_should_allow_set_and_remove_on_same_path() {
        let mut table = PlaceholderTable::new();
        let actions = vec![Path::new("A").set(1), Path::new("A").remove()];
        assert_eq!(
            compile_update(&actions, &mut table).unwrap(),
            "SET #0 = :0 REMOVE #0"
        );
    }

    #[test]
    fn test_should_reject_empty_update_and_bad_operands() {
        let mut table = PlaceholderTable::new();
        assert_eq!(
            compile_update(&[], &mut table),
            Err(ExpressionError::EmptyUpdate)
        );
        assert!(compile_update(&[Path::new("A").add("text")], &mut table).is_err());
        assert!(compile_update(&[Path::new("A").delete(5)], &mut table).is_err());
    }

    #[test]
    fn test_should_parenthesize_every_boolean_join() {
        let mut table = PlaceholderTable::new();
        let condition = (Path::new("A").equals(1) | Path::new("B").less_than(2))
            & !Path::new("C").between(3, 4);
        let expr = compile_condition(&condition, &mut table).unwrap();
        assert_eq!(expr, "((#0 = :0 OR #1 < :1) AND (NOT #2 BETWEEN :2 AND :3))");
    }

    #[test]
    fn test_should_compile_functions_and_size() {
        let mut table = PlaceholderTable::new();
        let condition = Path::new("Tags").is_type("SS").unwrap()
            & Path::new("Tags").size().greater_than_or_equal(2)
            & Path::new("Status").is_in(["open", "closed"])
            & Path::new("Owner").does_not_exist();
        let expr = compile_condition(&condition, &mut table).unwrap();
        assert_eq!(
            expr,
            "(((attribute_type (#0, :0) AND size (#0) >= :1) AND #1 IN (:2, :3)) AND attribute_not_exists (#2))"
        );
    }

    #[test]
    fn test_should_compile_deterministically() {
        let condition = Path::new("Forum").equals("x") & Path::new("Views").greater_than(5);
        let first = compile_condition(&condition, &mut PlaceholderTable::new()).unwrap();
        let second = compile_condition(&condition, &mut PlaceholderTable::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_should_give_repeated_literals_fresh_tokens() {
        let mut table = PlaceholderTable::new();
        let condition = Path::new("A").equals("x") | Path::new("B").equals("x");
        let expr = compile_condition(&condition, &mut table).unwrap();
        assert_eq!(expr, "(#0 = :0 OR #1 = :1)");
        assert_eq!(table.attribute_values().len(), 2);
    }

    #[test]
    fn test_should_share_table_across_expressions() {
        let mut table = PlaceholderTable::new();
        let condition = compile_condition(&Path::new("Subject").exists(), &mut table).unwrap();
        let update = compile_update(&[Path::new("Subject").set("s")], &mut table).unwrap();
        let projection = compile_projection(&[Path::new("Subject"), Path::new("Body")], &mut table);
        assert_eq!(condition, "attribute_exists (#0)");
        assert_eq!(update, "SET #0 = :0");
        assert_eq!(projection, "#0, #1");
    }

    #[test]
    fn test_should_reject_empty_in_list() {
        let mut table = PlaceholderTable::new();
        let condition = Path::new("A").is_in(Vec::<Operand>::new());
        assert!(compile_condition(&condition, &mut table).is_err());
    }
}
