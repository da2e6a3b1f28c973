//! Translation of the legacy `ComparisonOperator` maps into condition trees.
//!
//! `ScanFilter`, `QueryFilter`, `KeyConditions`, `Expected` and
//! `AttributeUpdates` predate expressions. They are folded into the same
//! [`Condition`] and [`UpdateAction`] trees the builder API produces, so the
//! compiler is the only place placeholders get assigned. Entries are visited
//! in sorted attribute order and joined left to right.

use std::collections::HashMap;

use dynaccess_model::AttributeValue;
use dynaccess_model::types::{
    AttributeAction, AttributeValueUpdate, ComparisonOperator, Condition as LegacyCondition,
    ConditionalOperator, ExpectedAttributeValue,
};

use super::ExpressionError;
use super::ast::{Condition, UpdateAction};
use super::path::Path;

/// Folds a `ScanFilter`/`QueryFilter` map into one condition.
///
/// Returns `None` for an empty map.
#[allow(clippy::implicit_hasher)]
pub fn condition_from_filter(
    filter: &HashMap<String, LegacyCondition>,
    conditional_operator: Option<ConditionalOperator>,
) -> Result<Option<Condition>, ExpressionError> {
    let mut sorted_keys: Vec<&String> = filter.keys().collect();
    sorted_keys.sort();

    let mut conditions = Vec::with_capacity(sorted_keys.len());
    for name in sorted_keys {
        let entry = &filter[name];
        conditions.push(comparison_to_condition(
            name,
            entry.comparison_operator,
            &entry.attribute_value_list,
        )?);
    }
    Ok(join(conditions, conditional_operator))
}

/// Folds an `Expected` map into one condition.
///
/// Returns `None` for an empty map.
#[allow(clippy::implicit_hasher)]
pub fn condition_from_expected(
    expected: &HashMap<String, ExpectedAttributeValue>,
    conditional_operator: Option<ConditionalOperator>,
) -> Result<Option<Condition>, ExpressionError> {
    let mut sorted_keys: Vec<&String> = expected.keys().collect();
    sorted_keys.sort();

    let mut conditions = Vec::with_capacity(sorted_keys.len());
    for name in sorted_keys {
        conditions.push(expected_to_condition(name, &expected[name])?);
    }
    Ok(join(conditions, conditional_operator))
}

/// Converts an `AttributeUpdates` map into update actions.
///
/// `PUT` becomes `SET`, `ADD` stays `ADD`, and `DELETE` becomes `DELETE`
/// with a value or `REMOVE` without one.
#[allow(clippy::implicit_hasher)]
pub fn actions_from_attribute_updates(
    updates: &HashMap<String, AttributeValueUpdate>,
) -> Result<Vec<UpdateAction>, ExpressionError> {
    let mut sorted_keys: Vec<&String> = updates.keys().collect();
    sorted_keys.sort();

    let mut actions = Vec::with_capacity(sorted_keys.len());
    for name in sorted_keys {
        let update = &updates[name];
        let path = Path::new(name.as_str());
        let action = update.action.unwrap_or(AttributeAction::Put);
        let requires_value = |action: AttributeAction| ExpressionError::InvalidOperand {
            operation: action.to_string(),
            message: format!("a value is required for attribute {name}"),
        };

        actions.push(match (action, &update.value) {
            (AttributeAction::Put, Some(value)) => path.set(value.clone()),
            (AttributeAction::Add, Some(value)) => path.add(value.clone()),
            (AttributeAction::Delete, Some(value)) => path.delete(value.clone()),
            (AttributeAction::Delete, None) => path.remove(),
            (action @ (AttributeAction::Put | AttributeAction::Add), None) => {
                return Err(requires_value(action));
            }
        });
    }
    Ok(actions)
}

/// Converts one `KeyConditions` entry on the sort key.
pub fn key_condition_from_legacy(
    name: &str,
    entry: &LegacyCondition,
) -> Result<Condition, ExpressionError> {
    match entry.comparison_operator {
        ComparisonOperator::Eq
        | ComparisonOperator::Le
        | ComparisonOperator::Lt
        | ComparisonOperator::Ge
        | ComparisonOperator::Gt
        | ComparisonOperator::BeginsWith
        | ComparisonOperator::Between => {
            comparison_to_condition(name, entry.comparison_operator, &entry.attribute_value_list)
        }
        other => Err(ExpressionError::UnsupportedOperator {
            context: "key condition",
            operator: other.to_string(),
        }),
    }
}

/// Builds the condition for one legacy operator applied to attribute `name`.
pub fn comparison_to_condition(
    name: &str,
    operator: ComparisonOperator,
    values: &[AttributeValue],
) -> Result<Condition, ExpressionError> {
    validate_comparison_operator(operator, values)?;

    let path = Path::new(name);
    let first = || values[0].clone();
    Ok(match operator {
        ComparisonOperator::Eq => path.equals(first()),
        ComparisonOperator::Ne => path.not_equals(first()),
        ComparisonOperator::Le => path.less_than_or_equal(first()),
        ComparisonOperator::Lt => path.less_than(first()),
        ComparisonOperator::Ge => path.greater_than_or_equal(first()),
        ComparisonOperator::Gt => path.greater_than(first()),
        ComparisonOperator::NotNull => path.exists(),
        ComparisonOperator::Null => path.does_not_exist(),
        ComparisonOperator::Contains => path.contains(first()),
        ComparisonOperator::NotContains => !path.contains(first()),
        ComparisonOperator::BeginsWith => path.begins_with(first()),
        ComparisonOperator::In => path.is_in(values.iter().cloned()),
        ComparisonOperator::Between => path.between(values[0].clone(), values[1].clone()),
    })
}

fn expected_to_condition(
    name: &str,
    expected: &ExpectedAttributeValue,
) -> Result<Condition, ExpressionError> {
    let invalid = |message: String| ExpressionError::InvalidOperand {
        operation: "Expected".to_owned(),
        message,
    };

    if let Some(operator) = expected.comparison_operator {
        if expected.value.is_some() || expected.exists.is_some() {
            return Err(invalid(format!(
                "Value or Exists cannot be used with ComparisonOperator for attribute ({name})"
            )));
        }
        return comparison_to_condition(name, operator, &expected.attribute_value_list);
    }

    let path = Path::new(name);
    match (expected.exists, &expected.value) {
        (Some(false), None) => Ok(path.does_not_exist()),
        (Some(false), Some(_)) => Err(invalid(format!(
            "Value cannot be used when Exists is set to FALSE for attribute ({name})"
        ))),
        (Some(true), None) => Ok(path.exists()),
        (_, Some(value)) => Ok(path.equals(value.clone())),
        (None, None) => Err(invalid(format!(
            "Value or ComparisonOperator must be used in Expected for attribute ({name})"
        ))),
    }
}

/// Validate the operand count and value types for a single `ComparisonOperator`.
fn validate_comparison_operator(
    operator: ComparisonOperator,
    values: &[AttributeValue],
) -> Result<(), ExpressionError> {
    let count = values.len();
    let arity_ok = match operator {
        ComparisonOperator::Eq
        | ComparisonOperator::Ne
        | ComparisonOperator::Lt
        | ComparisonOperator::Le
        | ComparisonOperator::Gt
        | ComparisonOperator::Ge
        | ComparisonOperator::BeginsWith
        | ComparisonOperator::Contains
        | ComparisonOperator::NotContains => count == 1,
        ComparisonOperator::Between => count == 2,
        ComparisonOperator::In => count > 0,
        ComparisonOperator::Null | ComparisonOperator::NotNull => count == 0,
    };
    if !arity_ok {
        return Err(ExpressionError::InvalidArity {
            operator: operator.to_string(),
            found: count,
        });
    }

    // CONTAINS/NOT_CONTAINS and IN only accept scalar types (S, N, B).
    let scalar_only = matches!(
        operator,
        ComparisonOperator::Contains | ComparisonOperator::NotContains | ComparisonOperator::In
    );
    if scalar_only {
        if let Some(value) = values.iter().find(|v| v.scalar_type().is_none()) {
            return Err(ExpressionError::InvalidOperand {
                operation: operator.to_string(),
                message: format!("{} is not a scalar value", value.type_descriptor()),
            });
        }
    }
    Ok(())
}

fn join(
    conditions: Vec<Condition>,
    conditional_operator: Option<ConditionalOperator>,
) -> Option<Condition> {
    let or = conditional_operator == Some(ConditionalOperator::Or);
    conditions
        .into_iter()
        .reduce(|acc, next| if or { acc | next } else { acc & next })
}
