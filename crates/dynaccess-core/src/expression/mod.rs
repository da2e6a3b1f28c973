//! DynamoDB expression construction and compilation.
//!
//! The pipeline is:
//!
//! 1. **Building**: [`Path`] methods produce immutable [`Condition`] and
//!    [`UpdateAction`] trees. The [`legacy`] module produces the same trees
//!    from the older operator/value-list maps.
//! 2. **Compiling**: [`compiler`] walks a tree and renders the expression
//!    string, interning every name and value into a [`PlaceholderTable`].
//! 3. **Merging**: the table becomes the request's
//!    `ExpressionAttributeNames` and `ExpressionAttributeValues`.

pub mod ast;
pub mod compiler;
pub mod legacy;
pub mod path;
pub mod placeholder;

pub use ast::{
    CompareOp, Condition, FunctionName, LogicalOp, Operand, PathElement, SetValue, UpdateAction,
};
pub use compiler::{compile_condition, compile_key_condition, compile_projection, compile_update};
pub use path::{Path, Size};
pub use placeholder::PlaceholderTable;

/// Errors produced while building or compiling an expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    /// A document path string could not be parsed.
    #[error("Invalid document path '{path}': {message}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Explanation.
        message: String,
    },
    /// An operand is invalid for the given operation.
    #[error("Invalid operand for {operation}: {message}")]
    InvalidOperand {
        /// The operation that failed.
        operation: String,
        /// Explanation.
        message: String,
    },
    /// Two update actions touch the same path in clauses that cannot coexist.
    #[error("Conflicting {first} and {second} actions on path {path}")]
    ConflictingActions {
        /// The shared path.
        path: String,
        /// Clause of the earlier action.
        first: &'static str,
        /// Clause of the later action.
        second: &'static str,
    },
    /// An update with no actions.
    #[error("Update expression requires at least one action")]
    EmptyUpdate,
    /// A condition cannot be used as a key condition.
    #[error("Invalid key condition: {0}")]
    InvalidKeyCondition(String),
    /// A legacy comparison operator is not allowed in this position.
    #[error("Unsupported comparison operator {operator} for {context}")]
    UnsupportedOperator {
        /// Where the operator appeared.
        context: &'static str,
        /// The operator name.
        operator: String,
    },
    /// A legacy comparison operator received the wrong number of values.
    #[error("Invalid number of argument(s) for the {operator} ComparisonOperator: {found}")]
    InvalidArity {
        /// The operator name.
        operator: String,
        /// How many values were supplied.
        found: usize,
    },
}
