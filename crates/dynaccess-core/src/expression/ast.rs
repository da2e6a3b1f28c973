//! AST types for client-built DynamoDB expressions.
//!
//! Unlike a parsed expression, operands here hold real attribute names and
//! values. Placeholders only appear once the tree is compiled.

use std::collections::HashSet;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use dynaccess_model::{AttributeValue, Item};

use super::path::Path;

/// Condition AST node for condition, filter and key-condition expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Comparison expression: `left op right`.
    Compare {
        /// Left-hand operand.
        left: Operand,
        /// Comparison operator.
        op: CompareOp,
        /// Right-hand operand.
        right: Operand,
    },
    /// Between expression: `value BETWEEN low AND high`.
    Between {
        /// Value to test.
        value: Operand,
        /// Lower bound (inclusive).
        low: Operand,
        /// Upper bound (inclusive).
        high: Operand,
    },
    /// In expression: `value IN (list...)`.
    In {
        /// Value to search for.
        value: Operand,
        /// Candidate values.
        list: Vec<Operand>,
    },
    /// Function call: `function_name (args...)`.
    Function {
        /// Function name.
        name: FunctionName,
        /// Function arguments.
        args: Vec<Operand>,
    },
    /// Logical combination: `left AND right` or `left OR right`.
    Logical {
        /// Logical operator.
        op: LogicalOp,
        /// Left-hand condition.
        left: Box<Condition>,
        /// Right-hand condition.
        right: Box<Condition>,
    },
    /// Logical negation: `NOT condition`.
    Not(Box<Condition>),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (`=`).
    Eq,
    /// Not equal (`<>`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "<>"),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// Built-in condition functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    /// `attribute_exists (path)`.
    AttributeExists,
    /// `attribute_not_exists (path)`.
    AttributeNotExists,
    /// `attribute_type (path, type)`.
    AttributeType,
    /// `begins_with (path, prefix)`.
    BeginsWith,
    /// `contains (path, operand)`.
    Contains,
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeExists => write!(f, "attribute_exists"),
            Self::AttributeNotExists => write!(f, "attribute_not_exists"),
            Self::AttributeType => write!(f, "attribute_type"),
            Self::BeginsWith => write!(f, "begins_with"),
            Self::Contains => write!(f, "contains"),
        }
    }
}

/// A value producer inside a condition or update.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal value, rendered as a `:N` placeholder.
    Literal(AttributeValue),
    /// Another attribute of the same item.
    Reference(Path),
    /// `size (path)`.
    Size(Path),
}

impl From<AttributeValue> for Operand {
    fn from(value: AttributeValue) -> Self {
        Self::Literal(value)
    }
}

impl From<Path> for Operand {
    fn from(path: Path) -> Self {
        Self::Reference(path)
    }
}

impl From<&Path> for Operand {
    fn from(path: &Path) -> Self {
        Self::Reference(path.clone())
    }
}

/// An element of a document path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// A named attribute or map key.
    Attribute(String),
    /// A list index dereference (e.g., `[0]`).
    Index(usize),
}

/// The right-hand side of a SET action.
#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    /// Simple operand assignment.
    Operand(Operand),
    /// Addition: `left + right`.
    Plus(Box<SetValue>, Box<SetValue>),
    /// Subtraction: `left - right`.
    Minus(Box<SetValue>, Box<SetValue>),
    /// `if_not_exists (path, value)` - use `value` if `path` is absent.
    IfNotExists(Path, Box<SetValue>),
    /// `list_append (left, right)` - concatenate two lists.
    ListAppend(Box<SetValue>, Box<SetValue>),
}

impl SetValue {
    /// `self + other`.
    #[must_use]
    pub fn plus(self, other: impl Into<SetValue>) -> Self {
        Self::Plus(Box::new(self), Box::new(other.into()))
    }

    /// `self - other`.
    #[must_use]
    pub fn minus(self, other: impl Into<SetValue>) -> Self {
        Self::Minus(Box::new(self), Box::new(other.into()))
    }
}

impl From<Operand> for SetValue {
    fn from(operand: Operand) -> Self {
        Self::Operand(operand)
    }
}

impl From<AttributeValue> for SetValue {
    fn from(value: AttributeValue) -> Self {
        Self::Operand(Operand::Literal(value))
    }
}

impl From<Path> for SetValue {
    fn from(path: Path) -> Self {
        Self::Operand(Operand::Reference(path))
    }
}

impl From<&Path> for SetValue {
    fn from(path: &Path) -> Self {
        Self::Operand(Operand::Reference(path.clone()))
    }
}

// Native values become literals without spelling out `AttributeValue`.
macro_rules! literal_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Self::Literal(AttributeValue::from(value))
                }
            }

            impl From<$ty> for SetValue {
                fn from(value: $ty) -> Self {
                    Self::Operand(Operand::Literal(AttributeValue::from(value)))
                }
            }
        )+
    };
}

literal_from!(
    String,
    &str,
    bool,
    bytes::Bytes,
    Vec<AttributeValue>,
    Item,
    i32,
    i64,
    u32,
    u64,
    usize,
    f64,
);

/// One mutation of an update expression.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// `SET path = value`.
    Set {
        /// Target attribute path.
        path: Path,
        /// Value to assign.
        value: SetValue,
    },
    /// `REMOVE path`.
    Remove {
        /// Attribute to remove.
        path: Path,
    },
    /// `ADD path value` on a number or set.
    Add {
        /// Target attribute path.
        path: Path,
        /// Number or set to add.
        value: AttributeValue,
    },
    /// `DELETE path value` on a set.
    Delete {
        /// Target attribute path.
        path: Path,
        /// Set elements to remove.
        value: AttributeValue,
    },
}

impl UpdateAction {
    /// Path the action writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Set { path, .. }
            | Self::Remove { path }
            | Self::Add { path, .. }
            | Self::Delete { path, .. } => path,
        }
    }

    /// Clause keyword the action renders under.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Set { .. } => "SET",
            Self::Remove { .. } => "REMOVE",
            Self::Add { .. } => "ADD",
            Self::Delete { .. } => "DELETE",
        }
    }
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

impl Condition {
    /// `(self AND other)`.
    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        Self::Logical {
            op: LogicalOp::And,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// `(self OR other)`.
    #[must_use]
    pub fn or(self, other: Condition) -> Self {
        Self::Logical {
            op: LogicalOp::Or,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// `(NOT self)`.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Returns `true` if this condition can be the sort key half of a key
    /// condition on attribute `name`.
    ///
    /// Accepted forms: `=`, `<`, `<=`, `>`, `>=`, `BETWEEN` and
    /// `begins_with`, with the top-level attribute `name` on the left and
    /// literals on the right.
    #[must_use]
    pub fn is_valid_range_key_condition(&self, name: &str) -> bool {
        let is_key = |operand: &Operand| {
            matches!(operand, Operand::Reference(path) if path.is_attribute(name))
        };
        let is_literal = |operand: &Operand| matches!(operand, Operand::Literal(_));

        match self {
            Self::Compare { left, op, right } => {
                *op != CompareOp::Ne && is_key(left) && is_literal(right)
            }
            Self::Between { value, low, high } => {
                is_key(value) && is_literal(low) && is_literal(high)
            }
            Self::Function {
                name: FunctionName::BeginsWith,
                args,
            } => matches!(args.as_slice(), [path, prefix] if is_key(path) && is_literal(prefix)),
            _ => false,
        }
    }

    /// Top-level attribute names referenced anywhere in the tree.
    #[must_use]
    pub fn referenced_attributes(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        collect_paths_from_condition(self, &mut names);
        names
    }
}

impl BitAnd for Condition {
    type Output = Condition;

    fn bitand(self, rhs: Condition) -> Condition {
        self.and(rhs)
    }
}

impl BitOr for Condition {
    type Output = Condition;

    fn bitor(self, rhs: Condition) -> Condition {
        self.or(rhs)
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Condition {
        self.negate()
    }
}

// ---------------------------------------------------------------------------
// Collecting referenced attribute names
// ---------------------------------------------------------------------------

/// Collect the first element of every path in a condition tree. Used to
/// reject query filters that touch key attributes.
#[allow(clippy::implicit_hasher)]
pub fn collect_paths_from_condition(condition: &Condition, paths: &mut HashSet<String>) {
    match condition {
        Condition::Compare { left, right, .. } => {
            collect_paths_from_operand(left, paths);
            collect_paths_from_operand(right, paths);
        }
        Condition::Between { value, low, high } => {
            collect_paths_from_operand(value, paths);
            collect_paths_from_operand(low, paths);
            collect_paths_from_operand(high, paths);
        }
        Condition::In { value, list } => {
            collect_paths_from_operand(value, paths);
            for item in list {
                collect_paths_from_operand(item, paths);
            }
        }
        Condition::Function { args, .. } => {
            for arg in args {
                collect_paths_from_operand(arg, paths);
            }
        }
        Condition::Logical { left, right, .. } => {
            collect_paths_from_condition(left, paths);
            collect_paths_from_condition(right, paths);
        }
        Condition::Not(inner) => collect_paths_from_condition(inner, paths),
    }
}

fn collect_paths_from_operand(operand: &Operand, paths: &mut HashSet<String>) {
    match operand {
        Operand::Reference(path) | Operand::Size(path) => {
            if let Some(name) = path.top_attribute() {
                paths.insert(name.to_owned());
            }
        }
        Operand::Literal(_) => {}
    }
}
