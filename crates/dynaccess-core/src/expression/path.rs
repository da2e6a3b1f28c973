//! Document paths and the builder methods that turn them into conditions
//! and update actions.
//!
//! ```
//! use dynaccess_core::expression::{Path, PlaceholderTable, compile_condition};
//!
//! let condition = Path::new("Subject").begins_with("thread")
//!     & Path::new("Views").greater_than(10);
//! let mut table = PlaceholderTable::new();
//! let expression = compile_condition(&condition, &mut table).unwrap();
//! assert_eq!(expression, "(begins_with (#0, :0) AND #1 > :1)");
//! ```

use std::fmt;

use dynaccess_model::AttributeValue;
use dynaccess_model::attribute_value::TYPE_TAGS;

use super::ExpressionError;
use super::ast::{CompareOp, Condition, FunctionName, Operand, PathElement, SetValue, UpdateAction};

/// A reference into an item: a top-level attribute followed by map keys
/// and list indexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// A top-level attribute. Dots in `name` are part of the name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            elements: vec![PathElement::Attribute(name.into())],
        }
    }

    /// Parses a dotted and indexed document path such as `info.tags[0].name`.
    pub fn parse(input: &str) -> Result<Self, ExpressionError> {
        let invalid = |message: &str| ExpressionError::InvalidPath {
            path: input.to_owned(),
            message: message.to_owned(),
        };

        let mut elements = Vec::new();
        for segment in input.split('.') {
            let (name, mut rest) = match segment.find('[') {
                Some(pos) => segment.split_at(pos),
                None => (segment, ""),
            };
            if name.is_empty() {
                return Err(invalid("empty attribute name"));
            }
            if name.contains(']') {
                return Err(invalid("unbalanced ']'"));
            }
            elements.push(PathElement::Attribute(name.to_owned()));

            while !rest.is_empty() {
                let Some(inner) = rest.strip_prefix('[') else {
                    return Err(invalid("expected '[' after list index"));
                };
                let Some(end) = inner.find(']') else {
                    return Err(invalid("unterminated list index"));
                };
                let index = inner[..end]
                    .parse::<usize>()
                    .map_err(|_| invalid("list index must be a non-negative integer"))?;
                elements.push(PathElement::Index(index));
                rest = &inner[end + 1..];
            }
        }
        Ok(Self { elements })
    }

    /// The path elements in order.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Name of the top-level attribute.
    #[must_use]
    pub fn top_attribute(&self) -> Option<&str> {
        match self.elements.first() {
            Some(PathElement::Attribute(name)) => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if the path is exactly the top-level attribute `name`.
    #[must_use]
    pub fn is_attribute(&self, name: &str) -> bool {
        matches!(self.elements.as_slice(), [PathElement::Attribute(n)] if n == name)
    }

    /// `self.name`.
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut elements = self.elements.clone();
        elements.push(PathElement::Attribute(name.into()));
        Self { elements }
    }

    /// `self[index]`.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut elements = self.elements.clone();
        elements.push(PathElement::Index(index));
        Self { elements }
    }

    // -----------------------------------------------------------------------
    // Conditions
    // -----------------------------------------------------------------------

    /// `self IN (values...)`.
    #[must_use]
    pub fn is_in<I, V>(&self, values: I) -> Condition
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        Condition::In {
            value: Operand::Reference(self.clone()),
            list: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `attribute_exists (self)`.
    #[must_use]
    pub fn exists(&self) -> Condition {
        self.function(FunctionName::AttributeExists, Vec::new())
    }

    /// `attribute_not_exists (self)`.
    #[must_use]
    pub fn does_not_exist(&self) -> Condition {
        self.function(FunctionName::AttributeNotExists, Vec::new())
    }

    /// `attribute_type (self, tag)` where `tag` is a wire type such as `SS`.
    pub fn is_type(&self, tag: &str) -> Result<Condition, ExpressionError> {
        if !TYPE_TAGS.contains(&tag) {
            return Err(ExpressionError::InvalidOperand {
                operation: "attribute_type".to_owned(),
                message: format!("'{tag}' is not one of {TYPE_TAGS:?}"),
            });
        }
        Ok(self.function(
            FunctionName::AttributeType,
            vec![Operand::Literal(AttributeValue::S(tag.to_owned()))],
        ))
    }

    /// `begins_with (self, prefix)`.
    #[must_use]
    pub fn begins_with(&self, prefix: impl Into<Operand>) -> Condition {
        self.function(FunctionName::BeginsWith, vec![prefix.into()])
    }

    /// `contains (self, operand)`: substring or set membership.
    #[must_use]
    pub fn contains(&self, operand: impl Into<Operand>) -> Condition {
        self.function(FunctionName::Contains, vec![operand.into()])
    }

    /// `size (self)`, for comparing lengths.
    #[must_use]
    pub fn size(&self) -> Size {
        Size(self.clone())
    }

    fn function(&self, name: FunctionName, extra: Vec<Operand>) -> Condition {
        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(Operand::Reference(self.clone()));
        args.extend(extra);
        Condition::Function { name, args }
    }

    // -----------------------------------------------------------------------
    // Updates
    // -----------------------------------------------------------------------

    /// `SET self = value`.
    #[must_use]
    pub fn set(&self, value: impl Into<SetValue>) -> UpdateAction {
        UpdateAction::Set {
            path: self.clone(),
            value: value.into(),
        }
    }

    /// `REMOVE self`.
    #[must_use]
    pub fn remove(&self) -> UpdateAction {
        UpdateAction::Remove { path: self.clone() }
    }

    /// `ADD self value`: increments a number or unions a set.
    #[must_use]
    pub fn add(&self, value: impl Into<AttributeValue>) -> UpdateAction {
        UpdateAction::Add {
            path: self.clone(),
            value: value.into(),
        }
    }

    /// `DELETE self value`: removes elements from a set.
    #[must_use]
    pub fn delete(&self, value: impl Into<AttributeValue>) -> UpdateAction {
        UpdateAction::Delete {
            path: self.clone(),
            value: value.into(),
        }
    }

    /// `if_not_exists (self, default)`.
    #[must_use]
    pub fn if_not_exists(&self, default: impl Into<SetValue>) -> SetValue {
        SetValue::IfNotExists(self.clone(), Box::new(default.into()))
    }

    /// `list_append (self, tail)`.
    #[must_use]
    pub fn append(&self, tail: impl Into<SetValue>) -> SetValue {
        SetValue::ListAppend(Box::new(self.into()), Box::new(tail.into()))
    }

    /// `list_append (head, self)`.
    #[must_use]
    pub fn prepend(&self, head: impl Into<SetValue>) -> SetValue {
        SetValue::ListAppend(Box::new(head.into()), Box::new(self.into()))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, elem) in self.elements.iter().enumerate() {
            match elem {
                PathElement::Attribute(name) => {
                    if i > 0 {
                        write!(f, ".{name}")?;
                    } else {
                        write!(f, "{name}")?;
                    }
                }
                PathElement::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// `size (path)` as the left side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Size(Path);

impl From<Size> for Operand {
    fn from(size: Size) -> Self {
        Operand::Size(size.0)
    }
}

impl Size {
    fn left_operand(&self) -> Operand {
        Operand::Size(self.0.clone())
    }
}

impl Path {
    fn left_operand(&self) -> Operand {
        Operand::Reference(self.clone())
    }
}

macro_rules! comparison_builders {
    ($ty:ty) => {
        impl $ty {
            #[must_use]
            pub fn equals(&self, value: impl Into<Operand>) -> Condition {
                self.compare(CompareOp::Eq, value)
            }

            #[must_use]
            pub fn not_equals(&self, value: impl Into<Operand>) -> Condition {
                self.compare(CompareOp::Ne, value)
            }

            #[must_use]
            pub fn less_than(&self, value: impl Into<Operand>) -> Condition {
                self.compare(CompareOp::Lt, value)
            }

            #[must_use]
            pub fn less_than_or_equal(&self, value: impl Into<Operand>) -> Condition {
                self.compare(CompareOp::Le, value)
            }

            #[must_use]
            pub fn greater_than(&self, value: impl Into<Operand>) -> Condition {
                self.compare(CompareOp::Gt, value)
            }

            #[must_use]
            pub fn greater_than_or_equal(&self, value: impl Into<Operand>) -> Condition {
                self.compare(CompareOp::Ge, value)
            }

            /// `self BETWEEN low AND high`, both bounds inclusive.
            #[must_use]
            pub fn between(&self, low: impl Into<Operand>, high: impl Into<Operand>) -> Condition {
                Condition::Between {
                    value: self.left_operand(),
                    low: low.into(),
                    high: high.into(),
                }
            }

            /// `self op value` for an arbitrary comparison operator.
            #[must_use]
            pub fn compare(&self, op: CompareOp, value: impl Into<Operand>) -> Condition {
                Condition::Compare {
                    left: self.left_operand(),
                    op,
                    right: value.into(),
                }
            }
        }
    };
}

comparison_builders!(Path);
comparison_builders!(Size);
