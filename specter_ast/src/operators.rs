// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operator tags carried by expression nodes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `!`
    LogicalNot,
    /// `~`
    BitwiseNot,
    Typeof,
    Void,
    Delete,
}

impl UnaryOperator {
    pub fn parse(operator: &str) -> Option<Self> {
        Some(match operator {
            "-" => Self::Minus,
            "+" => Self::Plus,
            "!" => Self::LogicalNot,
            "~" => Self::BitwiseNot,
            "typeof" => Self::Typeof,
            "void" => Self::Void,
            "delete" => Self::Delete,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Remainder,
    Exponential,
    ShiftLeft,
    ShiftRight,
    ShiftRightZeroFill,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Equality,
    Inequality,
    StrictEquality,
    StrictInequality,
    LessThan,
    LessEqualThan,
    GreaterThan,
    GreaterEqualThan,
    In,
    Instanceof,
}

impl BinaryOperator {
    pub fn parse(operator: &str) -> Option<Self> {
        Some(match operator {
            "+" => Self::Addition,
            "-" => Self::Subtraction,
            "*" => Self::Multiplication,
            "/" => Self::Division,
            "%" => Self::Remainder,
            "**" => Self::Exponential,
            "<<" => Self::ShiftLeft,
            ">>" => Self::ShiftRight,
            ">>>" => Self::ShiftRightZeroFill,
            "&" => Self::BitwiseAnd,
            "|" => Self::BitwiseOr,
            "^" => Self::BitwiseXor,
            "==" => Self::Equality,
            "!=" => Self::Inequality,
            "===" => Self::StrictEquality,
            "!==" => Self::StrictInequality,
            "<" => Self::LessThan,
            "<=" => Self::LessEqualThan,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterEqualThan,
            "in" => Self::In,
            "instanceof" => Self::Instanceof,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Multiplication => "*",
            Self::Division => "/",
            Self::Remainder => "%",
            Self::Exponential => "**",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::ShiftRightZeroFill => ">>>",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "^",
            Self::Equality => "==",
            Self::Inequality => "!=",
            Self::StrictEquality => "===",
            Self::StrictInequality => "!==",
            Self::LessThan => "<",
            Self::LessEqualThan => "<=",
            Self::GreaterThan => ">",
            Self::GreaterEqualThan => ">=",
            Self::In => "in",
            Self::Instanceof => "instanceof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    Coalesce,
}

impl LogicalOperator {
    pub fn parse(operator: &str) -> Option<Self> {
        Some(match operator {
            "&&" => Self::And,
            "||" => Self::Or,
            "??" => Self::Coalesce,
            _ => return None,
        })
    }
}

/// ### [13.15 Assignment Operators](https://tc39.es/ecma262/#sec-assignment-operators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// `=`
    Assign,
    /// `op=` for every arithmetic, shift and bitwise operator.
    Compound(BinaryOperator),
    /// `&&=`
    LogicalAnd,
    /// `||=`
    LogicalOr,
    /// `??=`
    LogicalNullish,
}

impl AssignmentOperator {
    pub fn parse(operator: &str) -> Option<Self> {
        Some(match operator {
            "=" => Self::Assign,
            "&&=" => Self::LogicalAnd,
            "||=" => Self::LogicalOr,
            "??=" => Self::LogicalNullish,
            _ => {
                let binary = operator.strip_suffix('=')?;
                Self::Compound(BinaryOperator::parse(binary)?)
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_assignment_operators() {
        assert_eq!(
            AssignmentOperator::parse(">>>="),
            Some(AssignmentOperator::Compound(
                BinaryOperator::ShiftRightZeroFill
            ))
        );
        assert_eq!(
            AssignmentOperator::parse("**="),
            Some(AssignmentOperator::Compound(BinaryOperator::Exponential))
        );
        assert_eq!(
            AssignmentOperator::parse("??="),
            Some(AssignmentOperator::LogicalNullish)
        );
        // Comparisons never form compound assignments.
        assert_eq!(AssignmentOperator::parse("=="), None);
    }
}
