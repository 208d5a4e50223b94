use std::fmt;

use sharpen_syntax::PredefinedType;

use crate::symbol::SymbolId;

/// Static type of an expression or declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Void,
    Bool,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    String,
    Object,
    /// Type of the `null` literal.
    Null,
    /// A class, struct or interface. `symbol` is set for types declared in
    /// source.
    Named {
        name: String,
        symbol: Option<SymbolId>,
        args: Vec<Type>,
    },
    TypeParam {
        name: String,
        symbol: SymbolId,
    },
    Array(Box<Type>),
    /// Anything the model cannot type (method groups, lambdas, metadata).
    Unknown,
}

impl Type {
    pub fn from_predefined(predefined: PredefinedType) -> Type {
        match predefined {
            PredefinedType::Void => Type::Void,
            PredefinedType::Bool => Type::Bool,
            PredefinedType::Byte => Type::Byte,
            PredefinedType::Char => Type::Char,
            PredefinedType::Short => Type::Short,
            PredefinedType::Int => Type::Int,
            PredefinedType::Long => Type::Long,
            PredefinedType::Float => Type::Float,
            PredefinedType::Double => Type::Double,
            PredefinedType::Decimal => Type::Decimal,
            PredefinedType::String => Type::String,
            PredefinedType::Object => Type::Object,
        }
    }

    pub fn is_known(&self) -> bool {
        match self {
            Type::Unknown => false,
            Type::Array(element) => element.is_known(),
            Type::Named { args, .. } => args.iter().all(Type::is_known),
            _ => true,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Position in the implicit widening order.
    fn numeric_rank(&self) -> Option<u8> {
        Some(match self {
            Type::Byte => 1,
            Type::Short => 2,
            Type::Char => 2,
            Type::Int => 3,
            Type::Long => 4,
            Type::Float => 5,
            Type::Double => 6,
            Type::Decimal => 7,
            _ => return None,
        })
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::String | Type::Object | Type::Null | Type::Array(_) | Type::Named { .. }
        )
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            Type::Named { symbol, .. } => *symbol,
            Type::TypeParam { symbol, .. } => Some(*symbol),
            _ => None,
        }
    }

    /// Built-in implicit conversions (identity, numeric widening, null to
    /// reference, anything to `object`). Conversions along source base types
    /// are added by the semantic model.
    pub fn converts_builtin(&self, target: &Type) -> bool {
        if self == target {
            return true;
        }
        if !self.is_known() || !target.is_known() {
            return false;
        }
        match (self, target) {
            (_, Type::Object) => !matches!(self, Type::Void),
            (Type::Null, target) => target.is_reference(),
            (Type::Char, Type::Short) | (Type::Short, Type::Char) => false,
            (Type::Float | Type::Double, Type::Decimal) => false,
            (Type::Decimal, Type::Float | Type::Double) => false,
            (Type::Byte, Type::Char) => false,
            _ => match (self.numeric_rank(), target.numeric_rank()) {
                (Some(from), Some(to)) => from < to,
                _ => false,
            },
        }
    }

    /// Result type of a binary arithmetic operator on two numeric operands.
    pub fn promote(lhs: &Type, rhs: &Type) -> Type {
        match (lhs.numeric_rank(), rhs.numeric_rank()) {
            (Some(l), Some(r)) => match l.max(r) {
                7 => Type::Decimal,
                6 => Type::Double,
                5 => Type::Float,
                4 => Type::Long,
                _ => Type::Int,
            },
            _ => Type::Unknown,
        }
    }

    /// Result type of a unary numeric operator.
    pub fn promote_unary(operand: &Type) -> Type {
        match operand {
            Type::Byte | Type::Short | Type::Char => Type::Int,
            other if other.is_numeric() => other.clone(),
            _ => Type::Unknown,
        }
    }

    /// Replaces type parameters using `subst`.
    pub fn substitute(&self, subst: &dyn Fn(SymbolId) -> Option<Type>) -> Type {
        match self {
            Type::TypeParam { symbol, .. } => subst(*symbol).unwrap_or_else(|| self.clone()),
            Type::Array(element) => Type::Array(Box::new(element.substitute(subst))),
            Type::Named { name, symbol, args } => Type::Named {
                name: name.clone(),
                symbol: *symbol,
                args: args.iter().map(|arg| arg.substitute(subst)).collect(),
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Bool => f.write_str("bool"),
            Type::Char => f.write_str("char"),
            Type::Byte => f.write_str("byte"),
            Type::Short => f.write_str("short"),
            Type::Int => f.write_str("int"),
            Type::Long => f.write_str("long"),
            Type::Float => f.write_str("float"),
            Type::Double => f.write_str("double"),
            Type::Decimal => f.write_str("decimal"),
            Type::String => f.write_str("string"),
            Type::Object | Type::Null => f.write_str("object"),
            Type::Named { name, args, .. } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::TypeParam { name, .. } => f.write_str(name),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Unknown => f.write_str("?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_widening_is_one_way() {
        assert!(Type::Int.converts_builtin(&Type::Float));
        assert!(!Type::Float.converts_builtin(&Type::Int));
        assert!(!Type::Double.converts_builtin(&Type::Decimal));
        assert!(Type::Null.converts_builtin(&Type::String));
    }

    #[test]
    fn promotion_picks_the_wider_operand() {
        assert_eq!(Type::promote(&Type::Int, &Type::Float), Type::Float);
        assert_eq!(Type::promote(&Type::Short, &Type::Byte), Type::Int);
        assert_eq!(Type::promote(&Type::Bool, &Type::Int), Type::Unknown);
    }
}
