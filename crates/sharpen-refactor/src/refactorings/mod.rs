//! One module per refactoring. Each exposes `check`, `describe` and `apply`
//! over its own `Target`; [`crate::action`] dispatches between them.

pub(crate) mod encapsulate_field;
pub(crate) mod extract_method;
pub(crate) mod generate_class_from_usage;
pub(crate) mod inline_local;
pub(crate) mod inline_method;
pub(crate) mod introduce_explaining_variable;
pub(crate) mod introduce_local;
pub(crate) mod introduce_parameter_object;
pub(crate) mod make_const;
pub(crate) mod make_method_static;
pub(crate) mod make_singleton;
pub(crate) mod pull_up_field;
pub(crate) mod remove_assignment_to_parameter;
pub(crate) mod remove_parameter;
pub(crate) mod rename_local;
pub(crate) mod rename_parameter;
pub(crate) mod replace_constructor_with_factory;
pub(crate) mod replace_magic_number;
pub(crate) mod reverse_conditional;
