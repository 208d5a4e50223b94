//! Generate Class From Usage: declares the class named by an object creation
//! that does not resolve, with one field and constructor parameter per
//! argument.

use std::collections::BTreeSet;

use sharpen_semantic::Type;
use sharpen_syntax::printer::print_type;
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::make::Make;
use crate::rewrite::{rewrite_unit, Rewriter};
use crate::selection::narrowest_containing;
use crate::synth::Changes;

const NAME: &str = "generate-class-from-usage";

const TYPE_PARAM_LETTERS: [char; 3] = ['T', 'U', 'V'];

const INITIALIZATION_NOTE: &str = " TODO: Complete member initialization";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) creation: NodeId,
    class_name: String,
}

/// `T`, `U`, `V`, `TT`, `UU`, ...
fn type_param_name(index: usize) -> String {
    let letter = TYPE_PARAM_LETTERS[index % TYPE_PARAM_LETTERS.len()];
    std::iter::repeat(letter)
        .take(index / TYPE_PARAM_LETTERS.len() + 1)
        .collect()
}

fn field_names(args: &[Arg]) -> Vec<String> {
    args.iter()
        .enumerate()
        .map(|(idx, arg)| match &arg.name {
            Some(name) => name.text.clone(),
            None => format!("param{}", idx + 1),
        })
        .collect()
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let node = narrowest_containing(ctx.doc, span, |node| {
        matches!(
            node.as_expr(),
            Some(Expr {
                kind: ExprKind::New(_),
                ..
            })
        )
    })?;
    let expr = node.as_expr()?;
    let ExprKind::New(creation) = &expr.kind else {
        return None;
    };
    let TypeRefKind::Named(segments) = &creation.ty.kind else {
        return None;
    };
    if ctx.symbol_at(creation.ty.id).is_some() {
        return None;
    }
    let class_name = segments.last()?.name.text.clone();
    let exists = ctx
        .oracle
        .lookup_visible(ctx.file, 0, &class_name, None)
        .into_iter()
        .any(|symbol| ctx.symbol(symbol).is_some_and(|s| s.type_kind.is_some()));
    if exists {
        return reject(NAME, "a type with that name already exists");
    }
    for arg in &creation.args {
        let spellable = ctx
            .type_of(arg.value.id)
            .is_some_and(|info| !matches!(info.static_type, Type::Null | Type::Unknown));
        if !spellable {
            return reject(NAME, "an argument has no nameable type");
        }
    }
    let names = field_names(&creation.args);
    if names.iter().collect::<BTreeSet<_>>().len() != names.len() {
        return reject(NAME, "two arguments would produce the same field");
    }
    Some(Target {
        creation: expr.id,
        class_name,
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, target: &Target) -> String {
    format!("Generate class `{}'", target.class_name)
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let missing = RewriteError::MissingNode(target.creation);
    let Some(expr) = ctx.node(target.creation).and_then(|node| node.as_expr()) else {
        return Err(missing.into());
    };
    let ExprKind::New(creation) = &expr.kind else {
        return Err(missing.into());
    };
    let mut make = Make::new(ctx.ids());
    let class = generated_class(ctx, &mut make, &target.class_name, creation)?;
    tracing::debug!(class = %target.class_name, fields = creation.args.len(), "generating class");

    let mut rewriter = AppendClass { class: Some(class) };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

fn generated_class(
    ctx: &Context<'_>,
    make: &mut Make,
    name: &str,
    creation: &ObjectCreation,
) -> Result<TypeDecl, RefactorError> {
    // Type arguments become type parameters; an argument whose type is one of
    // them is declared with the parameter instead.
    let type_args = match &creation.ty.kind {
        TypeRefKind::Named(segments) => segments
            .last()
            .map(|segment| segment.args.as_slice())
            .unwrap_or_default(),
        _ => &[],
    };
    let mut type_params = Vec::with_capacity(type_args.len());
    let mut substitutions: Vec<(String, String)> = Vec::new();
    for (idx, arg) in type_args.iter().enumerate() {
        let param = type_param_name(idx);
        let spelled = print_type(arg);
        if !substitutions.iter().any(|(ty, _)| *ty == spelled) {
            substitutions.push((spelled, param.clone()));
        }
        type_params.push(TypeParam {
            id: make.id(),
            name: make.ident(&param),
        });
    }

    let names = field_names(&creation.args);
    let mut fields = Vec::with_capacity(names.len() + 1);
    let mut params = Vec::with_capacity(names.len());
    let mut body = Vec::with_capacity(names.len() + 1);
    for (arg, field) in creation.args.iter().zip(&names) {
        let info = ctx
            .type_of(arg.value.id)
            .ok_or(RewriteError::MissingNode(arg.value.id))?;
        let spelled = make.spell(&info.static_type)?;
        let printed = print_type(&spelled);
        let ty = match substitutions.iter().find(|(ty, _)| *ty == printed) {
            Some((_, param)) => make.type_named(param),
            None => spelled,
        };
        let modifier = match arg.modifier {
            Some(ArgModifier::Ref) => Some(ParamModifier::Ref),
            Some(ArgModifier::Out) => Some(ParamModifier::Out),
            None => None,
        };
        fields.push(make.field(
            Modifiers::new(vec![Modifier::Private]),
            ty.clone(),
            field,
            None,
        ));
        params.push(make.param(modifier, ty, field));
        let this = make.this();
        let target = make.member(this, field);
        let value = make.name(field);
        let assign = make.assign(target, value);
        body.push(make.expr_stmt(assign));
    }
    if body.is_empty() {
        body.push(make.stmt(StmtKind::Empty));
    }
    if let Some(first) = body.first_mut() {
        first.trivia.comments.push(INITIALIZATION_NOTE.to_string());
    }
    fields.push(make.constructor(
        Modifiers::new(vec![Modifier::Public]),
        name,
        params,
        body,
    ));
    let mut class = make.class(Modifiers::default(), name, fields);
    class.type_params = type_params;
    Ok(class)
}

struct AppendClass {
    class: Option<TypeDecl>,
}

impl Rewriter for AppendClass {
    fn finish_unit(&mut self, unit: &mut CompilationUnit) {
        if let Some(class) = self.class.take() {
            unit.items.push(Item::Type(class));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::type_param_name;

    #[test]
    fn type_parameters_cycle_then_double() {
        let names: Vec<_> = (0..5).map(type_param_name).collect();
        assert_eq!(names, ["T", "U", "V", "TT", "UU"]);
    }
}
