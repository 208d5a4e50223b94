//! Make Singleton: gives a class a lazily created shared instance and routes
//! every `new T()` through it.

use sharpen_semantic::SymbolId;
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::RefactorError;
use crate::make::Make;
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter, Step};
use crate::synth::Changes;

const NAME: &str = "make-singleton";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) class: SymbolId,
    decl: NodeId,
    name: String,
    constructors: Vec<NodeId>,
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let decl = ctx.doc.root().preorder().find_map(|node| {
        let decl = node.as_type_decl()?;
        let range = ctx.range(decl.name.id)?;
        (range.start <= span.start && span.end <= range.end).then_some(decl)
    })?;
    if decl.kind != TypeKind::Class {
        return reject(NAME, "only classes can be singletons");
    }
    if !decl.type_params.is_empty() {
        return reject(NAME, "generic classes are not supported");
    }
    let constructors: Vec<&ConstructorDecl> = decl
        .members
        .iter()
        .filter_map(|member| match member {
            Member::Constructor(ctor) if !ctor.modifiers.has(Modifier::Static) => Some(ctor),
            _ => None,
        })
        .collect();
    match constructors.as_slice() {
        [] => {}
        [ctor] if ctor.params.is_empty() => {}
        _ => return reject(NAME, "class has constructors taking arguments"),
    }
    let class = ctx.symbol_at(decl.id)?;
    let taken = ctx.oracle.members(class).into_iter().any(|member| {
        ctx.oracle.symbol_name(member).is_some_and(|name| {
            name == ctx.names.singleton_accessor || name == ctx.names.singleton_field
        })
    });
    if taken {
        return reject(NAME, "class already has a member with the singleton names");
    }
    Some(Target {
        class,
        decl: decl.id,
        name: decl.name.text.clone(),
        constructors: constructors.iter().map(|ctor| ctor.id).collect(),
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, target: &Target) -> String {
    format!("Convert class `{}' to singleton", target.name)
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let accessor = ctx.names.singleton_accessor.as_str();
    let field = ctx.names.singleton_field.as_str();
    let mut make = Make::new(ctx.ids());
    let members = vec![
        Member::Method(accessor_method(&mut make, &target.name, accessor, field)),
        instance_field(&mut make, &target.name, field),
    ];
    let mut rewriter = Singleton {
        ctx,
        target,
        accessor,
        make,
        members,
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

/// `static public T Instance() { if (instance == null) { instance = new T(); } return instance; }`
fn accessor_method(make: &mut Make, class: &str, accessor: &str, field: &str) -> MethodDecl {
    let cond = {
        let lhs = make.name(field);
        let rhs = make.literal(LiteralKind::Null, "null");
        make.binary(BinaryOp::Eq, lhs, rhs)
    };
    let create = {
        let target = make.name(field);
        let ty = make.type_named(class);
        let value = make.new_object(ty, Vec::new());
        let assign = make.assign(target, value);
        make.expr_stmt(assign)
    };
    let then_branch = make.block_stmt(vec![create]);
    let check = make.stmt(StmtKind::If(IfStmt {
        cond,
        then_branch: Box::new(then_branch),
        else_branch: None,
    }));
    let value = make.name(field);
    let ret = make.return_stmt(Some(value));
    let return_type = make.type_named(class);
    make.method(
        Modifiers::new(vec![Modifier::Static, Modifier::Public]),
        return_type,
        accessor,
        Vec::new(),
        vec![check, ret],
    )
}

fn instance_field(make: &mut Make, class: &str, field: &str) -> Member {
    let ty = make.type_named(class);
    make.field(
        Modifiers::new(vec![Modifier::Static, Modifier::Private]),
        ty,
        field,
        None,
    )
}

struct Singleton<'a, 't> {
    ctx: &'t Context<'a>,
    target: &'t Target,
    accessor: &'t str,
    make: Make,
    /// Members appended to the class.
    members: Vec<Member>,
}

impl Rewriter for Singleton<'_, '_> {
    fn expr(&mut self, expr: &Expr, _path: &[Ancestor]) -> Step<Expr> {
        let ExprKind::New(creation) = &expr.kind else {
            return Step::Descend;
        };
        if self.ctx.symbol_at(creation.ty.id) != Some(self.target.class) {
            return Step::Descend;
        }
        let class = self.make.name(&self.target.name);
        let callee = self.make.member(class, self.accessor);
        Step::Replace(self.make.call(callee, Vec::new()))
    }

    fn finish_member(&mut self, original: &Member, member: &mut Member, _path: &[Ancestor]) {
        if !self.target.constructors.contains(&original.id()) {
            return;
        }
        if let Member::Constructor(ctor) = member {
            ctor.modifiers = ctor.modifiers.with_access(Modifier::Private);
        }
    }

    fn finish_type(&mut self, original: &TypeDecl, decl: &mut TypeDecl, _path: &[Ancestor]) {
        if original.id == self.target.decl {
            decl.members.append(&mut self.members);
        }
    }
}
