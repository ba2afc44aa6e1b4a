//! Compilation output.

use std::fmt;

use sable_codegen::{ExecError, Folder, Machine, Program};
use sable_ir::{Item, Module, Mutability, Name, Visibility, Word};
use sable_types::{CompilationContext, TypedModule};

/// Everything a successful compilation produces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    pub program: Program,
    /// Enums in declaration order.
    pub enums: Vec<EnumSummary>,
    /// Constants in declaration order.
    pub constants: Vec<ConstantSummary>,
    /// Functions in declaration order.
    pub functions: Vec<FunctionSummary>,
}

/// An enum and the bit value of each member.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumSummary {
    pub name: String,
    pub members: Vec<(String, Word)>,
}

impl EnumSummary {
    pub fn value(&self, member: &str) -> Option<&Word> {
        self.members
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, value)| value)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConstantSummary {
    pub name: String,
    pub ty: String,
    /// `None` for multi-word (struct) constants.
    pub value: Option<Word>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionSummary {
    pub name: String,
    /// `(name, type)` pairs.
    pub params: Vec<(String, String)>,
    pub returns: Option<String>,
    pub visibility: Visibility,
    pub mutability: Mutability,
}

impl Artifact {
    pub(crate) fn new(
        program: Program,
        module: &Module,
        ctx: &CompilationContext,
        typed: &TypedModule,
    ) -> Self {
        let name = |n: Name| ctx.interner.lookup(n).to_string();

        let enums = ctx
            .enums
            .iter()
            .map(|(_, ty)| EnumSummary {
                name: name(ty.name()),
                members: ty
                    .members()
                    .filter_map(|m| Some((name(m), ty.member_value(m)?)))
                    .collect(),
            })
            .collect();

        let folder = Folder::new(module, ctx, typed);
        let constants = module
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Constant(decl) => ctx.constant(decl.name),
                _ => None,
            })
            .map(|def| ConstantSummary {
                name: name(def.name),
                ty: def.ty.display(ctx),
                value: folder.fold(def.value),
            })
            .collect();

        let functions = ctx
            .functions()
            .map(|(_, sig)| FunctionSummary {
                name: name(sig.name),
                params: sig
                    .params
                    .iter()
                    .map(|&(param, ty)| (name(param), ty.display(ctx)))
                    .collect(),
                returns: sig.ret.map(|ty| ty.display(ctx)),
                visibility: sig.visibility,
                mutability: sig.mutability,
            })
            .collect();

        tracing::debug!(functions = program.functions.len(), "built artifact");
        Artifact {
            program,
            enums,
            constants,
            functions,
        }
    }

    pub fn enum_summary(&self, name: &str) -> Option<&EnumSummary> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Folded value of a single-word constant.
    pub fn constant(&self, name: &str) -> Option<&Word> {
        self.constants
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.value.as_ref())
    }

    /// Execute a function on the reference machine.
    pub fn run(&self, function: &str, args: &[Word]) -> Result<Vec<Word>, ExecError> {
        Machine::new(&self.program).run(function, args)
    }
}

/// Human-readable summary printed by `sable build --emit=summary`.
impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for summary in &self.enums {
            writeln!(f, "enum {}", summary.name)?;
            for (member, value) in &summary.members {
                writeln!(f, "    {member} = {value:#x}")?;
            }
        }
        for constant in &self.constants {
            match &constant.value {
                Some(value) => writeln!(f, "constant {}: {} = {value:#x}", constant.name, constant.ty)?,
                None => writeln!(f, "constant {}: {}", constant.name, constant.ty)?,
            }
        }
        for function in &self.functions {
            let params: Vec<String> = function
                .params
                .iter()
                .map(|(name, ty)| format!("{name}: {ty}"))
                .collect();
            let visibility = match function.visibility {
                Visibility::External => "external",
                Visibility::Internal => "internal",
            };
            write!(
                f,
                "def {}({}) [{visibility} {}]",
                function.name,
                params.join(", "),
                function.mutability.as_str()
            )?;
            match &function.returns {
                Some(ty) => writeln!(f, " -> {ty}")?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}
