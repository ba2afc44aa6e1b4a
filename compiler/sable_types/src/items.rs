//! Non-enum top-level definitions: structs, functions, constants, events
//! and interfaces.

use rustc_hash::FxHashMap;
use sable_ir::{ExprId, Mutability, Name, Span, Visibility};

use crate::Ty;

/// Index of a struct in the [`StructRegistry`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct StructId(u32);

impl StructId {
    pub const fn new(index: u32) -> Self {
        StructId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A struct field with its word offset inside the flattened struct.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldDef {
    pub name: Name,
    pub ty: Ty,
    pub offset: u32,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructDef {
    pub name: Name,
    pub span: Span,
    /// Fields in declaration order. Empty until defined.
    pub fields: Vec<FieldDef>,
    /// Total words occupied by a value of this struct.
    pub width: u32,
    pub defined: bool,
}

impl StructDef {
    pub fn field(&self, name: Name) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Structs by name, in two phases: names are reserved first so fields may
/// refer to structs declared later, then each struct is defined.
#[derive(Clone, Debug, Default)]
pub struct StructRegistry {
    structs: Vec<StructDef>,
    by_name: FxHashMap<Name, StructId>,
}

impl StructRegistry {
    /// Id the next reserved struct will receive.
    pub fn next_id(&self) -> StructId {
        StructId::new(u32::try_from(self.structs.len()).unwrap_or(u32::MAX))
    }

    /// Reserve an id for a struct whose fields are not resolved yet.
    pub fn reserve(&mut self, name: Name, span: Span) -> StructId {
        let id = self.next_id();
        self.structs.push(StructDef {
            name,
            span,
            fields: Vec::new(),
            width: 0,
            defined: false,
        });
        self.by_name.insert(name, id);
        id
    }

    /// Set the fields of a reserved struct, computing offsets and width.
    ///
    /// Struct-typed fields must refer to structs that are already defined.
    pub fn define(&mut self, id: StructId, fields: Vec<(Name, Ty, Span)>) {
        let mut offset = 0u32;
        let fields = fields
            .into_iter()
            .map(|(name, ty, span)| {
                let field = FieldDef {
                    name,
                    ty,
                    offset,
                    span,
                };
                offset += self.width_of(ty);
                field
            })
            .collect();
        let def = &mut self.structs[id.index()];
        def.fields = fields;
        def.width = offset;
        def.defined = true;
    }

    /// Number of words a value of `ty` occupies.
    pub fn width_of(&self, ty: Ty) -> u32 {
        match ty {
            Ty::Struct(id) => self.get(id).width,
            Ty::Unit | Ty::List(_) => 0,
            _ => 1,
        }
    }

    pub fn get(&self, id: StructId) -> &StructDef {
        &self.structs[id.index()]
    }

    pub fn resolve_id(&self, name: Name) -> Option<StructId> {
        self.by_name.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StructId, &StructDef)> {
        self.structs
            .iter()
            .enumerate()
            .map(|(i, def)| (StructId::new(u32::try_from(i).unwrap_or(u32::MAX)), def))
    }
}

/// Index of a function signature.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct FuncId(u32);

impl FuncId {
    pub const fn new(index: u32) -> Self {
        FuncId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionSig {
    pub name: Name,
    pub span: Span,
    pub params: Vec<(Name, Ty)>,
    pub ret: Option<Ty>,
    pub visibility: Visibility,
    pub mutability: Mutability,
    /// Position of the declaration in `Module::items`.
    pub item_index: usize,
}

/// A module-level `constant`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConstantDef {
    pub name: Name,
    pub ty: Ty,
    pub value: ExprId,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EventDef {
    pub name: Name,
    pub fields: Vec<(Name, Ty)>,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MethodSig {
    pub name: Name,
    pub params: Vec<Ty>,
    pub ret: Option<Ty>,
    pub mutability: Mutability,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterfaceDef {
    pub name: Name,
    pub methods: Vec<MethodSig>,
    pub span: Span,
}
