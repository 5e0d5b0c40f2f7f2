// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registration templates and generic instantiation.
//!
//! A [`DatatypeTemplate`] is the registration-time shape of a struct or enum:
//! its type parameters (with phantom flags) and its field / variant types,
//! which may reference type parameters by index or other datatypes by name.
//! [`instantiate`] substitutes concrete [`TypeDescriptor`] arguments and
//! produces a fully-instantiated descriptor.

use crate::config::MAX_TYPE_DEPTH;
use crate::error::{ReifyError, Result};
use crate::types::descriptor::{
    EnumDescriptor, FieldDescriptor, PayloadShape, PrimitiveKind, StructDescriptor,
    TypeDescriptor, VariantDescriptor,
};
use crate::types::type_name::parse_type_name;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Type expression inside a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateType {
    Primitive(PrimitiveKind),
    Vector(Box<TemplateType>),
    /// Reference to the enclosing template's type parameter.
    Param(usize),
    /// Reference to another registered datatype.
    Datatype {
        name: String,
        type_args: Vec<TemplateType>,
    },
}

impl TemplateType {
    pub fn bool() -> Self {
        Self::Primitive(PrimitiveKind::Bool)
    }

    pub fn u8() -> Self {
        Self::Primitive(PrimitiveKind::U8)
    }

    pub fn u16() -> Self {
        Self::Primitive(PrimitiveKind::U16)
    }

    pub fn u32() -> Self {
        Self::Primitive(PrimitiveKind::U32)
    }

    pub fn u64() -> Self {
        Self::Primitive(PrimitiveKind::U64)
    }

    pub fn u128() -> Self {
        Self::Primitive(PrimitiveKind::U128)
    }

    pub fn u256() -> Self {
        Self::Primitive(PrimitiveKind::U256)
    }

    pub fn address() -> Self {
        Self::Primitive(PrimitiveKind::Address)
    }

    pub fn vector(element: TemplateType) -> Self {
        Self::Vector(Box::new(element))
    }

    pub fn param(index: usize) -> Self {
        Self::Param(index)
    }

    /// Reference a datatype by name; the name is normalized at build time.
    pub fn datatype(name: impl Into<String>, type_args: Vec<TemplateType>) -> Self {
        Self::Datatype {
            name: name.into(),
            type_args,
        }
    }

    fn visit_params(&self, layout_position: bool, out: &mut Vec<(usize, bool)>) {
        match self {
            Self::Primitive(_) => {}
            Self::Vector(elem) => elem.visit_params(true, out),
            Self::Param(i) => out.push((*i, layout_position)),
            // Argument positions of nested datatypes are checked on instantiation.
            Self::Datatype { type_args, .. } => {
                for arg in type_args {
                    arg.visit_params(false, out);
                }
            }
        }
    }

    fn normalize_names(&mut self) -> Result<()> {
        match self {
            Self::Primitive(_) | Self::Param(_) => Ok(()),
            Self::Vector(elem) => elem.normalize_names(),
            Self::Datatype { name, type_args } => {
                *name = normalize_bare_name(name)?;
                type_args.iter_mut().try_for_each(Self::normalize_names)
            }
        }
    }
}

/// Field of a struct template or named variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
    pub name: String,
    pub ty: TemplateType,
}

/// Variant payload of an enum template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadTemplate {
    Unit,
    Named(Vec<FieldTemplate>),
    Positional(Vec<TemplateType>),
}

/// Variant of an enum template. Its index is its declaration position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTemplate {
    pub name: String,
    pub payload: PayloadTemplate,
}

/// Struct or enum body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateBody {
    Struct(Vec<FieldTemplate>),
    Enum(Vec<VariantTemplate>),
}

/// Registration-time shape of a datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatatypeTemplate {
    /// Normalized bare name.
    pub name: String,
    /// One flag per type parameter.
    pub phantom_flags: Vec<bool>,
    pub body: TemplateBody,
}

impl DatatypeTemplate {
    /// Build and validate a template.
    pub fn new(name: &str, phantom_flags: Vec<bool>, body: TemplateBody) -> Result<Self> {
        let mut template = Self {
            name: normalize_bare_name(name)?,
            phantom_flags,
            body,
        };
        template.normalize_and_validate()?;
        Ok(template)
    }

    pub fn num_type_params(&self) -> usize {
        self.phantom_flags.len()
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.body, TemplateBody::Enum(_))
    }

    fn normalize_and_validate(&mut self) -> Result<()> {
        let mut types: Vec<&mut TemplateType> = Vec::new();
        match &mut self.body {
            TemplateBody::Struct(fields) => {
                check_unique(&self.name, "field", fields.iter().map(|f| f.name.as_str()))?;
                types.extend(fields.iter_mut().map(|f| &mut f.ty));
            }
            TemplateBody::Enum(variants) => {
                if variants.is_empty() {
                    return Err(ReifyError::invalid_template(&self.name, "enum has no variants"));
                }
                check_unique(&self.name, "variant", variants.iter().map(|v| v.name.as_str()))?;
                for variant in variants.iter_mut() {
                    match &mut variant.payload {
                        PayloadTemplate::Unit => {}
                        PayloadTemplate::Named(fields) => {
                            check_unique(
                                &self.name,
                                "field",
                                fields.iter().map(|f| f.name.as_str()),
                            )?;
                            types.extend(fields.iter_mut().map(|f| &mut f.ty));
                        }
                        PayloadTemplate::Positional(tys) => types.extend(tys.iter_mut()),
                    }
                }
            }
        }

        let mut params = Vec::new();
        for ty in types {
            ty.normalize_names()?;
            ty.visit_params(true, &mut params);
        }
        for (index, layout_position) in params {
            let phantom = *self.phantom_flags.get(index).ok_or_else(|| {
                ReifyError::invalid_template(
                    &self.name,
                    format!(
                        "type parameter {} out of range ({} declared)",
                        index,
                        self.phantom_flags.len()
                    ),
                )
            })?;
            if phantom && layout_position {
                return Err(ReifyError::invalid_template(
                    &self.name,
                    format!("phantom type parameter {} used in a field position", index),
                ));
            }
        }
        Ok(())
    }
}

fn check_unique<'a>(
    type_name: &str,
    what: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ReifyError::invalid_template(
                type_name,
                format!("duplicate {} '{}'", what, name),
            ));
        }
    }
    Ok(())
}

/// Normalize `address::module::Name`; type arguments are rejected.
pub(crate) fn normalize_bare_name(name: &str) -> Result<String> {
    let parsed = parse_type_name(name)?;
    if !parsed.type_args.is_empty() {
        return Err(ReifyError::malformed_type(
            name,
            "expected a bare name without type arguments",
        ));
    }
    Ok(parsed.bare_name())
}

/// Lookup of datatype templates by normalized bare name.
pub trait TemplateResolver {
    fn template(&self, bare_name: &str) -> Option<Arc<DatatypeTemplate>>;
}

impl TemplateResolver for HashMap<String, Arc<DatatypeTemplate>> {
    fn template(&self, bare_name: &str) -> Option<Arc<DatatypeTemplate>> {
        self.get(bare_name).cloned()
    }
}

/// Resolver that knows no datatypes.
impl TemplateResolver for () {
    fn template(&self, _bare_name: &str) -> Option<Arc<DatatypeTemplate>> {
        None
    }
}

/// Instantiate a template with concrete type arguments.
///
/// Fails with [`ReifyError::TypeArgumentCountMismatch`] when the argument count
/// differs from the template's parameter count, with
/// [`ReifyError::TypeMismatch`] when a phantom descriptor lands in a layout
/// position, and with [`ReifyError::UnknownType`] when a referenced datatype is
/// not known to `resolver`.
pub fn instantiate(
    template: &DatatypeTemplate,
    type_args: &[TypeDescriptor],
    resolver: &dyn TemplateResolver,
) -> Result<TypeDescriptor> {
    instantiate_bounded(template, type_args, resolver, MAX_TYPE_DEPTH)
}

/// [`instantiate`] with an explicit nesting bound.
pub fn instantiate_bounded(
    template: &DatatypeTemplate,
    type_args: &[TypeDescriptor],
    resolver: &dyn TemplateResolver,
    max_depth: usize,
) -> Result<TypeDescriptor> {
    Instantiator {
        resolver,
        max_depth,
    }
    .instantiate(template, type_args, 0)
}

struct Instantiator<'a> {
    resolver: &'a dyn TemplateResolver,
    max_depth: usize,
}

impl Instantiator<'_> {
    fn instantiate(
        &self,
        template: &DatatypeTemplate,
        type_args: &[TypeDescriptor],
        depth: usize,
    ) -> Result<TypeDescriptor> {
        if depth > self.max_depth {
            return Err(ReifyError::invalid_template(
                &template.name,
                format!("datatype nesting exceeds {}", self.max_depth),
            ));
        }
        if type_args.len() != template.num_type_params() {
            return Err(ReifyError::TypeArgumentCountMismatch {
                type_name: template.name.clone(),
                expected: template.num_type_params(),
                found: type_args.len(),
            });
        }

        let args = type_args
            .iter()
            .zip(&template.phantom_flags)
            .map(|(arg, &phantom)| {
                if phantom {
                    Ok(TypeDescriptor::phantom_of(arg.clone()))
                } else {
                    require_layout(arg.clone(), &template.name)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let descriptor = match &template.body {
            TemplateBody::Struct(fields) => TypeDescriptor::Struct(Arc::new(StructDescriptor {
                name: template.name.clone(),
                fields: self.fields(fields, &args, &template.name, depth)?,
                type_args: args,
                phantom_flags: template.phantom_flags.clone(),
            })),
            TemplateBody::Enum(variants) => {
                let mut out = Vec::with_capacity(variants.len());
                for (index, variant) in variants.iter().enumerate() {
                    let payload = match &variant.payload {
                        PayloadTemplate::Unit => PayloadShape::Unit,
                        PayloadTemplate::Named(fields) => {
                            PayloadShape::Named(self.fields(fields, &args, &template.name, depth)?)
                        }
                        PayloadTemplate::Positional(tys) => PayloadShape::Positional(
                            tys.iter()
                                .map(|ty| self.layout(ty, &args, &template.name, depth))
                                .collect::<Result<Vec<_>>>()?,
                        ),
                    };
                    out.push(VariantDescriptor {
                        name: variant.name.clone(),
                        index: index as u32,
                        payload,
                    });
                }
                TypeDescriptor::Enum(Arc::new(EnumDescriptor {
                    name: template.name.clone(),
                    type_args: args,
                    phantom_flags: template.phantom_flags.clone(),
                    variants: out,
                }))
            }
        };
        Ok(descriptor)
    }

    fn fields(
        &self,
        fields: &[FieldTemplate],
        args: &[TypeDescriptor],
        owner: &str,
        depth: usize,
    ) -> Result<Vec<FieldDescriptor>> {
        fields
            .iter()
            .map(|f| Ok(FieldDescriptor::new(&f.name, self.layout(&f.ty, args, owner, depth)?)))
            .collect()
    }

    /// Substitute where bytes are laid out; phantom results are rejected.
    fn layout(
        &self,
        ty: &TemplateType,
        args: &[TypeDescriptor],
        owner: &str,
        depth: usize,
    ) -> Result<TypeDescriptor> {
        let desc = self.substitute(ty, args, owner, depth)?;
        require_layout(desc, owner)
    }

    fn substitute(
        &self,
        ty: &TemplateType,
        args: &[TypeDescriptor],
        owner: &str,
        depth: usize,
    ) -> Result<TypeDescriptor> {
        match ty {
            TemplateType::Primitive(kind) => Ok(TypeDescriptor::primitive(*kind)),
            TemplateType::Vector(elem) => Ok(TypeDescriptor::vector_of(
                self.layout(elem, args, owner, depth)?,
            )),
            TemplateType::Param(i) => args.get(*i).cloned().ok_or_else(|| {
                ReifyError::invalid_template(owner, format!("type parameter {} out of range", i))
            }),
            TemplateType::Datatype { name, type_args } => {
                let nested = self
                    .resolver
                    .template(name)
                    .ok_or_else(|| ReifyError::UnknownType(name.clone()))?;
                let nested_args = type_args
                    .iter()
                    .map(|arg| self.substitute(arg, args, owner, depth))
                    .collect::<Result<Vec<_>>>()?;
                self.instantiate(&nested, &nested_args, depth + 1)
            }
        }
    }
}

fn require_layout(desc: TypeDescriptor, owner: &str) -> Result<TypeDescriptor> {
    if let TypeDescriptor::Phantom(inner) = &desc {
        return Err(ReifyError::type_mismatch(
            format!("non-phantom type in {}", owner),
            format!("phantom {}", inner.extract_type()),
        ));
    }
    Ok(desc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance_template() -> DatatypeTemplate {
        DatatypeTemplate::new(
            "0x2::balance::Balance",
            vec![true],
            TemplateBody::Struct(vec![FieldTemplate {
                name: "value".into(),
                ty: TemplateType::u64(),
            }]),
        )
        .unwrap()
    }

    fn pool_template() -> DatatypeTemplate {
        DatatypeTemplate::new(
            "0xabc::pool::Pool",
            vec![true, false],
            TemplateBody::Struct(vec![
                FieldTemplate {
                    name: "reserve".into(),
                    ty: TemplateType::datatype("0x2::balance::Balance", vec![TemplateType::param(0)]),
                },
                FieldTemplate {
                    name: "extra".into(),
                    ty: TemplateType::vector(TemplateType::param(1)),
                },
            ]),
        )
        .unwrap()
    }

    fn resolver() -> HashMap<String, Arc<DatatypeTemplate>> {
        let b = balance_template();
        let mut map = HashMap::new();
        map.insert(b.name.clone(), Arc::new(b));
        map
    }

    #[test]
    fn test_instantiate_substitutes_params() {
        let desc = instantiate(
            &pool_template(),
            &[
                TypeDescriptor::primitive(PrimitiveKind::U8),
                TypeDescriptor::primitive(PrimitiveKind::U16),
            ],
            &resolver(),
        )
        .unwrap();
        let TypeDescriptor::Struct(s) = &desc else {
            panic!("expected struct");
        };
        assert!(s.type_args[0].is_phantom());
        assert_eq!(
            s.fields[1].type_desc,
            TypeDescriptor::vector_of(TypeDescriptor::primitive(PrimitiveKind::U16))
        );
        assert!(desc.extract_type().ends_with("::pool::Pool<u8, u16>"));
        let reserve = &s.fields[0].type_desc;
        assert!(reserve.extract_type().ends_with("::balance::Balance<u8>"));
    }

    #[test]
    fn test_arity_mismatch() {
        for n in [0usize, 1, 3] {
            let args = vec![TypeDescriptor::primitive(PrimitiveKind::U8); n];
            let err = instantiate(&pool_template(), &args, &resolver()).unwrap_err();
            assert!(
                matches!(err, ReifyError::TypeArgumentCountMismatch { expected: 2, found, .. } if found == n)
            );
        }
    }

    #[test]
    fn test_phantom_in_layout_position_rejected() {
        let err = instantiate(
            &pool_template(),
            &[
                TypeDescriptor::primitive(PrimitiveKind::U8),
                TypeDescriptor::phantom_of(TypeDescriptor::primitive(PrimitiveKind::U8)),
            ],
            &resolver(),
        )
        .unwrap_err();
        assert!(matches!(err, ReifyError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unknown_nested_datatype() {
        let err = instantiate(
            &pool_template(),
            &[
                TypeDescriptor::primitive(PrimitiveKind::U8),
                TypeDescriptor::primitive(PrimitiveKind::U8),
            ],
            &(),
        )
        .unwrap_err();
        assert!(matches!(err, ReifyError::UnknownType(name) if name.ends_with("::balance::Balance")));
    }

    #[test]
    fn test_template_validation() {
        let phantom_field = DatatypeTemplate::new(
            "0x1::m::Bad",
            vec![true],
            TemplateBody::Struct(vec![FieldTemplate {
                name: "x".into(),
                ty: TemplateType::param(0),
            }]),
        );
        assert!(matches!(phantom_field, Err(ReifyError::InvalidTemplate { .. })));

        let out_of_range = DatatypeTemplate::new(
            "0x1::m::Bad",
            vec![],
            TemplateBody::Struct(vec![FieldTemplate {
                name: "x".into(),
                ty: TemplateType::vector(TemplateType::param(0)),
            }]),
        );
        assert!(matches!(out_of_range, Err(ReifyError::InvalidTemplate { .. })));

        let duplicate = DatatypeTemplate::new(
            "0x1::m::Bad",
            vec![],
            TemplateBody::Struct(vec![
                FieldTemplate {
                    name: "x".into(),
                    ty: TemplateType::u8(),
                },
                FieldTemplate {
                    name: "x".into(),
                    ty: TemplateType::u8(),
                },
            ]),
        );
        assert!(matches!(duplicate, Err(ReifyError::InvalidTemplate { .. })));

        let generic_name = DatatypeTemplate::new(
            "0x1::m::Bad<u8>",
            vec![],
            TemplateBody::Struct(vec![]),
        );
        assert!(matches!(generic_name, Err(ReifyError::MalformedTypeString { .. })));
    }

    #[test]
    fn test_names_are_normalized() {
        let t = pool_template();
        assert_eq!(
            t.name,
            "0x0000000000000000000000000000000000000000000000000000000000000abc::pool::Pool"
        );
        let TemplateBody::Struct(fields) = &t.body else {
            panic!("expected struct");
        };
        assert_eq!(
            fields[0].ty,
            TemplateType::datatype(
                "0x0000000000000000000000000000000000000000000000000000000000000002::balance::Balance",
                vec![TemplateType::param(0)]
            )
        );
    }
}
