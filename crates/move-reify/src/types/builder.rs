// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for datatype templates.
//!
//! This is the surface generated registration glue calls, one builder chain
//! per declared type.

use crate::error::Result;
use crate::types::template::{
    DatatypeTemplate, FieldTemplate, PayloadTemplate, TemplateBody, TemplateType, VariantTemplate,
};

/// Builder for struct templates.
#[derive(Debug)]
pub struct StructTemplateBuilder {
    name: String,
    phantom_flags: Vec<bool>,
    fields: Vec<FieldTemplate>,
}

impl StructTemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phantom_flags: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Declare the next type parameter.
    pub fn type_param(mut self) -> Self {
        self.phantom_flags.push(false);
        self
    }

    /// Declare the next type parameter as phantom.
    pub fn phantom_param(mut self) -> Self {
        self.phantom_flags.push(true);
        self
    }

    /// Append a field; declaration order is wire order.
    pub fn field(mut self, name: impl Into<String>, ty: TemplateType) -> Self {
        self.fields.push(FieldTemplate {
            name: name.into(),
            ty,
        });
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<DatatypeTemplate> {
        DatatypeTemplate::new(&self.name, self.phantom_flags, TemplateBody::Struct(self.fields))
    }
}

/// Builder for enum templates.
#[derive(Debug)]
pub struct EnumTemplateBuilder {
    name: String,
    phantom_flags: Vec<bool>,
    variants: Vec<VariantTemplate>,
}

impl EnumTemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phantom_flags: Vec::new(),
            variants: Vec::new(),
        }
    }

    pub fn type_param(mut self) -> Self {
        self.phantom_flags.push(false);
        self
    }

    pub fn phantom_param(mut self) -> Self {
        self.phantom_flags.push(true);
        self
    }

    /// Variant without payload. Variant index is declaration order.
    pub fn unit_variant(mut self, name: impl Into<String>) -> Self {
        self.variants.push(VariantTemplate {
            name: name.into(),
            payload: PayloadTemplate::Unit,
        });
        self
    }

    /// Variant with named fields.
    pub fn named_variant<N: Into<String>>(
        mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, TemplateType)>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .map(|(n, ty)| FieldTemplate { name: n.into(), ty })
            .collect();
        self.variants.push(VariantTemplate {
            name: name.into(),
            payload: PayloadTemplate::Named(fields),
        });
        self
    }

    /// Variant with positional fields.
    pub fn positional_variant(
        mut self,
        name: impl Into<String>,
        types: impl IntoIterator<Item = TemplateType>,
    ) -> Self {
        self.variants.push(VariantTemplate {
            name: name.into(),
            payload: PayloadTemplate::Positional(types.into_iter().collect()),
        });
        self
    }

    pub fn build(self) -> Result<DatatypeTemplate> {
        DatatypeTemplate::new(&self.name, self.phantom_flags, TemplateBody::Enum(self.variants))
    }
}
