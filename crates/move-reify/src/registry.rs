// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct/enum registry.
//!
//! Maps bare canonical names to [`DatatypeTemplate`]s and resolves full type
//! strings (`0x2::coin::Coin<0x2::sui::SUI>`) into [`DecodeBundle`]s.
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry
//! +-- templates: RwLock<HashMap<bare name, Arc<DatatypeTemplate>>>   (append-only)
//! +-- schemas:   SchemaCache  (DashMap, canonical name -> BinarySchema)
//! +-- bundles:   DashMap<canonical name, Arc<DecodeBundle>>
//! +-- initialized: Mutex<bool>  (init_once guard)
//! ```
//!
//! # Thread Safety
//!
//! - Registration takes the template write lock; resolution only read locks
//! - No lock is held while a schema or bundle is built; concurrent misses may
//!   build twice and the first cached copy wins
//! - `init_once` serializes population; `populate` must not call `init_once`

use crate::bcs::SchemaCache;
use crate::bundle::DecodeBundle;
use crate::config::ReifyConfig;
use crate::decode::DecodeOptions;
use crate::error::{ReifyError, Result};
use crate::types::{
    instantiate_bounded, normalize_type_name, DatatypeTemplate, PrimitiveKind, TemplateResolver,
    TypeDescriptor, TypeTag,
};
use crate::value::MoveValue;
use crate::well_known::framework_templates;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

/// Process-wide registry, created empty on first use.
///
/// Populate it with [`TypeRegistry::init_once`].
pub fn global_registry() -> &'static TypeRegistry {
    GLOBAL_REGISTRY.get_or_init(TypeRegistry::new)
}

/// Registry of datatype templates with resolved-bundle caching.
#[derive(Debug)]
pub struct TypeRegistry {
    config: ReifyConfig,
    templates: RwLock<HashMap<String, Arc<DatatypeTemplate>>>,
    schemas: SchemaCache,
    bundles: DashMap<String, Arc<DecodeBundle>>,
    initialized: Mutex<bool>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::with_config(ReifyConfig::default())
    }

    pub fn with_config(config: ReifyConfig) -> Self {
        Self {
            config,
            templates: RwLock::new(HashMap::new()),
            schemas: SchemaCache::new(),
            bundles: DashMap::new(),
            initialized: Mutex::new(false),
        }
    }

    /// Registry with the framework types already registered.
    pub fn with_framework() -> Result<Self> {
        let registry = Self::new();
        registry.register_framework()?;
        Ok(registry)
    }

    pub fn config(&self) -> &ReifyConfig {
        &self.config
    }

    /// Register `String`, `Option`, `UID`, `Coin` and the other framework types.
    pub fn register_framework(&self) -> Result<()> {
        for template in framework_templates()? {
            self.register(template)?;
        }
        Ok(())
    }

    /// Register a template under its bare name.
    ///
    /// The template is validated again; registering a name twice fails with
    /// [`ReifyError::DuplicateRegistration`].
    pub fn register(&self, template: DatatypeTemplate) -> Result<()> {
        let DatatypeTemplate {
            name,
            phantom_flags,
            body,
        } = template;
        let template = DatatypeTemplate::new(&name, phantom_flags, body)?;

        let mut templates = self.templates.write();
        match templates.entry(template.name.clone()) {
            Entry::Occupied(_) => {
                log::debug!("[registry] duplicate registration of {}", template.name);
                Err(ReifyError::DuplicateRegistration(template.name))
            }
            Entry::Vacant(slot) => {
                log::debug!(
                    "[registry] registered {} ({} type params)",
                    template.name,
                    template.num_type_params()
                );
                slot.insert(Arc::new(template));
                Ok(())
            }
        }
    }

    /// Whether `type_name` (bare or full) names a registered datatype.
    pub fn contains(&self, type_name: &str) -> bool {
        match TypeTag::parse(type_name) {
            Ok(TypeTag::Struct(tag)) => self.templates.read().contains_key(&tag.bare_name()),
            _ => false,
        }
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.read().is_empty()
    }

    /// Run `populate` once per registry.
    ///
    /// Returns `Ok(true)` when `populate` ran and succeeded, `Ok(false)` when
    /// the registry was already initialized. A failing `populate` leaves the
    /// registry uninitialized (templates it registered stay registered).
    pub fn init_once<F>(&self, populate: F) -> Result<bool>
    where
        F: FnOnce(&Self) -> Result<()>,
    {
        let mut initialized = self.initialized.lock();
        if *initialized {
            return Ok(false);
        }
        populate(self)?;
        *initialized = true;
        log::debug!("[registry] initialized with {} templates", self.len());
        Ok(true)
    }

    /// Descriptor for any type string: primitives, `vector<..>` and
    /// registered datatypes with fully resolved arguments.
    pub fn resolve_type(&self, type_name: &str) -> Result<TypeDescriptor> {
        let tag = TypeTag::parse(type_name)?;
        self.descriptor_for(&tag, 0)
    }

    fn descriptor_for(&self, tag: &TypeTag, depth: usize) -> Result<TypeDescriptor> {
        if depth > self.config.max_type_depth {
            return Err(ReifyError::malformed_type(
                &tag.to_string(),
                format!("type nesting exceeds {}", self.config.max_type_depth),
            ));
        }
        if let Some(kind) = PrimitiveKind::from_tag(tag) {
            return Ok(TypeDescriptor::primitive(kind));
        }
        match tag {
            TypeTag::Vector(elem) => {
                Ok(TypeDescriptor::vector_of(self.descriptor_for(elem, depth + 1)?))
            }
            TypeTag::Struct(s) => {
                let bare = s.bare_name();
                let template = self
                    .template(&bare)
                    .ok_or_else(|| ReifyError::UnknownType(bare.clone()))?;
                let args = s
                    .type_params
                    .iter()
                    .map(|arg| self.descriptor_for(arg, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                instantiate_bounded(&template, &args, self, self.config.max_type_depth)
            }
            other => Err(ReifyError::UnknownType(other.to_string())),
        }
    }

    /// Bundle for `type_name`, cached by canonical name.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<DecodeBundle>> {
        let key = normalize_type_name(type_name)?;
        if self.config.cache_bundles {
            if let Some(hit) = self.bundles.get(&key).map(|e| Arc::clone(e.value())) {
                log::trace!("[registry] bundle cache hit {}", key);
                return Ok(hit);
            }
        }

        let descriptor = self.resolve_type(&key)?;
        let bundle = Arc::new(
            DecodeBundle::new(descriptor, &self.schemas)?
                .with_options(DecodeOptions::from_config(&self.config)),
        );
        log::debug!("[registry] resolved {}", key);

        if !self.config.cache_bundles {
            return Ok(bundle);
        }
        Ok(Arc::clone(self.bundles.entry(key).or_insert(bundle).value()))
    }

    /// Resolve `type_name` and decode `bytes` as BCS in one call.
    ///
    /// For values discovered at runtime by type string (dynamic fields,
    /// event payloads).
    pub fn decode_dynamic_field(&self, type_name: &str, bytes: &[u8]) -> Result<MoveValue> {
        self.resolve(type_name)?.decode_bcs(bytes)
    }

    /// Drop cached bundles and schemas. Templates stay registered.
    pub fn clear_caches(&self) {
        self.bundles.clear();
        self.schemas.clear();
        log::debug!("[registry] caches cleared");
    }
}

impl TemplateResolver for TypeRegistry {
    fn template(&self, bare_name: &str) -> Option<Arc<DatatypeTemplate>> {
        self.templates.read().get(bare_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StructTemplateBuilder, TemplateType};
    use crate::well_known;

    fn pool_template() -> DatatypeTemplate {
        StructTemplateBuilder::new("0xabc::pool::Pool")
            .phantom_param()
            .type_param()
            .field("reserve", TemplateType::u64())
            .field("extra", TemplateType::param(1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = TypeRegistry::new();
        registry.register(pool_template()).unwrap();
        assert!(matches!(
            registry.register(pool_template()),
            Err(ReifyError::DuplicateRegistration(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_revalidates() {
        let registry = TypeRegistry::new();
        let mut template = pool_template();
        template.phantom_flags.pop();
        assert!(matches!(
            registry.register(template),
            Err(ReifyError::InvalidTemplate { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::with_framework().unwrap();
        assert!(matches!(
            registry.resolve("0x9::nope::Nope"),
            Err(ReifyError::UnknownType(_))
        ));
        // Unknown argument of a known type.
        assert!(matches!(
            registry.resolve("0x2::coin::Coin<0x9::nope::Nope>"),
            Err(ReifyError::UnknownType(_))
        ));
        assert!(matches!(
            registry.resolve_type("signer"),
            Err(ReifyError::UnknownType(_))
        ));
    }

    #[test]
    fn test_resolve_nested_arguments() {
        let registry = TypeRegistry::with_framework().unwrap();
        registry.register(pool_template()).unwrap();

        let bundle = registry
            .resolve("0xabc::pool::Pool<0x2::sui::SUI, 0x2::coin::Coin<0x2::sui::SUI>>")
            .unwrap();
        assert_eq!(
            bundle.type_name(),
            normalize_type_name("0xabc::pool::Pool<0x2::sui::SUI, 0x2::coin::Coin<0x2::sui::SUI>>")
                .unwrap()
        );
        // reserve + Coin { UID, Balance }
        assert_eq!(bundle.schema().fixed_size(), Some(8 + 32 + 8));

        let descriptor = registry.resolve_type("vector<0x1::option::Option<u64>>").unwrap();
        assert_eq!(
            descriptor.extract_type(),
            format!("vector<{}<u64>>", well_known::OPTION)
        );
    }

    #[test]
    fn test_arity_checked() {
        let registry = TypeRegistry::with_framework().unwrap();
        assert!(matches!(
            registry.resolve("0x2::coin::Coin"),
            Err(ReifyError::TypeArgumentCountMismatch { expected: 1, found: 0, .. })
        ));
        assert!(matches!(
            registry.resolve("0x1::string::String<u8>"),
            Err(ReifyError::TypeArgumentCountMismatch { expected: 0, found: 1, .. })
        ));
    }

    #[test]
    fn test_bundle_cache() {
        let registry = TypeRegistry::with_framework().unwrap();
        let a = registry.resolve("0x1::option::Option<u8>").unwrap();
        let b = registry
            .resolve("0x0000000000000000000000000000000000000000000000000000000000000001::option::Option<u8>")
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        registry.clear_caches();
        let c = registry.resolve("0x1::option::Option<u8>").unwrap();
        assert!(!Arc::ptr_eq(&a, &c));

        let uncached = TypeRegistry::with_config(ReifyConfig {
            cache_bundles: false,
            ..ReifyConfig::default()
        });
        uncached.register_framework().unwrap();
        let d = uncached.resolve("0x1::option::Option<u8>").unwrap();
        let e = uncached.resolve("0x1::option::Option<u8>").unwrap();
        assert!(!Arc::ptr_eq(&d, &e));
    }

    #[test]
    fn test_concurrent_resolve_shares_bundle() {
        let registry = TypeRegistry::with_framework().unwrap();
        let bundles: Vec<Arc<DecodeBundle>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.resolve("0x2::coin::Coin<0x2::sui::SUI>").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for bundle in &bundles[1..] {
            assert!(Arc::ptr_eq(&bundles[0], bundle));
        }
    }

    #[test]
    fn test_init_once() {
        let registry = TypeRegistry::new();
        let failed = registry.init_once(|_| Err(ReifyError::UnknownType("boom".into())));
        assert!(failed.is_err());

        assert!(registry.init_once(|r| r.register_framework()).unwrap());
        assert!(!registry.init_once(|_| panic!("populate must not run twice")).unwrap());
        assert!(registry.contains("0x2::coin::Coin<0x2::sui::SUI>"));
        assert!(!registry.contains("u64"));
    }

    #[test]
    fn test_decode_dynamic_field() {
        let registry = TypeRegistry::with_framework().unwrap();
        let mut bytes = vec![0x11; 32];
        bytes.push(7);
        bytes.extend(2u64.to_le_bytes());
        let value = registry
            .decode_dynamic_field("0x2::dynamic_field::Field<u8, u64>", &bytes)
            .unwrap();
        assert_eq!(value.field("name"), Some(&MoveValue::U8(7)));
        assert_eq!(value.field("value"), Some(&MoveValue::U64(2)));
        assert_eq!(
            value.field("id").and_then(MoveValue::as_str),
            Some(format!("0x{}", "11".repeat(32)).as_str())
        );
    }
}
