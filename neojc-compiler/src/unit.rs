//! The compilation unit: class lookup, the module under construction and
//! compiler options.

use std::rc::Rc;

use neojc_class::{ClassNode, ClassPath, FieldNode, MemberRef};

use crate::devpack;
use crate::error::{CompileError, Result, Unresolved};
use crate::method::SourceMethod;
use crate::module::NeoModule;

/// Maximum number of static field slots in a module.
pub const MAX_STATIC_SLOTS: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Narrow long jumps, calls and try instructions whose offsets fit in a byte.
    pub optimize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { optimize: true }
    }
}

/// Cross-method state of one compilation run.
pub struct CompilationUnit {
    class_path: Box<dyn ClassPath>,
    pub module: NeoModule,
    pub options: CompileOptions,
}

impl CompilationUnit {
    pub fn new(class_path: Box<dyn ClassPath>, options: CompileOptions) -> Self {
        Self {
            class_path,
            module: NeoModule::new(),
            options,
        }
    }

    pub fn class_path(&self) -> &dyn ClassPath {
        self.class_path.as_ref()
    }

    pub fn load_class(&self, name: &str) -> Result<Rc<ClassNode>> {
        self.class_path
            .load(name)
            .ok_or_else(|| Unresolved::Class(name.to_string()).into())
    }

    /// Find the method `name desc` in `owner` or its nearest superclass that
    /// declares it.
    pub fn resolve_method(&self, owner: &str, name: &str, desc: &str) -> Option<SourceMethod> {
        self.class_path.hierarchy(owner).into_iter().find_map(|class| {
            class
                .method_index(name, desc)
                .map(|index| SourceMethod::new(class, index))
        })
    }

    pub fn resolve_method_ref(&self, method: &MemberRef) -> Result<SourceMethod> {
        self.resolve_method(&method.owner, &method.name, &method.desc)
            .ok_or_else(|| {
                Unresolved::Method {
                    owner: method.owner.clone(),
                    name: method.name.clone(),
                    desc: method.desc.clone(),
                }
                .into()
            })
    }

    pub fn is_subclass_of(&self, name: &str, ancestor: &str) -> bool {
        self.class_path.is_subclass_of(name, ancestor)
    }

    /// Whether `name` is an exception type, either a known JDK one or a
    /// class-path class deriving from one.
    pub fn is_throwable(&self, name: &str) -> bool {
        devpack::JDK_THROWABLES.contains(&name)
            || self
                .class_path
                .hierarchy(name)
                .iter()
                .filter_map(|c| c.super_name.as_deref())
                .any(|s| devpack::JDK_THROWABLES.contains(&s))
    }

    /// Whether `name` is an event type: one of the library's event classes
    /// or a class-path class implementing the event interface.
    pub fn is_event(&self, name: &str) -> bool {
        let library = name
            .strip_prefix(devpack::EVENTS_PACKAGE)
            .is_some_and(|simple| simple.starts_with("Event") && !simple.contains('/'));
        library
            || self
                .class_path
                .hierarchy(name)
                .iter()
                .any(|c| c.implements(devpack::EVENT_INTERFACE))
    }

    /// The static field `field` refers to, searched from its owner upwards.
    pub fn static_field(&self, field: &MemberRef) -> Result<FieldNode> {
        self.class_path
            .hierarchy(&field.owner)
            .iter()
            .find_map(|class| class.static_fields().find(|f| f.name == field.name).cloned())
            .ok_or_else(|| {
                Unresolved::Field {
                    owner: field.owner.clone(),
                    name: field.name.clone(),
                }
                .into()
            })
    }

    /// Static slot of a field: the declaring class's block base plus the
    /// field's index among that class's static fields.
    pub fn static_slot(&mut self, field: &MemberRef, method: &str) -> Result<u8> {
        let unresolved = || Unresolved::Field {
            owner: field.owner.clone(),
            name: field.name.clone(),
        };
        let (class, index) = self
            .class_path
            .hierarchy(&field.owner)
            .into_iter()
            .find_map(|class| {
                let index = class.static_fields().position(|f| f.name == field.name)?;
                Some((class, index))
            })
            .ok_or_else(unresolved)?;
        let count = class.static_fields().count();
        let slot = self.module.static_base(&class.name, count) + index;
        if self.module.static_slot_count() > MAX_STATIC_SLOTS {
            return Err(CompileError::LimitExceeded {
                what: "static fields",
                count: self.module.static_slot_count(),
                limit: MAX_STATIC_SLOTS,
                method: method.to_string(),
            });
        }
        Ok(slot as u8)
    }

    /// Index of an instance field in the flattened layout of `owner`, where
    /// the fields of the root class come first. The nearest class declaring
    /// `name` owns the field, so a field shadowed by a subclass keeps its slot.
    pub fn instance_field_index(&self, owner: &str, name: &str) -> Result<usize> {
        let chain = self.class_path.hierarchy(owner);
        if chain.is_empty() {
            return Err(Unresolved::Class(owner.to_string()).into());
        }
        let (depth, index) = chain
            .iter()
            .enumerate()
            .find_map(|(depth, class)| {
                let index = class.instance_fields().position(|f| f.name == name)?;
                Some((depth, index))
            })
            .ok_or_else(|| Unresolved::Field {
                owner: owner.to_string(),
                name: name.to_string(),
            })?;
        let inherited: usize = chain[depth + 1..]
            .iter()
            .map(|class| class.instance_fields().count())
            .sum();
        Ok(inherited + index)
    }

    /// Number of instance fields of `class`, inherited ones included.
    pub fn instance_field_count(&self, class: &str) -> Result<usize> {
        let chain = self.class_path.hierarchy(class);
        if chain.is_empty() {
            return Err(Unresolved::Class(class.to_string()).into());
        }
        Ok(chain.iter().map(|c| c.instance_fields().count()).sum())
    }

    /// Whether calls on `owner` go to a separately deployed contract.
    ///
    /// Such classes extend the contract interface base class and declare the
    /// contract's script hash.
    pub fn is_contract_interface(&self, owner: &ClassNode) -> Result<bool> {
        let extends_base = owner.name != devpack::CONTRACT_INTERFACE
            && self
                .class_path
                .is_subclass_of(&owner.name, devpack::CONTRACT_INTERFACE);
        match (extends_base, owner.contract_hash().is_some()) {
            (true, true) => Ok(true),
            (false, false) => Ok(false),
            (true, false) => Err(Unresolved::ContractHash(owner.name.clone()).into()),
            (false, true) => Err(CompileError::UnsupportedCall {
                callee: owner.name.clone(),
                method: owner.simple_name().to_string(),
                reason: format!(
                    "a class with a contract hash must extend {}",
                    devpack::CONTRACT_INTERFACE
                ),
            }),
        }
    }
}
