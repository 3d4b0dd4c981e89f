use std::collections::HashMap;
use std::fmt;

use neojc_isa::CallFlags;

use crate::error::{CompileError, Result};
use crate::method::NeoMethod;

/// Index of a method in its [`NeoModule`], stable for the lifetime of the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(usize);

impl MethodId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity of a source method: `owner.name(desc)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey(String);

impl MethodKey {
    pub fn new(owner: &str, name: &str, desc: &str) -> Self {
        MethodKey(format!("{owner}.{name}{desc}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A call into a separately deployed contract, referenced by CALLT.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodToken {
    /// Script hash of the called contract, little-endian.
    pub hash: [u8; 20],
    pub method: String,
    pub params: u16,
    pub has_return: bool,
    pub call_flags: CallFlags,
}

/// An event emitted by the contract, as listed in its manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeoEvent {
    pub name: String,
    pub params: usize,
}

#[derive(Debug)]
enum Slot {
    /// Registered, body not converted yet.
    Pending { key: MethodKey, name: String },
    Converted(NeoMethod),
}

/// The cross-method result of a compilation: converted methods in
/// registration order, method tokens and static field slots.
#[derive(Debug, Default)]
pub struct NeoModule {
    slots: Vec<Slot>,
    ids: HashMap<MethodKey, MethodId>,
    tokens: Vec<MethodToken>,
    events: Vec<NeoEvent>,
    static_bases: HashMap<String, usize>,
    static_slots: usize,
}

impl NeoModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method_id(&self, key: &MethodKey) -> Option<MethodId> {
        self.ids.get(key).copied()
    }

    /// Register a placeholder for a method whose body is about to be converted.
    ///
    /// Returns the existing id if the key is already registered.
    pub fn reserve(&mut self, key: MethodKey, name: &str) -> MethodId {
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = MethodId(self.slots.len());
        log::debug!("registered method #{} {key}", id.0);
        self.ids.insert(key.clone(), id);
        self.slots.push(Slot::Pending {
            key,
            name: name.to_string(),
        });
        id
    }

    /// Store the converted body in the slot reserved for it.
    pub fn install(&mut self, method: NeoMethod) {
        let index = method.id().0;
        self.slots[index] = Slot::Converted(method);
    }

    pub fn method(&self, id: MethodId) -> Option<&NeoMethod> {
        match self.slots.get(id.0)? {
            Slot::Converted(m) => Some(m),
            Slot::Pending { .. } => None,
        }
    }

    pub fn is_converted(&self, id: MethodId) -> bool {
        self.method(id).is_some()
    }

    /// Name of a registered method, converted or not.
    pub fn method_name(&self, id: MethodId) -> Option<&str> {
        match self.slots.get(id.0)? {
            Slot::Converted(m) => Some(m.name()),
            Slot::Pending { name, .. } => Some(name),
        }
    }

    pub fn method_count(&self) -> usize {
        self.slots.len()
    }

    /// Converted methods in registration order.
    pub fn methods(&self) -> impl Iterator<Item = &NeoMethod> {
        self.slots.iter().filter_map(|s| match s {
            Slot::Converted(m) => Some(m),
            Slot::Pending { .. } => None,
        })
    }

    /// Methods registered but never converted, by key.
    pub fn pending(&self) -> impl Iterator<Item = &MethodKey> {
        self.slots.iter().filter_map(|s| match s {
            Slot::Pending { key, .. } => Some(key),
            Slot::Converted(_) => None,
        })
    }

    /// Add a method token, reusing an equal one. Returns its table index.
    pub fn add_token(&mut self, token: MethodToken) -> Result<u16> {
        let index = match self.tokens.iter().position(|t| *t == token) {
            Some(i) => i,
            None => {
                log::debug!("method token #{} {}", self.tokens.len(), token.method);
                self.tokens.push(token);
                self.tokens.len() - 1
            }
        };
        u16::try_from(index).map_err(|_| CompileError::LimitExceeded {
            what: "method tokens",
            count: index + 1,
            limit: u16::MAX as usize + 1,
            method: "<module>".to_string(),
        })
    }

    pub fn tokens(&self) -> &[MethodToken] {
        &self.tokens
    }

    /// Record an emitted event. Events are listed once per name.
    pub fn add_event(&mut self, event: NeoEvent) -> Result<()> {
        match self.events.iter().find(|e| e.name == event.name) {
            Some(known) if known.params != event.params => Err(CompileError::MalformedInput {
                method: "<module>".to_string(),
                detail: format!(
                    "event {} is emitted with {} and {} arguments",
                    event.name, known.params, event.params
                ),
            }),
            Some(_) => Ok(()),
            None => {
                log::debug!("event {} with {} arguments", event.name, event.params);
                self.events.push(event);
                Ok(())
            }
        }
    }

    pub fn events(&self) -> &[NeoEvent] {
        &self.events
    }

    /// First static slot of `class`, allocating `count` slots on first use.
    pub(crate) fn static_base(&mut self, class: &str, count: usize) -> usize {
        if let Some(base) = self.static_bases.get(class) {
            return *base;
        }
        let base = self.static_slots;
        self.static_slots += count;
        self.static_bases.insert(class.to_string(), base);
        base
    }

    /// Number of static slots used by all classes (the INITSSLOT operand).
    pub fn static_slot_count(&self) -> usize {
        self.static_slots
    }
}
