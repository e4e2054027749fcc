//! In-memory object model for tests and the simulation binary
//!
//! Implements the host boundary with plain maps so scenarios can be
//! scripted without an attached process: classes declare members and get
//! keys back, objects carry per-key values and callables, statics are
//! settable from the outside while a scenario runs.

use crate::host::{
    ClassRef, ClassShape, HostError, HostObject, MemberKey, MethodSig, ObjectModel, Value,
};
use ahash::AHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type MethodFn = Rc<dyn Fn(&[Value]) -> Result<Value, HostError>>;

/// Scriptable implementation of [`ObjectModel`]
#[derive(Default)]
pub struct MemoryModel {
    classes: RefCell<AHashMap<String, Rc<MemoryClass>>>,
    next_key: Rc<Cell<u64>>,
}

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a class, or fetch it if it already exists.
    pub fn define_class(&self, name: &str) -> Rc<MemoryClass> {
        if let Some(class) = self.classes.borrow().get(name) {
            return class.clone();
        }
        let class = Rc::new(MemoryClass::new(name, self.next_key.clone()));
        self.classes
            .borrow_mut()
            .insert(name.to_string(), class.clone());
        class
    }
}

impl ObjectModel for MemoryModel {
    fn class(&self, name: &str) -> Option<ClassRef> {
        self.classes
            .borrow()
            .get(name)
            .map(|class| class.clone() as ClassRef)
    }
}

/// One declared class in a [`MemoryModel`]
pub struct MemoryClass {
    name: String,
    next_key: Rc<Cell<u64>>,
    properties: RefCell<AHashMap<String, MemberKey>>,
    methods: RefCell<AHashMap<String, MethodSig>>,
    static_properties: RefCell<AHashMap<String, MemberKey>>,
    static_methods: RefCell<AHashMap<String, MethodSig>>,
    static_values: RefCell<AHashMap<MemberKey, Value>>,
    static_calls: RefCell<AHashMap<MemberKey, MethodFn>>,
    enum_tags: RefCell<AHashMap<String, Value>>,
}

impl MemoryClass {
    fn new(name: &str, next_key: Rc<Cell<u64>>) -> Self {
        Self {
            name: name.to_string(),
            next_key,
            properties: RefCell::new(AHashMap::new()),
            methods: RefCell::new(AHashMap::new()),
            static_properties: RefCell::new(AHashMap::new()),
            static_methods: RefCell::new(AHashMap::new()),
            static_values: RefCell::new(AHashMap::new()),
            static_calls: RefCell::new(AHashMap::new()),
            enum_tags: RefCell::new(AHashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn alloc_key(&self) -> MemberKey {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        MemberKey(key)
    }

    /// Declare a readable instance member and get its key.
    pub fn declare_property(&self, name: &str) -> MemberKey {
        if let Some(key) = self.properties.borrow().get(name) {
            return *key;
        }
        let key = self.alloc_key();
        self.properties.borrow_mut().insert(name.to_string(), key);
        key
    }

    /// Declare a callable instance member.
    pub fn declare_method(&self, name: &str, arity: usize) -> MethodSig {
        if let Some(sig) = self.methods.borrow().get(name) {
            return *sig;
        }
        let sig = MethodSig {
            key: self.alloc_key(),
            arity,
        };
        self.methods.borrow_mut().insert(name.to_string(), sig);
        sig
    }

    /// Declare a readable static member.
    pub fn declare_static_property(&self, name: &str) -> MemberKey {
        if let Some(key) = self.static_properties.borrow().get(name) {
            return *key;
        }
        let key = self.alloc_key();
        self.static_properties
            .borrow_mut()
            .insert(name.to_string(), key);
        key
    }

    /// Declare a callable static member with its behavior.
    pub fn declare_static_method(
        &self,
        name: &str,
        arity: usize,
        call: impl Fn(&[Value]) -> Result<Value, HostError> + 'static,
    ) -> MethodSig {
        let sig = MethodSig {
            key: self.alloc_key(),
            arity,
        };
        self.static_methods.borrow_mut().insert(name.to_string(), sig);
        self.static_calls.borrow_mut().insert(sig.key, Rc::new(call));
        sig
    }

    /// Set a static member's current value.
    pub fn set_static(&self, key: MemberKey, value: Value) {
        self.static_values.borrow_mut().insert(key, value);
    }

    /// Declare a variant of this class's enumeration.
    pub fn declare_enum_tag(&self, name: &str, value: Value) {
        self.enum_tags.borrow_mut().insert(name.to_string(), value);
    }
}

impl ClassShape for MemoryClass {
    fn property(&self, name: &str) -> Option<MemberKey> {
        self.properties.borrow().get(name).copied()
    }

    fn method(&self, name: &str) -> Option<MethodSig> {
        self.methods.borrow().get(name).copied()
    }

    fn static_property(&self, name: &str) -> Option<MemberKey> {
        self.static_properties.borrow().get(name).copied()
    }

    fn static_method(&self, name: &str) -> Option<MethodSig> {
        self.static_methods.borrow().get(name).copied()
    }

    fn enum_tag(&self, name: &str) -> Option<Value> {
        self.enum_tags.borrow().get(name).cloned()
    }

    fn read_static(&self, key: MemberKey) -> Result<Value, HostError> {
        self.static_values
            .borrow()
            .get(&key)
            .cloned()
            .ok_or(HostError::UnknownMember)
    }

    fn call_static(&self, sig: MethodSig, args: &[Value]) -> Result<Value, HostError> {
        let call = self
            .static_calls
            .borrow()
            .get(&sig.key)
            .cloned()
            .ok_or(HostError::UnknownMember)?;
        call(args)
    }
}

/// Scriptable host object with per-member values and callables
pub struct MemoryObject {
    id: u64,
    fields: RefCell<AHashMap<MemberKey, Value>>,
    calls: RefCell<AHashMap<MemberKey, MethodFn>>,
}

impl MemoryObject {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            fields: RefCell::new(AHashMap::new()),
            calls: RefCell::new(AHashMap::new()),
        }
    }

    /// Set a member value; also used to mutate the object mid-scenario.
    pub fn set(&self, key: MemberKey, value: Value) {
        self.fields.borrow_mut().insert(key, value);
    }

    /// Remove a member value, simulating a field the live object lacks.
    pub fn clear(&self, key: MemberKey) {
        self.fields.borrow_mut().remove(&key);
    }

    /// Attach behavior to a callable member.
    pub fn on_call(
        &self,
        sig: MethodSig,
        call: impl Fn(&[Value]) -> Result<Value, HostError> + 'static,
    ) {
        self.calls.borrow_mut().insert(sig.key, Rc::new(call));
    }
}

impl HostObject for MemoryObject {
    fn identity(&self) -> u64 {
        self.id
    }

    fn read(&self, key: MemberKey) -> Result<Value, HostError> {
        self.fields
            .borrow()
            .get(&key)
            .cloned()
            .ok_or(HostError::UnknownMember)
    }

    fn call(&self, sig: MethodSig, args: &[Value]) -> Result<Value, HostError> {
        if args.len() != sig.arity {
            return Err(HostError::Faulted(format!(
                "{} args passed to arity-{} member",
                args.len(),
                sig.arity
            )));
        }
        let call = self
            .calls
            .borrow()
            .get(&sig.key)
            .cloned()
            .ok_or(HostError::UnknownMember)?;
        call(args)
    }
}
