//! Boundary between the overlay core and the plugin host
//!
//! The host's entity layout is versioned independently of this crate and is
//! not known at compile time, so everything the overlay reads arrives
//! through the narrow introspection traits here: a type universe probed by
//! name ([`ObjectModel`]), per-class member probes ([`ClassShape`]), and
//! opaque object handles ([`HostObject`]). The providers at the bottom
//! (`Clock`, `ViewpointProvider`, `LabelSink`) are the other direction:
//! what the shell feeds the overlay and what the overlay hands back.
//!
//! Everything runs on the single tick thread; object handles are `Rc` and
//! stay valid only for the current read.

pub mod memory;
mod value;

pub use value::Value;

use crate::core::types::EntityId;
use glam::Vec3;
use std::rc::Rc;
use thiserror::Error;

/// Errors surfaced by host reads and calls
///
/// These stop at the accessor layer; everything above it only ever sees
/// absent or default data.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("member not present on this object")]
    UnknownMember,

    #[error("host invocation failed: {0}")]
    Faulted(String),
}

/// Opaque token for a resolved member, meaningful only to the model that
/// issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberKey(pub u64);

/// A resolved callable member and its parameter count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSig {
    pub key: MemberKey,
    pub arity: usize,
}

pub type ClassRef = Rc<dyn ClassShape>;
pub type ObjectRef = Rc<dyn HostObject>;

/// The host's type universe, probed by name
pub trait ObjectModel {
    /// Resolve a class by its host-side name. `None` means the attached
    /// build of the host does not declare it.
    fn class(&self, name: &str) -> Option<ClassRef>;
}

/// Introspection surface of one host class
///
/// Probes answer "does this build declare that member"; reads and calls
/// may still fault on a live object, which is reported per read.
pub trait ClassShape {
    /// Probe a readable instance member.
    fn property(&self, name: &str) -> Option<MemberKey>;

    /// Probe a callable instance member.
    fn method(&self, name: &str) -> Option<MethodSig>;

    /// Probe a readable static member.
    fn static_property(&self, name: &str) -> Option<MemberKey>;

    /// Probe a callable static member.
    fn static_method(&self, name: &str) -> Option<MethodSig>;

    /// Resolve a variant of the class's own enumeration as a host value.
    fn enum_tag(&self, name: &str) -> Option<Value>;

    fn read_static(&self, key: MemberKey) -> Result<Value, HostError>;

    fn call_static(&self, sig: MethodSig, args: &[Value]) -> Result<Value, HostError>;
}

/// One host-managed object, borrowed for the duration of a single read
pub trait HostObject {
    /// Host-provided stable identity for this object.
    fn identity(&self) -> u64;

    fn read(&self, key: MemberKey) -> Result<Value, HostError>;

    fn call(&self, sig: MethodSig, args: &[Value]) -> Result<Value, HostError>;
}

/// Monotonic time source in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Camera-equivalent transform used to orient nameplate anchors
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub position: Vec3,
    pub forward: Vec3,
}

/// Supplies the current viewpoint, when one exists
pub trait ViewpointProvider {
    fn viewpoint(&self) -> Option<Viewpoint>;
}

/// World-space placement for one nameplate label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub position: Vec3,
    /// Unit vector from the viewpoint toward the label; the renderer uses
    /// it to billboard the text.
    pub facing: Vec3,
}

/// Receiver for nameplate presentation updates
///
/// Implemented by the rendering side; the overlay core only names labels
/// by entity id and never touches text layout.
pub trait LabelSink {
    fn set_text(&mut self, id: EntityId, text: &str);

    fn set_anchor(&mut self, id: EntityId, anchor: LabelAnchor);

    fn set_visible(&mut self, id: EntityId, visible: bool);
}
