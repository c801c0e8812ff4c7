//! Typed references to server-side objects.
//!
//! Every object the server manages is named by an opaque handle it assigns
//! (`OpaqueRef:<uuid>` in practice, though clients must not parse it). The
//! handle is pure capability: the client only ever passes it back to the
//! server. [`Ref`] wraps the handle together with a class marker, so a
//! reference to one class cannot be handed to a method expecting another —
//! the mix-up is a compile error, not a server-side `HANDLE_INVALID`.

use core::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// The handle the server uses for "no object".
const NULL_HANDLE: &str = "OpaqueRef:NULL";

/// A server-side object class.
///
/// Implemented only by the uninhabited marker types in this module. `NAME`
/// is the class name on the wire, i.e. the prefix of its method names.
pub trait Class {
    /// The wire name of the class.
    const NAME: &'static str;
}

/// An opaque reference to one server-side object of class `C`.
///
/// References are cheap to clone, hashable, and usable as map keys; on the
/// wire they are plain strings. The default value is the empty handle, which
/// the server treats the same as its own [null handle](Ref::is_null).
pub struct Ref<C> {
    handle: String,
    _class: PhantomData<C>,
}

impl<C> Ref<C> {
    /// Wrap a raw wire handle.
    pub fn new(handle: impl Into<String>) -> Self {
        Self { handle: handle.into(), _class: PhantomData }
    }

    /// The raw wire handle.
    pub fn as_str(&self) -> &str {
        &self.handle
    }

    /// Unwrap into the raw wire handle.
    pub fn into_string(self) -> String {
        self.handle
    }

    /// Whether this reference names no object.
    ///
    /// True for the empty handle (the default value) and for the server's
    /// explicit null handle. Record fields that reference a missing object
    /// hold the latter.
    pub fn is_null(&self) -> bool {
        self.handle.is_empty() || self.handle == NULL_HANDLE
    }
}

// The derives would put bounds on `C`, which the uninhabited markers never
// satisfy, so these are spelled out.

impl<C> Clone for Ref<C> {
    fn clone(&self) -> Self {
        Self::new(self.handle.clone())
    }
}

impl<C> Default for Ref<C> {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl<C> PartialEq for Ref<C> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<C> Eq for Ref<C> {}

impl<C> PartialOrd for Ref<C> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> Ord for Ref<C> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.handle.cmp(&other.handle)
    }
}

impl<C> Hash for Ref<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl<C: Class> fmt::Debug for Ref<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref<{}>({:?})", C::NAME, self.handle)
    }
}

impl<C> fmt::Display for Ref<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.handle)
    }
}

impl<C> From<&str> for Ref<C> {
    fn from(handle: &str) -> Self {
        Self::new(handle)
    }
}

impl<C> From<String> for Ref<C> {
    fn from(handle: String) -> Self {
        Self::new(handle)
    }
}

impl<C> Serialize for Ref<C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.handle)
    }
}

impl<'de, C> Deserialize<'de> for Ref<C> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor<C>(PhantomData<C>);

        impl<C> de::Visitor<'_> for Visitor<C> {
            type Value = Ref<C>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object handle string")
            }

            fn visit_str<E>(self, handle: &str) -> Result<Ref<C>, E>
            where
                E: de::Error,
            {
                Ok(Ref::new(handle))
            }

            fn visit_string<E>(self, handle: String) -> Result<Ref<C>, E>
            where
                E: de::Error,
            {
                Ok(Ref::new(handle))
            }
        }

        deserializer.deserialize_string(Visitor(PhantomData))
    }
}

macro_rules! classes {
    ($($marker:ident = $name:literal as $alias:ident),* $(,)?) => {
        $(
            #[doc = concat!("Marker for the `", $name, "` class.")]
            #[derive(Debug)]
            pub enum $marker {}

            impl Class for $marker {
                const NAME: &'static str = $name;
            }

            #[doc = concat!("A reference to a `", $name, "` object.")]
            pub type $alias = Ref<$marker>;
        )*
    };
}

classes! {
    Session = "session" as SessionRef,
    Task = "task" as TaskRef,
    Sr = "SR" as SrRef,
    Pbd = "PBD" as PbdRef,
    Vdi = "VDI" as VdiRef,
    Vm = "VM" as VmRef,
    VmAppliance = "VM_appliance" as VmApplianceRef,
    Host = "host" as HostRef,
    Blob = "blob" as BlobRef,
    DrTask = "DR_task" as DrTaskRef,
    Role = "role" as RoleRef,
    Subject = "subject" as SubjectRef,
    Observer = "Observer" as ObserverRef,
    Feature = "Feature" as FeatureRef,
    Repository = "Repository" as RepositoryRef,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn wire_form_is_a_bare_string() {
        let sr = SrRef::new("OpaqueRef:75ecbf71");
        assert_eq!(serde_json::to_value(&sr).unwrap(), serde_json::json!("OpaqueRef:75ecbf71"));

        let back: SrRef = serde_json::from_value(serde_json::json!("OpaqueRef:75ecbf71")).unwrap();
        assert_eq!(back, sr);
    }

    #[test]
    fn null_detection() {
        assert!(SrRef::default().is_null());
        assert!(SrRef::new("OpaqueRef:NULL").is_null());
        assert!(!SrRef::new("OpaqueRef:75ecbf71").is_null());
    }

    #[test]
    fn debug_names_the_class() {
        let task = TaskRef::new("OpaqueRef:1f00");
        assert_eq!(format!("{task:?}"), "Ref<task>(\"OpaqueRef:1f00\")");
        assert_eq!(task.to_string(), "OpaqueRef:1f00");
    }

    #[test]
    fn usable_as_map_keys() {
        let map = HashMap::from([(TaskRef::new("OpaqueRef:a"), 1i64)]);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({ "OpaqueRef:a": 1 }));

        let back: HashMap<TaskRef, i64> = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }
}
