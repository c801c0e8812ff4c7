#![deny(
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![warn(unreachable_pub)]
#![doc = include_str!("../README.md")]

pub mod api;

mod call;
pub use call::{Call, Reply};

pub mod connection;
pub use connection::Connection;

mod datetime;
pub use datetime::DateTime;

mod error;
pub use error::{Error, ErrorKind, Result};

pub mod fault;
pub use fault::Fault;

pub mod object;
pub use object::{
    BlobRef, Class, DrTaskRef, FeatureRef, HostRef, ObserverRef, PbdRef, Ref, RepositoryRef,
    RoleRef, SessionRef, SrRef, SubjectRef, TaskRef, VdiRef, VmApplianceRef, VmRef,
};

mod session;
pub use session::Session;

mod transport;
pub use transport::Transport;

pub mod wire;

#[cfg(test)]
mod test_utils;
