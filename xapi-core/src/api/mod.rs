//! The per-class method bindings.
//!
//! One module per server-side class. Each holds the class's record type and
//! enums plus a flat set of free functions, one per remote method, and every
//! function does the same three things: encode the arguments in declaration
//! order, dispatch through the [`Session`](crate::Session) (which prepends
//! the session token), decode the result. No hidden behavior beyond that —
//! no retries, no caching, no local validation the server would do anyway.
//!
//! Functions named `async_*` dispatch the `Async.`-prefixed variant of the
//! same method: the server queues the work and the function returns the
//! [task](self::task) tracking it immediately.
//!
//! Record types are point-in-time snapshots. Fields the server did not send
//! decode to their zero value (empty string, `0`, `false`, empty
//! collection, null reference, the epoch), matching the server's convention
//! of omitting empty fields; unknown fields are ignored. Enums decode
//! strictly: a tag outside the known set is a deserialization error.

pub mod feature;
pub mod observer;
pub mod repository;
pub mod role;
pub mod sr;
pub mod subject;
pub mod task;
pub mod vm_appliance;
