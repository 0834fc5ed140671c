//! # multiaddr-core
//!
//! Self-describing, composable network addresses.
//!
//! A multiaddr is an ordered stack of `(protocol, value)` segments such as
//! `/ip4/127.0.0.1/tcp/4001/p2p/QmNnoo...`. It has two equivalent
//! representations, a `/`-delimited text form and a compact binary form built
//! from varint-prefixed segments. The binary form is canonical and defines
//! equality.
//!
//! ## Modules
//! - [`protocol`]: protocol descriptors, the registry and the built-in table
//! - [`core`]: varint, binary and text codecs, per-protocol value codecs, serde
//! - [`multiaddr`]: the [`Multiaddr`] value and its structural operations
//! - [`resolve`]: resolver hook for name-bearing protocols (`dns*`)
//! - [`config`]: TOML/env configuration for the protocol table and logging
//! - [`utils`]: logging setup and metrics
//!
//! ## Example
//! ```rust
//! use multiaddr_core::Multiaddr;
//!
//! let addr: Multiaddr = "/ip4/1.2.3.4/tcp/4001".parse().unwrap();
//! assert!(addr.is_thin_waist());
//!
//! let node = addr.node_address().unwrap();
//! assert_eq!((node.family, node.address.as_str(), node.port), (4, "1.2.3.4", 4001));
//!
//! let bytes = addr.to_bytes();
//! assert_eq!(Multiaddr::from_bytes(bytes).unwrap(), addr);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod multiaddr;
pub mod protocol;
pub mod resolve;
pub mod utils;

pub use config::{LoggingConfig, MultiaddrConfig, RegistryConfig};
pub use error::{MultiaddrError, Result};
pub use multiaddr::{Family, Multiaddr, NetOptions, NodeAddress, Segments, TupleValue};
pub use protocol::{AddressSize, Protocol, ProtocolEntry, Registry, ValueFormat};
pub use resolve::{ResolveQuery, Resolver, Resolvers, StaticResolver};
