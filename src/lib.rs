//! Config-tree processing: key-chain flattening, `$include` splicing, and
//! `$`-reference substitution over nested config files.
//!
//! A nested structure read from YAML, JSON, TOML, or INI/CFG is normalized
//! into a flat map keyed by key-chains (ordered tuples of segments), run
//! through the include and substitution resolvers, and reconstructed as a
//! nested [`Tree`] or a navigable [`ConfigNode`]. Each stage is a pure
//! transform usable on its own; [`Config`] chains them.

mod builder;
mod codec;
mod error;
mod include;
mod key;
mod node;
mod reader;
mod substitute;
mod value;

pub use builder::Config;
pub use codec::{flatten, unflatten, FlatMap, Node};
pub use error::ConfigError;
pub use include::{resolve_includes, INCLUDE_MARKER};
pub use key::KeyChain;
pub use node::{ConfigNode, NodeChild};
pub use reader::{read_config, read_config_str};
pub use substitute::{resolve_substitutions, SUBSTITUTION_MARKER, SUBSTITUTION_SPLITTER};
pub use value::{Tree, TreeValue, Value};
