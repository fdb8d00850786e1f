//! In-memory map graph.
//!
//! The same graph is used from ingestion through serialization: the parser
//! produces it with unset fields and undecoded tile payloads, the assembler
//! fills it in place, and the serializer reads it.

mod layer;
mod map;
mod object;
mod property;
mod tileset;

pub use layer::*;
pub use map::*;
pub use object::*;
pub use property::*;
pub use tileset::*;
