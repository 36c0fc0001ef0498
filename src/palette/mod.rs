//! Signed palette documents.

pub mod document;
pub mod signature;
pub mod writer;

pub use document::{assemble, ModelData, Palette, PaletteHeader};
pub use signature::{data_hash, BlockDag};
pub use writer::{to_json, write_palette};
