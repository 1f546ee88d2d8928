//! This crate contains the structures and tools for reading map data out of
//! WAD archives, and for building the BSP tree stored with each map.
//!
//! The structure of a WAD is this:
//!
//! ```text,ignore
//!                        <───── 32 bits ──────>
//!                        ┌────────────────────┐
//!             ┌──── 0x00 |  ASCII WAD Type    | 0x03
//!             |          | ────────────────── |
//!     Header ─┤     0x04 | # of directories   | 0x07
//!             |          | ────────────────── |
//!             └──── 0x08 | offset to listing ───0x0B ──┐
//!             ┌───────── | ────────────────── |        |
//!             |     0x0C | ┌────────────────┐ |        |
//!             |          | |   Lump Bytes   |<─────┐   |
//!     Lumps ──┤          | |       .        | |    |   |
//!             |          | └────────────────┘ |    |   |
//!             |          |         .          |    |   |
//!             └───────── |         .          |    |   |
//!             ┌───────── | ┌────────────────┐<─────────┘
//!             |          | |   Lump Offset  |──────┘
//!             |          | |----------------| |
//!  Directory ─┤          | |   Lump Size    | |
//!     List    |          | |----------------| |
//!             |          | |   Lump Name    | |
//!             |          | └────────────────┘ |
//!             |          |         .          |
//!             └───────── └────────────────────┘
//! ```
//!
//! A map is a zero sized marker lump (`E1M1`, `MAP01`...) followed by ten
//! lumps: THINGS, LINEDEFS, SIDEDEFS, VERTEXES, SEGS, SSECTORS, NODES,
//! SECTORS, REJECT and BLOCKMAP.

pub mod builder;
mod error;
pub mod map;
pub mod nodes;
pub mod reader;
pub mod types;
pub mod wad;

pub use crate::error::{WadError, WadResult};
pub use crate::map::{MapLump, WadMap};
pub use crate::nodes::{BspNode, IS_SSECTOR_MASK, MAX_TREE_DEPTH, Partition, build_tree};
pub use crate::types::*;
/// Bring only the WAD structs down to root level
pub use crate::wad::{WadData, WadDirectory, WadHeader};
