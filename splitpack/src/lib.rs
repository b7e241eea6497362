//! Splitpack packs rectangles into fixed-size atlases using a binary tree that
//! splits free space as items are added. It was built to lay out glyphs for
//! font textures and images for sprite atlases, which both come down to the
//! same problem.
//!
//! There are two layers:
//!
//! * [`RectanglePacker`] places rectangles one at a time into a single atlas
//!   and reports when it runs out of room.
//! * [`PagePacker`] takes a whole set of items, sorts them, grows the atlas
//!   when they don't fit, and spreads them over several pages when even the
//!   largest allowed atlas is too small.
//!
//! ## Example
//! ```
//! use splitpack::{InputItem, PagePacker};
//!
//! // Keys can be anything that identifies your items.
//! let glyphs = vec![
//!     InputItem::new('A', (14, 18)),
//!     InputItem::new('g', (11, 22)),
//!     InputItem::new(' ', (0, 18)),
//! ];
//!
//! let packer = PagePacker::new().max_size((256, 256)).padding(1);
//! let output = packer.pack(glyphs).unwrap();
//!
//! for bucket in output.buckets() {
//!     for item in bucket.items() {
//!         println!("{} goes at {}", item.key(), item.region());
//!     }
//! }
//!
//! assert_eq!(output.empty_items(), &[' ']);
//! ```

mod error;
mod geometry;
mod packer;
mod tree;
mod types;

pub use error::*;
pub use geometry::*;
pub use packer::*;
pub use tree::*;
pub use types::*;
