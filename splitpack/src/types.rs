use crate::geometry::Region;

/// How a [`PagePacker`](crate::PagePacker) orders items before packing them.
///
/// The tree packer places rectangles strictly in the order it receives them,
/// and denser layouts usually come from placing large items first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrder {
    /// Keep the order items were given in.
    Insertion,

    /// Tallest items first, then widest.
    HeightDescending,

    /// Largest area first.
    AreaDescending,
}

impl Default for ItemOrder {
    fn default() -> Self {
        ItemOrder::HeightDescending
    }
}

/// An input to the page packer.
///
/// `InputItem` is just a 2D size and a key. Keys are opaque to splitpack and
/// are handed back untouched with the item's placement, so consumers can use
/// whatever identifies their own objects: a glyph's character, a sprite's
/// name, an index into a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputItem<K> {
    pub(crate) key: K,
    pub(crate) size: (u32, u32),
}

impl<K> InputItem<K> {
    #[inline]
    pub fn new(key: K, size: (u32, u32)) -> Self {
        Self { key, size }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// An item that was placed by the page packer.
///
/// Its region is the space the item's pixels should be copied to. Any padding
/// requested from the packer surrounds this region and is not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputItem<K> {
    pub(crate) key: K,
    pub(crate) region: Region,
}

impl<K> OutputItem<K> {
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }
}

/// The results from running the page packer.
#[derive(Debug, Clone)]
pub struct PackOutput<K> {
    pub(crate) buckets: Vec<Bucket<K>>,
    pub(crate) empty_items: Vec<K>,
}

impl<K> PackOutput<K> {
    /// The pages items were packed into, in the order they were filled.
    #[inline]
    pub fn buckets(&self) -> &[Bucket<K>] {
        &self.buckets
    }

    /// Keys of inputs with zero width or height. These have no pixels and
    /// were not placed on any page.
    #[inline]
    pub fn empty_items(&self) -> &[K] {
        &self.empty_items
    }

    pub fn into_parts(self) -> (Vec<Bucket<K>>, Vec<K>) {
        (self.buckets, self.empty_items)
    }
}

/// A single atlas page and the items placed on it.
#[derive(Debug, Clone)]
pub struct Bucket<K> {
    pub(crate) size: (u32, u32),
    pub(crate) items: Vec<OutputItem<K>>,
}

impl<K> Bucket<K> {
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn items(&self) -> &[OutputItem<K>] {
        &self.items
    }

    /// The fraction of the page covered by item pixels, from 0 to 1. Padding
    /// counts as unused space.
    pub fn occupancy(&self) -> f64 {
        let page_area = u64::from(self.size.0) * u64::from(self.size.1);
        let used: u64 = self.items.iter().map(|item| item.region.area()).sum();

        used as f64 / page_area as f64
    }
}
