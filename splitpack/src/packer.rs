use crate::{
    error::PackError,
    geometry::Region,
    tree::RectanglePacker,
    types::{Bucket, InputItem, ItemOrder, OutputItem, PackOutput},
};

/// Lays out any number of items onto one or more atlas pages.
///
/// Each page is packed with a [`RectanglePacker`]. Pages start out at the
/// minimum size and double on both axes, up to the maximum size, until the
/// remaining items fit. Once a page at the maximum size is full, whatever is
/// left over goes onto a new page.
#[derive(Debug, Clone)]
pub struct PagePacker {
    min_size: (u32, u32),
    max_size: (u32, u32),
    padding: u32,
    order: ItemOrder,
}

/// An item waiting to be placed. `slot` indexes the list of keys, which stay
/// put while pages are tried and retried.
#[derive(Debug, Clone, Copy)]
struct Pending {
    slot: usize,
    size: (u32, u32),
}

impl Pending {
    fn area(&self) -> u64 {
        u64::from(self.size.0) * u64::from(self.size.1)
    }
}

impl PagePacker {
    pub fn new() -> Self {
        Self {
            min_size: (128, 128),
            max_size: (1024, 1024),
            padding: 0,
            order: ItemOrder::default(),
        }
    }

    pub fn min_size(self, min_size: (u32, u32)) -> Self {
        Self { min_size, ..self }
    }

    pub fn max_size(self, max_size: (u32, u32)) -> Self {
        Self { max_size, ..self }
    }

    /// Empty space to leave on every side of every item. Two neighboring
    /// items end up `2 * padding` pixels apart.
    pub fn padding(self, padding: u32) -> Self {
        Self { padding, ..self }
    }

    pub fn order(self, order: ItemOrder) -> Self {
        Self { order, ..self }
    }

    pub fn pack<K, I>(&self, items: I) -> Result<PackOutput<K>, PackError>
    where
        I: IntoIterator<Item = InputItem<K>>,
    {
        for &size in &[self.min_size, self.max_size] {
            if size.0 == 0 || size.1 == 0 {
                return Err(PackError::InvalidAtlasSize { size });
            }
        }

        let mut keys = Vec::new();
        let mut remaining = Vec::new();
        let mut empty_items = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            if item.size.0 == 0 || item.size.1 == 0 {
                empty_items.push(item.key);
                continue;
            }

            let size = self.padded(item.size);
            if size.0 > self.max_size.0 || size.1 > self.max_size.1 {
                return Err(PackError::ItemTooLarge {
                    index,
                    size,
                    max_size: self.max_size,
                });
            }

            remaining.push(Pending {
                slot: keys.len(),
                size,
            });
            keys.push(Some(item.key));
        }

        self.sort(&mut remaining);

        let num_items = remaining.len();
        log::trace!("Packing {} items", num_items);

        let start_size = (
            self.min_size.0.min(self.max_size.0),
            self.min_size.1.min(self.max_size.1),
        );

        let mut buckets = Vec::new();

        while !remaining.is_empty() {
            let mut current_size = start_size;

            let (size, placed, next_remaining) = loop {
                let (placed, next_remaining) = Self::pack_one_bucket(&remaining, current_size)?;

                if next_remaining.is_empty() {
                    break (current_size, placed, next_remaining);
                }

                if current_size.0 < self.max_size.0 || current_size.1 < self.max_size.1 {
                    current_size = (
                        current_size.0.saturating_mul(2).min(self.max_size.0),
                        current_size.1.saturating_mul(2).min(self.max_size.1),
                    );
                } else {
                    // Already at the largest page we're allowed, so the rest
                    // spills onto another page.
                    break (current_size, placed, next_remaining);
                }
            };

            let padding = self.padding;
            let items = placed
                .into_iter()
                .filter_map(|(slot, region)| {
                    keys[slot].take().map(|key| OutputItem {
                        key,
                        region: region.inset(padding),
                    })
                })
                .collect();

            buckets.push(Bucket { size, items });
            remaining = next_remaining;
        }

        log::trace!(
            "Finished packing {} items into {} buckets",
            num_items,
            buckets.len()
        );

        Ok(PackOutput {
            buckets,
            empty_items,
        })
    }

    fn padded(&self, size: (u32, u32)) -> (u32, u32) {
        let extra = self.padding.saturating_mul(2);
        (size.0.saturating_add(extra), size.1.saturating_add(extra))
    }

    fn sort(&self, items: &mut [Pending]) {
        match self.order {
            ItemOrder::Insertion => {}
            ItemOrder::HeightDescending => {
                items.sort_by(|a, b| (b.size.1, b.size.0).cmp(&(a.size.1, a.size.0)))
            }
            ItemOrder::AreaDescending => items.sort_by(|a, b| b.area().cmp(&a.area())),
        }
    }

    fn pack_one_bucket(
        remaining: &[Pending],
        size: (u32, u32),
    ) -> Result<(Vec<(usize, Region)>, Vec<Pending>), PackError> {
        log::trace!(
            "Trying to pack {} remaining items into bucket of size {:?}",
            remaining.len(),
            size
        );

        let mut packer = RectanglePacker::new(size)?;
        let mut placed = Vec::new();
        let mut unpacked = Vec::new();

        for item in remaining {
            // Smaller pages are tried before the largest one, so an item
            // that is legal overall may still be too big for this page.
            if item.size.0 > size.0 || item.size.1 > size.1 {
                unpacked.push(*item);
                continue;
            }

            match packer.add(item.size)? {
                Some(region) => placed.push((item.slot, region)),
                None => unpacked.push(*item),
            }
        }

        Ok((placed, unpacked))
    }
}

impl Default for PagePacker {
    fn default() -> Self {
        Self::new()
    }
}
