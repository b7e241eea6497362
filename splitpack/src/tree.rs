//! The binary-tree packer at the heart of splitpack.
//!
//! Every node of the tree governs a rectangular region of the atlas. Leaves
//! are either free or occupied by exactly one placed rectangle; internal nodes
//! split their region into two children along a single axis.

use crate::{error::PackError, geometry::Region};

#[derive(Debug)]
struct PackNode {
    region: Region,
    children: Option<Box<Children>>,
    occupied: bool,
}

#[derive(Debug)]
struct Children {
    left: PackNode,
    right: PackNode,
}

impl PackNode {
    fn new(region: Region) -> Self {
        Self {
            region,
            children: None,
            occupied: false,
        }
    }

    fn insert(&mut self, size: (u32, u32)) -> Option<Region> {
        if let Some(children) = &mut self.children {
            return children
                .left
                .insert(size)
                .or_else(|| children.right.insert(size));
        }

        if self.occupied {
            return None;
        }

        let (width, height) = size;
        let region = self.region;

        if width > region.width || height > region.height {
            return None;
        }

        if width == region.width && height == region.height {
            self.occupied = true;
            return Some(region);
        }

        // Split along the axis with more space left over. Ties split
        // horizontally, which keeps layouts stable between runs.
        let delta_width = region.width - width;
        let delta_height = region.height - height;

        let (left, right) = if delta_width > delta_height {
            (
                Region::new(region.x, region.y, width, region.height),
                Region::new(region.x + width, region.y, delta_width, region.height),
            )
        } else {
            (
                Region::new(region.x, region.y, region.width, height),
                Region::new(region.x, region.y + height, region.width, delta_height),
            )
        };

        log::trace!("Splitting {} into {} and {}", region, left, right);

        let mut children = Box::new(Children {
            left: PackNode::new(left),
            right: PackNode::new(right),
        });

        // The left child is sized to the request on the split axis, so this
        // always succeeds, at most one split further down.
        let placed = children.left.insert(size);
        self.children = Some(children);

        placed
    }

    fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a PackNode)) {
        visitor(self);

        if let Some(children) = &self.children {
            children.left.visit(visitor);
            children.right.visit(visitor);
        }
    }
}

/// Packs rectangles into a fixed-size atlas, one at a time.
///
/// Placements are final: there is no way to remove a rectangle once it has
/// been added. The layout depends only on the atlas size and on the order of
/// calls to [`add`](RectanglePacker::add), so replaying the same sequence
/// always reproduces the same atlas.
///
/// ```
/// use splitpack::{Region, RectanglePacker};
///
/// let mut packer = RectanglePacker::new((100, 100)).unwrap();
///
/// assert_eq!(packer.add((50, 50)).unwrap(), Some(Region::new(0, 0, 50, 50)));
/// assert_eq!(packer.add((100, 50)).unwrap(), Some(Region::new(0, 50, 100, 50)));
///
/// // Valid size, but there's no room left for it.
/// assert_eq!(packer.add((60, 60)).unwrap(), None);
///
/// // Could never fit.
/// assert!(packer.add((101, 1)).is_err());
/// ```
#[derive(Debug)]
pub struct RectanglePacker {
    root: PackNode,
}

impl RectanglePacker {
    pub fn new(size: (u32, u32)) -> Result<Self, PackError> {
        if size.0 == 0 || size.1 == 0 {
            return Err(PackError::InvalidAtlasSize { size });
        }

        Ok(Self {
            root: PackNode::new(Region::new(0, 0, size.0, size.1)),
        })
    }

    /// The size of the atlas this packer was created with.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.root.region.size()
    }

    /// Finds room for a rectangle of the given size.
    ///
    /// Returns `Ok(None)` when the atlas has no free space large enough right
    /// now, and [`PackError::Oversize`] when the rectangle is larger than the
    /// whole atlas. In both cases the packer is left untouched.
    ///
    /// Rectangles with zero width or height always succeed with an empty
    /// region at the origin and don't take up any space.
    pub fn add(&mut self, size: (u32, u32)) -> Result<Option<Region>, PackError> {
        if size.0 == 0 || size.1 == 0 {
            return Ok(Some(Region::new(0, 0, size.0, size.1)));
        }

        let atlas_size = self.size();
        if size.0 > atlas_size.0 || size.1 > atlas_size.1 {
            return Err(PackError::Oversize { size, atlas_size });
        }

        let placement = self.root.insert(size);

        match placement {
            Some(region) => log::trace!("Placed {}x{} at {}", size.0, size.1, region),
            None => log::trace!("No room for {}x{}", size.0, size.1),
        }

        Ok(placement)
    }

    /// Every region that has been handed out so far, in tree order.
    pub fn placements(&self) -> Vec<Region> {
        let mut placements = Vec::new();

        self.root.visit(&mut |node| {
            if node.occupied {
                placements.push(node.region);
            }
        });

        placements
    }

    /// The total area covered by placed rectangles.
    pub fn used_area(&self) -> u64 {
        let mut area = 0;

        self.root.visit(&mut |node| {
            if node.occupied {
                area += node.region.area();
            }
        });

        area
    }

    /// The number of nodes in the tree, including the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(&mut |_| count += 1);
        count
    }
}
