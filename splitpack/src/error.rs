use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// Atlases must have a non-zero size on both axes.
    #[error("atlas size must be positive on both axes, got {}x{}", .size.0, .size.1)]
    InvalidAtlasSize { size: (u32, u32) },

    /// The requested rectangle is bigger than the whole atlas on at least one
    /// axis, so no amount of free space would ever make room for it.
    #[error(
        "a {}x{} rectangle can never fit in a {}x{} atlas",
        .size.0,
        .size.1,
        .atlas_size.0,
        .atlas_size.1
    )]
    Oversize {
        size: (u32, u32),
        atlas_size: (u32, u32),
    },

    /// An item given to a page packer is bigger than the largest page allowed.
    /// `index` refers to the position of the item in the packer's input.
    #[error(
        "item {} ({}x{} with padding) is larger than the maximum page size of {}x{}",
        .index,
        .size.0,
        .size.1,
        .max_size.0,
        .max_size.1
    )]
    ItemTooLarge {
        index: usize,
        size: (u32, u32),
        max_size: (u32, u32),
    },
}
