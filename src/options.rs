use std::path::PathBuf;

use structopt::StructOpt;

use crate::{commands::parse_size, data::SortOrder};

#[derive(Debug, StructOpt)]
#[structopt(about = "Packs images into texture atlas pages")]
pub struct Options {
    #[structopt(flatten)]
    pub global: GlobalOptions,

    #[structopt(subcommand)]
    pub command: Subcommand,
}

#[derive(Debug, StructOpt)]
pub struct GlobalOptions {
    /// Sets verbosity level. Can be specified multiple times.
    #[structopt(long = "verbose", short, global = true, parse(from_occurrences))]
    pub verbosity: u8,
}

#[derive(Debug, StructOpt)]
pub enum Subcommand {
    /// Pack the images described by an atlaser.toml into atlas pages, and
    /// write a manifest describing where every image ended up.
    Pack(PackOptions),

    /// Lay out a set of PNG files without writing anything, and report how
    /// many pages they need and how full those pages are.
    Fit(FitOptions),
}

#[derive(Debug, StructOpt)]
pub struct PackOptions {
    /// The atlaser.toml to pack, or the folder containing it. Defaults to the
    /// current working directory.
    #[structopt(long)]
    pub config: Option<PathBuf>,

    /// Pack even if no image or layout setting changed since the last pack.
    #[structopt(long)]
    pub force: bool,
}

#[derive(Debug, StructOpt)]
pub struct FitOptions {
    /// The size pages start out at, like 128x128.
    #[structopt(long, default_value = "128x128", parse(try_from_str = parse_size))]
    pub min_size: (u32, u32),

    /// The largest a page may grow to, like 1024x1024.
    #[structopt(long, default_value = "1024x1024", parse(try_from_str = parse_size))]
    pub max_size: (u32, u32),

    /// Transparent pixels to leave on every side of each image.
    #[structopt(long, default_value = "0")]
    pub padding: u32,

    /// The order to place images in: insertion, height-descending or
    /// area-descending.
    #[structopt(long, default_value = "height-descending")]
    pub order: SortOrder,

    /// Print the layout as JSON instead of a summary.
    #[structopt(long)]
    pub json: bool,

    /// PNG files, or folders to search for PNG files. Defaults to the current
    /// working directory.
    pub paths: Vec<PathBuf>,
}
