pub mod build;
pub mod mutate;
pub mod render;
pub mod resolve;
pub mod tracker;

pub use build::{BuildOptions, IGNORED_DIRECTORIES, SegmentFilter, build_tree};
pub use mutate::{create_file, set_content};
pub use render::{listing_order, render_lines};
pub use resolve::{display_path, normalize, parent_dir, resolve, resolve_creation_path};
pub use tracker::{FileOperationTracker, Outcome, Phase};
