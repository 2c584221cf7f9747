#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod forest;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod topology;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, Padding, SortKey};
pub use ir::Device;
pub use layout::{LayoutError, LayoutWarning, MapLayout, compute_map_layout};
