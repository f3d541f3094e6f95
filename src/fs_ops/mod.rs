//! Filesystem operations: container allocation and the relocator.

mod allocate;
mod atomic;
mod copy;
mod dir_move;
mod entry;
mod file_move;
mod helpers;
mod io_copy;
mod meta;
mod space;
mod util;

pub use allocate::allocate_container;
pub use copy::safe_copy_and_rename;
pub use dir_move::{copy_tree_then_remove, move_dir};
pub use entry::{detect_kind, move_entry};
pub use file_move::{copy_then_remove, move_file};
pub use helpers::{io_error_with_help, io_error_with_help_io};
