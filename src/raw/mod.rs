mod arena;
mod handle;
mod node;
mod raw_red_black_tree;

pub(crate) use raw_red_black_tree::{RawRedBlackTree, WalkStack};
