// since the crate is quite small, the tree struct lives in the root namespace
mod tree;
// re-export symbols to the top-most level of the module's name space
pub use tree::*;

// the k-d tree keeps its own module to stay easy to follow
pub mod kd_tree;
