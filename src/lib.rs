//! A red-black tree whose nodes live in one contiguous arena and are
//! addressed by index, with set and map adapters on top.

pub mod compare;
pub mod error;
pub mod iter;
pub mod map;
pub mod set;
pub mod tree;

mod links;
mod node;
mod pool;
mod rebalance;

pub use compare::{Compare, Descending, First, Identity, KeyOf, Natural};
pub use error::{Error, Result};
pub use iter::{Cursor, IntoIter, Iter};
pub use map::TreeMap;
pub use set::TreeSet;
pub use tree::RedBlackTree;
