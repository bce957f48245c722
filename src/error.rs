use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to allocate a tree node")]
    AllocationFailure(#[from] TryReserveError),
    #[error("node pool cannot address more than {0} nodes")]
    CapacityOverflow(usize),

    #[error("cursor points at the end position")]
    EndCursor,
    #[error("cursor refers to a node that is no longer in the tree")]
    StaleCursor,

    #[error("tree is corrupted: {0}")]
    Corrupted(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;
