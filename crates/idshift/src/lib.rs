#![doc = include_str!("../README.md")]

mod backup;
mod collection;
mod error;
mod id;
mod migrate;
mod report;

pub use crate::backup::*;
pub use crate::collection::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::migrate::*;
pub use crate::report::*;
