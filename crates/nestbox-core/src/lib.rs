//! Core measure/layout engine for nestbox

pub mod collections;
mod config;
mod driver;
mod error;
mod flags;
mod group;
mod invalidate;
mod measure;
mod node;
mod stats;
mod strategy;
mod tree;

pub use config::*;
pub use driver::PendingMutation;
pub use error::*;
pub use flags::*;
pub use group::child_constraint;
pub use node::*;
pub use stats::*;
pub use strategy::*;
pub use tree::*;

pub use nestbox_layout;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::error::LayoutError;
    pub use crate::node::{LayoutPhase, Visibility};
    pub use crate::strategy::{DefaultSizing, LayoutStrategy};
    pub use crate::tree::{LayoutTree, NodeId};
    pub use nestbox_layout::prelude::*;
}

#[cfg(test)]
pub(crate) mod test_support;
