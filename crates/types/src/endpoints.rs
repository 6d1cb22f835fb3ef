//! Endpoint pools.

use crate::NodeId;
use std::ops::Deref;
use std::sync::Arc;

/// Ordered, fixed-size collection of endpoint handles.
///
/// Built once by the scenario builder and shared read-only with every
/// consumer. Cloning is cheap and never copies the handles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointPool {
    nodes: Arc<[NodeId]>,
}

impl EndpointPool {
    /// Create a pool from an ordered list of nodes.
    pub fn new(nodes: impl Into<Arc<[NodeId]>>) -> Self {
        Self {
            nodes: nodes.into(),
        }
    }

    /// Pool of `count` consecutive node ids starting at `first`.
    pub fn contiguous(first: u32, count: u32) -> Self {
        Self::new((first..first + count).map(NodeId).collect::<Vec<_>>())
    }

    /// Build the sub-pool named by `indices`, in index order.
    ///
    /// Indices outside the pool are skipped.
    pub fn subset(&self, indices: &[u32]) -> Self {
        Self::new(
            indices
                .iter()
                .filter_map(|&i| self.nodes.get(i as usize).copied())
                .collect::<Vec<_>>(),
        )
    }

    /// Node at position `index`.
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Number of endpoints in the pool.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Deref for EndpointPool {
    type Target = [NodeId];

    fn deref(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl FromIterator<NodeId> for EndpointPool {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}
