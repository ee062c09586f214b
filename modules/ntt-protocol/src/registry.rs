use std::{collections::HashMap, sync::Arc};

use ntt_messages::chain_id::ChainId;

use crate::{
    error::{NttError, Result},
    ntt::Ntt,
};

/// Chain adapters by chain id, so callers can route an operation to the
/// chain it concerns without knowing the concrete adapter type.
#[derive(Default, Clone)]
pub struct NttRegistry {
    adapters: HashMap<ChainId, Arc<dyn Ntt>>,
}

impl NttRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, adapter: Arc<dyn Ntt>) -> Self {
        self.insert(adapter);
        self
    }

    /// Registers `adapter` under the chain it reports, replacing any previous
    /// adapter for that chain.
    pub fn insert(&mut self, adapter: Arc<dyn Ntt>) -> Option<Arc<dyn Ntt>> {
        self.adapters.insert(adapter.chain(), adapter)
    }

    pub fn get(&self, chain: ChainId) -> Result<Arc<dyn Ntt>> {
        self.adapters.get(&chain).cloned().ok_or_else(|| {
            NttError::ConfigurationMissing(format!("no adapter registered for chain {chain}"))
        })
    }

    pub fn chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.adapters.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for NttRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut chains: Vec<_> = self.chains().collect();
        chains.sort();
        f.debug_struct("NttRegistry").field("chains", &chains).finish()
    }
}
