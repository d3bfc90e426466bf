//! Cache of hashing function instances, one per distinct configuration.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::{self, Debug};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ChfConfig;
use crate::error::Result;
use crate::hash::HashingFunction;

lazy_static::lazy_static! {
    static ref GLOBAL_REGISTRY: ChfRegistry = ChfRegistry::new();
}

/// Maps configurations to shared [`HashingFunction`] instances.
///
/// Lookups take a read lock. A miss takes the write lock and constructs the instance while
/// holding it, so each configuration is built at most once per registry. Instances are
/// immutable and never evicted.
///
/// # Example
///
/// ```
/// use passhash::ChfRegistry;
/// use passhash::kdf::scrypt::ScryptConfig;
///
/// let registry = ChfRegistry::new();
/// let function = registry.get_or_create(ScryptConfig::TEST).unwrap();
/// let hash = function.hash(b"password").unwrap();
///
/// let recovered = registry.instance_from_hash(hash.encoded()).unwrap();
/// assert!(recovered.check(b"password", hash.encoded()).unwrap());
/// assert_eq!(1, registry.len());
/// ```
pub struct ChfRegistry {
    instances: RwLock<HashMap<String, Arc<dyn HashingFunction>>>,
}

impl ChfRegistry {
    pub fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static ChfRegistry {
        &GLOBAL_REGISTRY
    }

    /// Returns the cached instance for `config`, constructing it on first use.
    ///
    /// # Errors
    ///
    /// [`ChfError::BadParameters`](crate::ChfError::BadParameters) if `config` doesn't validate.
    /// Nothing is cached in that case.
    pub fn get_or_create(&self, config: impl Into<ChfConfig>) -> Result<Arc<dyn HashingFunction>> {
        let config = config.into();
        let key = config.key();

        // The map only holds immutable instances, a panic while holding the lock can't corrupt it.
        if let Some(instance) = self
            .instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(instance));
        }

        let mut instances = self
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match instances.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let instance = config.build()?;
                log::debug!("Created hashing function for {}", entry.key());
                Ok(Arc::clone(entry.insert(instance)))
            }
        }
    }

    /// Returns the instance that produced `hashed`, see [`ChfConfig::from_hash`].
    pub fn instance_from_hash(&self, hashed: &str) -> Result<Arc<dyn HashingFunction>> {
        self.get_or_create(ChfConfig::from_hash(hashed)?)
    }

    /// Number of cached instances.
    pub fn len(&self) -> usize {
        self.instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ChfRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ChfRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChfRegistry")
            .field("len", &self.len())
            .finish()
    }
}
