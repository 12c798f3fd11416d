//! The execution context pipeline entry points run in.

use std::num::NonZeroUsize;
use tokio::runtime::Handle;

use crate::error::{IngestionError, Result};

/// Runtime handle plus the number of scenes processed at once.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    handle: Handle,
    parallelism: usize,
}

impl ExecutionContext {
    /// Wrap a runtime handle; a zero parallelism is treated as one.
    pub fn new(handle: Handle, parallelism: usize) -> Self {
        Self {
            handle,
            parallelism: parallelism.max(1),
        }
    }

    /// Context on the current tokio runtime, one scene per available core.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| IngestionError::NoRuntime)?;
        let parallelism = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Ok(Self::new(handle, parallelism))
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_runtime() {
        assert!(matches!(
            ExecutionContext::current(),
            Err(IngestionError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn test_current_runtime() {
        let ctx = ExecutionContext::current().unwrap().with_parallelism(0);
        assert_eq!(ctx.parallelism(), 1);
        assert_eq!(ctx.handle().spawn(async { 7 }).await.unwrap(), 7);
    }
}
