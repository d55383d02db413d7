use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::backends::Sink;

/// 📦 A sink that never forgets. Unlike my dad, who forgot my soccer game in 1998.
///
/// Each `send` pushes one fully rendered payload (a JSON array of documents,
/// courtesy of the composer) onto a shared Vec. One entry per flush, so a test
/// can count flushes and their sizes without mocking anything.
///
/// Clone-able because tests need to peek inside after handing `self` off to the
/// pipeline. The `Arc` means everyone shares the same Vec.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemorySink {
    /// 🔒 The evidence locker. Each entry = one flushed payload.
    pub(crate) received: Arc<Mutex<Vec<String>>>,
}

impl InMemorySink {
    /// 🚀 An empty Vec, full of potential, unmarred by batches.
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Sink for InMemorySink {
    /// 📡 Lock, push, done.
    async fn send(&mut self, payload: String) -> Result<()> {
        self.received.lock().await.push(payload);
        Ok(())
    }

    /// 🗑️ Nothing to flush. We live in RAM.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
