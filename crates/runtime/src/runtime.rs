//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker, wires up command/event channels, and
//! exposes a builder-based API for hosts to dispatch script triggers.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::{HostWorld, Result, RuntimeError, RuntimeHandle, TriggerRegistry};
use crate::events::EventBus;
use crate::workers::{Command, SessionWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Queue between script tasks and the session worker.
    pub notice_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            notice_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates script sessions
///
/// Runtime owns the worker; [`RuntimeHandle`] is the cloneable façade for
/// clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Remaining sessions end with `CancelReason::Shutdown`. Handles still held
    /// by clients fail with `CommandChannelClosed` afterwards.
    pub async fn shutdown(self) -> Result<()> {
        let cancelled = self.handle.shutdown().await?;
        info!(
            target: "script_runtime::runtime",
            cancelled,
            "Runtime shut down"
        );
        drop(self.handle);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<Arc<dyn HostWorld>>,
    registry: Option<TriggerRegistry>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
            registry: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required host world
    pub fn world(mut self, world: impl HostWorld + 'static) -> Self {
        self.world = Some(Arc::new(world));
        self
    }

    /// Set a host world the caller keeps a handle to
    pub fn shared_world(mut self, world: Arc<dyn HostWorld>) -> Self {
        self.world = Some(world);
        self
    }

    /// Set the trigger registry.
    ///
    /// If not provided, the registry for the built-in scripts and bindings is
    /// used.
    pub fn registry(mut self, registry: TriggerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let world = self.world.ok_or(RuntimeError::MissingWorld)?;
        let registry = match self.registry {
            Some(registry) => registry,
            None => TriggerRegistry::builtin()?,
        };
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        info!(
            target: "script_runtime::runtime",
            triggers = registry.len(),
            "Starting session worker"
        );
        let worker = SessionWorker::new(
            registry,
            world,
            command_rx,
            self.config.notice_buffer_size,
            event_bus,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
