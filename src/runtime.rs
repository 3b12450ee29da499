//! Runtime abstraction layer for async operations
//!
//! Service calls are spawned through a global [`AsyncSpawner`], so the screen
//! does not depend on a particular executor.

use futures::Future;
use std::pin::Pin;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(
        &self,
        future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
    ) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(
                &self,
                future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
            ) -> Box<dyn AsyncHandle> {
                let handle = ::tokio::spawn(future);
                Box::new(TokioHandle(handle))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }
        }
    }

    /// Runs each future to completion on a fresh OS thread
    pub mod thread_impl {
        use super::*;
        use std::thread::JoinHandle;

        pub struct ThreadSpawner;

        impl AsyncSpawner for ThreadSpawner {
            fn spawn_boxed(
                &self,
                future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
            ) -> Box<dyn AsyncHandle> {
                let handle = std::thread::spawn(move || futures::executor::block_on(future));
                Box::new(ThreadHandle(handle))
            }
        }

        struct ThreadHandle(JoinHandle<()>);

        impl AsyncHandle for ThreadHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }
        }
    }
}

/// Async helpers shared by services
pub mod async_utils {
    /// Async delay that works across runtimes
    pub async fn async_delay(duration: std::time::Duration) {
        #[cfg(feature = "tokio-runtime")]
        {
            if ::tokio::runtime::Handle::try_current().is_ok() {
                ::tokio::time::sleep(duration).await;
                return;
            }
        }

        // No timer available outside tokio; the spawned thread simply sleeps
        std::thread::sleep(duration);
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Initialize the runtime with a specific spawner. Has no effect once a
/// spawner is installed.
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) {
    if RUNTIME.set(spawner).is_err() {
        log::debug!("Runtime already initialized, keeping the existing spawner");
    }
}

/// Get the global runtime spawner
pub fn runtime() -> &'static dyn AsyncSpawner {
    RUNTIME
        .get_or_init(|| {
            #[cfg(feature = "tokio-runtime")]
            {
                Box::new(spawners::tokio_impl::TokioSpawner)
            }

            #[cfg(not(feature = "tokio-runtime"))]
            {
                Box::new(spawners::thread_impl::ThreadSpawner)
            }
        })
        .as_ref()
}
