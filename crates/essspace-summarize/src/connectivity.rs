//! Online/offline detection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;

/// Reports whether the network is reachable.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// A shared probe that can be used across threads.
pub type SharedConnectivity = Arc<dyn ConnectivityProbe>;

/// Considers the device online when a TCP connection to `address` succeeds
/// within `timeout`.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    /// `address` is a `host:port` pair.
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_online(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(self.address.as_str())).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!(address = %self.address, error = %e, "Connectivity probe failed");
                false
            }
            Err(_) => {
                debug!(address = %self.address, "Connectivity probe timed out");
                false
            }
        }
    }
}

/// Fixed answer, switchable at runtime. Used for `--offline` and tests.
#[derive(Debug, Default)]
pub struct StaticConnectivity {
    online: AtomicBool,
}

impl StaticConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn online() -> Self {
        Self::new(true)
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectivityProbe for StaticConnectivity {
    async fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_probe_reaches_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let probe = TcpProbe::new(address, Duration::from_secs(2));
        assert!(probe.is_online().await);
    }

    #[tokio::test]
    async fn test_tcp_probe_fails_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let probe = TcpProbe::new(address, Duration::from_secs(2));
        assert!(!probe.is_online().await);
    }

    #[tokio::test]
    async fn test_static_connectivity_toggles() {
        let probe = StaticConnectivity::offline();
        assert!(!probe.is_online().await);
        probe.set_online(true);
        assert!(probe.is_online().await);
    }
}
