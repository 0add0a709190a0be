//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the detector capability built once at startup and, when
//! configured, a semaphore capping concurrent detector calls. Without that
//! cap connections share nothing else.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::ServerConfig;
use crate::detector::{DetectParams, HandDetector};

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<dyn HandDetector>,
    pub params: DetectParams,
    /// Permits for in-flight detector calls across all connections. `None`
    /// when `DETECT_MAX_CONCURRENCY` is unset.
    pub detect_permits: Option<Arc<Semaphore>>,
    pub ws_max_message_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(detector: Arc<dyn HandDetector>, config: &ServerConfig) -> Self {
        Self {
            detector,
            params: config.detector.params,
            detect_permits: config.detect_max_concurrency.map(|n| Arc::new(Semaphore::new(n))),
            ws_max_message_bytes: config.ws_max_message_bytes,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::decode::BgrImage;
    use crate::detector::{DetectionError, Hand, Landmark};
    use std::sync::Mutex;

    /// Detector that returns a fixed result and records the parameters it
    /// was called with.
    pub struct MockDetector {
        result: Mutex<Option<Result<Vec<Hand>, DetectionError>>>,
        hands: Vec<Hand>,
        pub calls: Mutex<Vec<(u32, u32, DetectParams)>>,
    }

    impl MockDetector {
        /// Always report `hands`.
        #[must_use]
        pub fn with_hands(hands: Vec<Hand>) -> Self {
            Self { result: Mutex::new(None), hands, calls: Mutex::new(Vec::new()) }
        }

        /// Fail the first call with `err`, then report `hands`.
        #[must_use]
        pub fn failing_once(err: DetectionError, hands: Vec<Hand>) -> Self {
            Self { result: Mutex::new(Some(Err(err))), hands, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl HandDetector for MockDetector {
        async fn detect(&self, image: &BgrImage, params: DetectParams) -> Result<Vec<Hand>, DetectionError> {
            self.calls
                .lock()
                .expect("mock mutex should lock")
                .push((image.width, image.height, params));
            if let Some(result) = self.result.lock().expect("mock mutex should lock").take() {
                return result;
            }
            Ok(self.hands.clone())
        }
    }

    /// A hand with `count` landmarks at distinct fractional coordinates.
    #[must_use]
    pub fn hand(count: usize, offset: f64) -> Hand {
        let landmarks = (0..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let i = i as f64;
                Landmark::new(offset + i * 10.0 + 0.4, offset + i * 5.0 + 0.6, -i)
            })
            .collect();
        Hand { landmarks }
    }

    /// Config with defaults everywhere.
    #[must_use]
    pub fn test_config() -> ServerConfig {
        ServerConfig::from_lookup(|_| None).expect("default config should parse")
    }

    #[must_use]
    pub fn test_app_state(detector: Arc<dyn HandDetector>) -> AppState {
        AppState::new(detector, &test_config())
    }

    /// State with a shared cap of `permits` concurrent detector calls.
    #[must_use]
    pub fn test_app_state_with_limit(detector: Arc<dyn HandDetector>, permits: usize) -> AppState {
        let mut config = test_config();
        config.detect_max_concurrency = Some(permits);
        AppState::new(detector, &config)
    }

    /// State whose websocket text messages are limited to `max_bytes`.
    #[must_use]
    pub fn test_app_state_with_max_message(detector: Arc<dyn HandDetector>, max_bytes: usize) -> AppState {
        let mut config = test_config();
        config.ws_max_message_bytes = max_bytes;
        AppState::new(detector, &config)
    }
}
