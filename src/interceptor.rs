use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::debug;

use crate::{
    chaos::decide,
    error::{InjectedError, InterceptError},
    model::{InterceptedRequest, SyntheticResponse, Transport},
    ChaosConfig, Decision, RandomSource, SharedRandom, TargetFilter,
};

/// Middleware between a client and its transport that applies chaos
/// decisions to every outbound request.
#[derive(Debug)]
pub struct Interceptor<T> {
    transport: T,
    config: Arc<ChaosConfig>,
    filter: TargetFilter,
    rng: SharedRandom,
}

impl<T: Transport> Interceptor<T> {
    /// Creates an interceptor with its own random source, seeded from the
    /// configuration.
    pub fn new(transport: T, config: ChaosConfig) -> Self {
        let rng = SharedRandom::new(RandomSource::new(config.seed));
        Self::with_random(transport, Arc::new(config), rng)
    }

    /// Creates an interceptor drawing from an existing random source, so
    /// several transports of one run share a single sequence.
    pub fn with_random(transport: T, config: Arc<ChaosConfig>, rng: SharedRandom) -> Self {
        Interceptor {
            transport,
            filter: config.filter(),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &ChaosConfig {
        &self.config
    }

    pub fn random(&self) -> &SharedRandom {
        &self.rng
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the decision for a request without applying it, or `None`
    /// when the target is out of scope.
    pub fn decide_for(&self, target: &str, method: &str) -> Option<Decision> {
        if !self.filter.in_scope(target) {
            return None;
        }
        Some(self.rng.with(|rng| decide(target, method, &self.config, rng)))
    }

    pub async fn send(&self, request: T::Request) -> Result<T::Response, InterceptError<T::Error>> {
        self.send_with_cancel(request, std::future::pending()).await
    }

    /// Like [`Interceptor::send`], but a hanging request gives up as soon as
    /// `cancel` resolves.
    pub async fn send_with_cancel(
        &self,
        request: T::Request,
        cancel: impl Future<Output = ()>,
    ) -> Result<T::Response, InterceptError<T::Error>> {
        let target = request.target().into_owned();
        let method = request.method().to_owned();

        let Some(decision) = self.decide_for(&target, &method) else {
            debug!(method = %method, target = %target, "passthrough (excluded)");
            return self.forward(request).await;
        };
        debug!(method = %method, target = %target, action = %decision, "Intercepted request");

        match decision {
            Decision::Passthrough => self.forward(request).await,
            Decision::Delay { ms } => {
                sleep(Duration::from_millis(ms)).await;
                self.forward(request).await
            }
            Decision::Fail(failure) => {
                sleep(Duration::from_millis(failure.delay_ms)).await;
                if failure.is_network_error() {
                    return Err(InterceptError::Injected(InjectedError::Network {
                        message: failure.message,
                    }));
                }
                Ok(T::Response::synthetic(failure.status, &failure.message))
            }
            Decision::Timeout { hold_ms } => {
                tokio::select! {
                    _ = sleep(Duration::from_millis(hold_ms)) => {
                        Err(InterceptError::Injected(InjectedError::TimedOut { after_ms: hold_ms }))
                    }
                    _ = cancel => {
                        debug!(method = %method, target = %target, "Hanging request cancelled");
                        Err(InterceptError::Injected(InjectedError::Cancelled))
                    }
                }
            }
        }
    }

    async fn forward(&self, request: T::Request) -> Result<T::Response, InterceptError<T::Error>> {
        self.transport
            .send(request)
            .await
            .map_err(InterceptError::Transport)
    }
}
