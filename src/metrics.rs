use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Counters for checkout outcomes, exported next to the HTTP metrics.
#[derive(Clone)]
pub struct CheckoutMetrics {
    registry: Registry,
    outcomes: IntCounterVec,
}

impl CheckoutMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let outcomes = IntCounterVec::new(
            Opts::new("minimart_checkout_total", "Checkout attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(outcomes.clone()))?;

        Ok(CheckoutMetrics {
            registry: registry,
            outcomes: outcomes,
        })
    }

    pub fn record(&self, outcome: &str) {
        self.outcomes.with_label_values(&[outcome]).inc();
    }

    pub fn count(&self, outcome: &str) -> u64 {
        self.outcomes.with_label_values(&[outcome]).get()
    }

    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!("failed to encode checkout metrics: {}", e);
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
