//! Process-wide metrics registry.

use once_cell::sync::Lazy;
use prometheus::{Encoder, Registry, TextEncoder};

use teller_core::metrics::register_core_metrics;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_core_metrics(&registry);
    registry
});

/// Render all registered metrics in the Prometheus text format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_core_metrics() {
        teller_core::metrics::TRANSACTIONS_ADMITTED.inc();
        let text = render();
        assert!(text.contains("teller_transactions_admitted_total"));
    }
}
