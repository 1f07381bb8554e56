use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub suggestion_requests_total: IntCounterVec,
    pub ranking_latency_seconds: HistogramVec,
    pub assignments_total: IntCounterVec,
    pub agents_online: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let suggestion_requests_total = IntCounterVec::new(
            Opts::new(
                "suggestion_requests_total",
                "Agent suggestion requests by outcome",
            ),
            &["outcome"],
        )
        .expect("valid suggestion_requests_total metric");

        let ranking_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "ranking_latency_seconds",
                "Time spent resolving and ranking agents for an order",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
            &["outcome"],
        )
        .expect("valid ranking_latency_seconds metric");

        let assignments_total = IntCounterVec::new(
            Opts::new("assignments_total", "Recorded dispatch decisions by outcome"),
            &["outcome"],
        )
        .expect("valid assignments_total metric");

        let agents_online = IntGauge::new("agents_online", "Delivery agents currently online")
            .expect("valid agents_online metric");

        registry
            .register(Box::new(suggestion_requests_total.clone()))
            .expect("register suggestion_requests_total");
        registry
            .register(Box::new(ranking_latency_seconds.clone()))
            .expect("register ranking_latency_seconds");
        registry
            .register(Box::new(assignments_total.clone()))
            .expect("register assignments_total");
        registry
            .register(Box::new(agents_online.clone()))
            .expect("register agents_online");

        Self {
            registry,
            suggestion_requests_total,
            ranking_latency_seconds,
            assignments_total,
            agents_online,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
