use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Instant;

pub struct MetricsService {
    registry: Registry,
    generations: IntCounterVec,
    request_duration: HistogramVec,
    responses: IntCounterVec,
    quota_fallbacks: IntCounter,
}

impl MetricsService {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let generations = IntCounterVec::new(
            Opts::new("generation_requests_total", "Generate calls by outcome"),
            &["outcome"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency")
                .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0]),
            &["endpoint"],
        )?;
        let responses = IntCounterVec::new(
            Opts::new("http_responses_total", "HTTP responses by status class"),
            &["class"],
        )?;
        let quota_fallbacks = IntCounter::new(
            "quota_fallback_total",
            "Quota checks served by the in-memory fallback",
        )?;

        registry.register(Box::new(generations.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(responses.clone()))?;
        registry.register(Box::new(quota_fallbacks.clone()))?;

        Ok(Self {
            registry,
            generations,
            request_duration,
            responses,
            quota_fallbacks,
        })
    }

    pub fn record_generation(&self, outcome: &str) {
        self.generations.with_label_values(&[outcome]).inc();
    }

    pub fn record_request_duration(&self, duration: std::time::Duration, endpoint: &str) {
        self.request_duration
            .with_label_values(&[endpoint])
            .observe(duration.as_secs_f64());
    }

    pub fn record_response(&self, class: &str) {
        self.responses.with_label_values(&[class]).inc();
    }

    pub fn record_quota_fallback(&self) {
        self.quota_fallbacks.inc();
    }

    pub fn quota_fallbacks(&self) -> u64 {
        self.quota_fallbacks.get()
    }

    pub fn generations(&self, outcome: &str) -> u64 {
        self.generations.with_label_values(&[outcome]).get()
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct RequestTimer<'a> {
    metrics: &'a MetricsService,
    start: Instant,
    endpoint: String,
}

impl<'a> RequestTimer<'a> {
    pub fn new(metrics: &'a MetricsService, endpoint: String) -> Self {
        Self {
            metrics,
            start: Instant::now(),
            endpoint,
        }
    }
}

impl Drop for RequestTimer<'_> {
    fn drop(&mut self) {
        self.metrics
            .record_request_duration(self.start.elapsed(), &self.endpoint);
    }
}
