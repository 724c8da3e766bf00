//! Prometheus collector for upstream weight usage.
//!
//! # Metrics
//! - `<ns>_up` (gauge): 1 if the last probe reached the upstream, else 0
//! - `<ns>_weight_used` (gauge): legacy used weight, only while up
//! - `<ns>_weight_used_1m` (gauge): one-minute used weight, only while up

use chrono::Utc;
use prometheus::core::{Collector, Desc, Describer};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};

use crate::collector::observation::ObservationCache;

/// Reads the observation cache on every gather and emits its gauges.
pub struct WeightCollector {
    cache: ObservationCache,
    up: Opts,
    weight_used: Opts,
    weight_used_1m: Opts,
    descs: Vec<Desc>,
}

impl WeightCollector {
    pub fn new(namespace: &str, cache: ObservationCache) -> prometheus::Result<Self> {
        let up = Opts::new("up", "Was the last upstream API query successful.").namespace(namespace);
        let weight_used =
            Opts::new("weight_used", "Weight used (MBX-USED-WEIGHT).").namespace(namespace);
        let weight_used_1m = Opts::new(
            "weight_used_1m",
            "Weight used per minute (MBX-USED-WEIGHT-1M).",
        )
        .namespace(namespace);

        let descs = vec![up.describe()?, weight_used.describe()?, weight_used_1m.describe()?];

        Ok(Self {
            cache,
            up,
            weight_used,
            weight_used_1m,
            descs,
        })
    }
}

/// Build a one-sample gauge family. Gauges are fresh per scrape so concurrent
/// scrapes never observe each other's values.
fn gauge_family(opts: &Opts, value: f64) -> Vec<MetricFamily> {
    match Gauge::with_opts(opts.clone()) {
        Ok(gauge) => {
            gauge.set(value);
            gauge.collect()
        }
        Err(e) => {
            tracing::error!(metric = %opts.name, error = %e, "Failed to build gauge");
            Vec::new()
        }
    }
}

impl Collector for WeightCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let observation = self.cache.read();

        if !observation.reachable {
            tracing::debug!(state = ?observation.state(), "Endpoint scraped while upstream down");
            return gauge_family(&self.up, 0.0);
        }

        let mut families = gauge_family(&self.up, 1.0);
        families.extend(gauge_family(&self.weight_used, observation.weight_used));
        families.extend(gauge_family(&self.weight_used_1m, observation.weight_used_1m));

        tracing::debug!(
            age_secs = observation.age_secs(Utc::now()),
            "Endpoint scraped"
        );
        families
    }
}
