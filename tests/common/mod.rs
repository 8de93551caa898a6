use std::collections::VecDeque;
use std::sync::Arc;

use observe_engine::IntervalRange;
use observe_engine::ResourceServer;
use observe_engine::Sampler;
use observe_engine::SensorConfig;
use observe_engine::SensorEncoding;
use observe_engine::SensorResource;
use observe_engine::ServerBuilder;
use observe_engine::Settings;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

pub const SECOND: IntervalRange = IntervalRange::new(1_000, 1_000);

pub fn enable_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Returns the scripted values in order, then keeps repeating the last one.
pub struct ScriptedSampler {
    values: Mutex<VecDeque<f64>>,
    last: f64,
}

impl ScriptedSampler {
    pub fn new(values: &[f64]) -> Self {
        Self {
            values: Mutex::new(values.iter().copied().collect()),
            last: values.last().copied().unwrap_or_default(),
        }
    }
}

impl Sampler for ScriptedSampler {
    fn sample(&self) -> f64 {
        self.values.lock().pop_front().unwrap_or(self.last)
    }
}

pub fn scripted_sensor(
    name: &str,
    encoding: SensorEncoding,
    values: &[f64],
) -> Arc<SensorResource> {
    Arc::new(SensorResource::with_sampler(
        name,
        encoding,
        SECOND,
        SensorConfig::default(),
        Box::new(ScriptedSampler::new(values)),
    ))
}

pub fn default_server(shutdown: CancellationToken) -> ResourceServer {
    ServerBuilder::new(Settings::default(), shutdown)
        .with_default_resources()
        .build()
        .expect("default tree builds")
}
