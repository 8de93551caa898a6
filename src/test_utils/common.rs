use std::sync::Arc;

use crate::config::IntervalRange;
use crate::config::SensorConfig;
use crate::resource::MockSampler;
use crate::resource::SensorEncoding;
use crate::resource::SensorResource;

pub(crate) fn enable_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sampler returning `values` in order, then repeating the last one.
pub(crate) fn scripted_sampler(values: Vec<f64>) -> MockSampler {
    let last = *values.last().expect("at least one scripted value");
    let mut values = values.into_iter();
    let mut sampler = MockSampler::new();
    sampler
        .expect_sample()
        .returning(move || values.next().unwrap_or(last));
    sampler
}

pub(crate) fn scripted_sensor(
    name: &str,
    encoding: SensorEncoding,
    interval: IntervalRange,
    values: Vec<f64>,
) -> Arc<SensorResource> {
    Arc::new(SensorResource::with_sampler(
        name,
        encoding,
        interval,
        SensorConfig::default(),
        Box::new(scripted_sampler(values)),
    ))
}
