use bytes::Bytes;
use chrono::DateTime;
use chrono::Local;
#[cfg(test)]
use mockall::automock;
use rand::Rng;
use serde::Serialize;

use super::ContentFormat;
use super::Guarded;
use super::Observable;
use super::Payload;
use super::Readable;
use super::Representation;
use super::Resource;
use super::ResourceMeta;
use crate::config::IntervalRange;
use crate::config::SensorConfig;
use crate::observe::decide;
use crate::observe::Decision;
use crate::server::Request;
use crate::server::Response;
use crate::Error;
use crate::Result;

/// Timestamp layout of the `time` field in JSON readings
const READING_TIME_FORMAT: &str = "%m%d%H%M%S";

/// Source of raw sensor values.
#[cfg_attr(test, automock)]
pub trait Sampler: Send + Sync + 'static {
    fn sample(&self) -> f64;
}

/// Uniform pseudo-random readings within the configured bounds, rounded to
/// two decimals.
#[derive(Debug, Clone, Copy)]
pub struct UniformSampler {
    bounds: SensorConfig,
}

impl UniformSampler {
    pub fn new(bounds: SensorConfig) -> Self {
        Self { bounds }
    }
}

impl Sampler for UniformSampler {
    fn sample(&self) -> f64 {
        let mut rng = rand::thread_rng();
        let value = rng.gen_range(self.bounds.lower_bound..=self.bounds.upper_bound);
        (value * 100.0).round() / 100.0
    }
}

/// How a sensor's readings are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorEncoding {
    /// The reading as a bare number
    PlainText,
    /// `{"name": .., "value": .., "time": "%m%d%H%M%S"}`
    Json,
}

impl SensorEncoding {
    pub fn format(&self) -> ContentFormat {
        match self {
            SensorEncoding::PlainText => ContentFormat::TextPlain,
            SensorEncoding::Json => ContentFormat::Json,
        }
    }
}

#[derive(Debug, Serialize)]
struct Reading<'a> {
    name: &'a str,
    value: f64,
    time: String,
}

#[derive(Debug, Clone, Default)]
pub struct TemperatureState {
    /// `None` until the first committed sample
    pub last_sample: Option<f64>,
    pub last_update: Option<DateTime<Local>>,
    pub observe_counter: u64,
    pub payload: Bytes,
}

/// Observable temperature-like resource refreshed by the scheduler.
pub struct SensorResource {
    meta: ResourceMeta,
    encoding: SensorEncoding,
    interval: IntervalRange,
    bounds: SensorConfig,
    sampler: Box<dyn Sampler>,
    state: Guarded<TemperatureState>,
}

impl std::fmt::Debug for SensorResource {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SensorResource")
            .field("meta", &self.meta)
            .field("encoding", &self.encoding)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl SensorResource {
    pub fn new(
        name: &str,
        encoding: SensorEncoding,
        interval: IntervalRange,
        bounds: SensorConfig,
    ) -> Self {
        Self::with_sampler(
            name,
            encoding,
            interval,
            bounds,
            Box::new(UniformSampler::new(bounds)),
        )
    }

    pub fn with_sampler(
        name: &str,
        encoding: SensorEncoding,
        interval: IntervalRange,
        bounds: SensorConfig,
        sampler: Box<dyn Sampler>,
    ) -> Self {
        Self {
            meta: ResourceMeta::new(name).observable().with_children(),
            encoding,
            interval,
            bounds,
            sampler,
            state: Guarded::new(TemperatureState::default()),
        }
    }

    pub fn state(&self) -> TemperatureState {
        self.state.snapshot()
    }

    pub fn encoding(&self) -> SensorEncoding {
        self.encoding
    }

    fn encode(
        &self,
        sample: f64,
        time: &DateTime<Local>,
    ) -> Result<Bytes> {
        if !sample.is_finite() {
            return Err(Error::Encoding(format!("{}: non-finite reading {sample}", self.meta.name)));
        }

        let payload = match self.encoding {
            SensorEncoding::PlainText => Payload::text(sample.to_string()),
            SensorEncoding::Json => {
                let reading = Reading {
                    name: &self.meta.name,
                    value: sample,
                    time: time.format(READING_TIME_FORMAT).to_string(),
                };
                Payload::Structured {
                    value: serde_json::to_value(&reading)?,
                    format: ContentFormat::Json,
                }
            }
        };
        payload.encode()
    }
}

impl Resource for SensorResource {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }

    fn readable(&self) -> Option<&dyn Readable> {
        Some(self)
    }

    fn observable(&self) -> Option<&dyn Observable> {
        Some(self)
    }
}

impl Readable for SensorResource {
    fn read(
        &self,
        _request: &Request,
    ) -> Result<Response> {
        let payload = self.state.read(|s| s.payload.clone());
        Ok(Response::content(Representation {
            payload,
            format: self.encoding.format(),
        }))
    }
}

impl Observable for SensorResource {
    fn interval(&self) -> IntervalRange {
        self.interval
    }

    fn refresh(&self) -> Result<Option<Representation>> {
        self.state.update(|state| {
            let sample = self.bounds.clamp(self.sampler.sample());

            if decide(&state.last_sample, &Some(sample)) == Decision::Skip {
                return Ok(None);
            }

            let now = Local::now();
            // Encode before touching the state so a failure commits nothing.
            let payload = self.encode(sample, &now)?;

            state.last_sample = Some(sample);
            state.last_update = Some(now);
            state.payload = payload.clone();

            Ok(Some(Representation {
                payload,
                format: self.encoding.format(),
            }))
        })
    }

    fn observe_counter(&self) -> u64 {
        self.state.read(|s| s.observe_counter)
    }

    fn record_notification(&self) {
        self.state.update(|s| s.observe_counter += 1);
    }
}
