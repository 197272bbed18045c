use crate::error::{Result, TcError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUFFER_CAPACITY: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    pub stream: StreamConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Bounded output buffer size, in tokens. Writers suspend once it is full.
    pub buffer_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl CompressorConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.stream.buffer_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.stream.buffer_capacity == 0 {
            return Err(TcError::InvalidConfig(
                "stream.buffer_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
