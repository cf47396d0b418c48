//! Shared configuration and error types.

pub mod config;
pub mod error;

pub use config::{
    AcoParam, CanvasConfig, ClockConfig, ColonyParams, DepositRule, EngineConfig, ForagingParams,
    StartStrategy,
};
pub use error::{EngineError, EngineResult};
