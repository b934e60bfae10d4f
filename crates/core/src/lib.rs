pub mod config;
pub mod config_loader;
pub mod error;
pub mod limits;
pub mod matrix;
pub mod projection;
pub mod service;
pub mod store;
pub mod strategy;
pub mod types;
pub mod validate;

pub use config::{AppConfig, EngineConfig, ServerConfig};
pub use config_loader::ConfigLoader;
pub use error::EngineError;
pub use limits::RiskLimits;
pub use service::OptimizationService;
pub use store::CovarianceStore;
pub use strategy::Method;
pub use types::{
    Allocation, AllocationStats, CovarianceMatrix, ExpectedReturns, OptimizationRequest,
    OptimizationResult,
};
