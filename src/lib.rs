pub mod audit_pipeline;
pub mod logger;
