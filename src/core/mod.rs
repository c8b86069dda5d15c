// src/core/mod.rs
//! Configuration and outbound service clients

pub mod config_manager;
pub mod document_converter;
pub mod llm_client;

pub use config_manager::{AppConfig, ConfigManager};
pub use document_converter::{ConversionServiceClient, DocumentConverter};
pub use llm_client::{ChatCompletion, OpenRouterClient};
