// src/scraper/adapters/mod.rs
//! Per-board extraction strategies. Selection lives in `JobSource::classify`.

pub mod generic;
pub mod linkedin;
pub mod stub;

pub const UNKNOWN_COMPANY: &str = "Empresa não identificada";
