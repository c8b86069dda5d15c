// src/scraper/adapters/stub.rs
//! Indeed and Glassdoor have no real extraction yet; they answer with fixed
//! per-board text so callers always receive a complete record.

use crate::scraper::{Extraction, JobInfo};
use tracing::debug;

pub fn indeed() -> Extraction {
    board_stub("Indeed")
}

pub fn glassdoor() -> Extraction {
    board_stub("Glassdoor")
}

fn board_stub(board: &str) -> Extraction {
    debug!("Using stub extraction for {}", board);

    Extraction::placeholder(JobInfo {
        company: Some(format!("Empresa extraída do {board}")),
        position: Some(format!("Cargo extraído do {board}")),
        location: Some(format!("Localização extraída do {board}")),
        description: Some(format!("Descrição extraída do {board}")),
        ..Default::default()
    })
}
