use std::sync::LazyLock;
use std::time::Instant;

pub mod config;
pub mod gesture;
pub mod io;
pub mod scenario;

pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);
