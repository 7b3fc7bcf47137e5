pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_platform_stats_router, init_stats_router};
