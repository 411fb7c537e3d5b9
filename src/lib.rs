pub mod config;
pub mod controller;
pub mod drivers;
pub mod frame;
pub mod models;
pub mod motion;
pub mod scheduler;
pub mod stream;
pub mod utils;
