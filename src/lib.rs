pub mod board;
pub mod collisions;
pub mod constants;
pub mod engine;
pub mod game;
pub mod ghost_ai;
pub mod map_parser;
pub mod navigation;
pub mod rng;
pub mod runtime;
pub mod scoring;
pub mod types;
pub mod units;
