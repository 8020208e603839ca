pub mod arena;
pub mod event;
pub mod step;
pub mod world;
