pub mod ai;
pub mod anim;
pub mod combat;
pub mod entity;
pub mod geometry;
pub mod movement;
