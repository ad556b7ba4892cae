pub mod physician;

pub use physician::PhysicianService;
