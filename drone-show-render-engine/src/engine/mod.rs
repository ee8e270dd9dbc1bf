pub mod assets;
pub mod camera;
pub mod compute;
pub mod core;
pub mod loading;
pub mod render;
pub mod systems;
