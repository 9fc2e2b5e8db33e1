pub mod event;
pub mod game;
pub mod level;
pub mod save;
pub mod step;
