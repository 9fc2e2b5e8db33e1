pub mod character;
pub mod collision;
pub mod parameter;
pub mod tile;
