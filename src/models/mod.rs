pub mod dasher;
pub mod menu;
pub mod order;
pub mod token;
