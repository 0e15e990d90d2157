// Statistics data: the player table and the CSV loader that fills it.

pub mod loader;
pub mod table;
