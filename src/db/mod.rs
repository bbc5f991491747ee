pub mod connection;
pub mod shifts;

pub use connection::{init_db, Database};
pub use shifts::load_all_shifts;
