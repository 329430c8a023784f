pub mod db;

pub use db::{DB_NAME, connect_to_mongo};
