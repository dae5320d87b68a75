// 房源存储抽象层模块

pub mod factory;
pub mod sqlite;
pub mod traits;
pub mod unavailable;

pub use factory::{create_database, create_database_or_unavailable};
pub use traits::{Database, DatabaseError};
pub use unavailable::UnavailableDatabase;
