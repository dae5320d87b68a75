// 存储抽象层模块

pub mod factory;
pub mod local;
pub mod traits;

pub use factory::create_storage;
pub use local::LocalStorage;
pub use traits::Storage;
