pub mod config;
pub mod db;
pub mod logs;
pub mod users;
