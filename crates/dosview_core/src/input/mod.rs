pub mod dispatch;
pub mod keys;
