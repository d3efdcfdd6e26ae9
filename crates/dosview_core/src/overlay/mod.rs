pub mod factory;
pub mod kind;
pub mod manager;
pub mod messages;
pub mod policy;
