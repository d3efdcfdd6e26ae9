pub mod bitmap;
pub mod codepage;
pub mod manager;
