pub mod encoder;
pub mod fetch;
pub mod storage;
