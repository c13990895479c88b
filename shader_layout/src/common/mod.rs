pub mod crc64;
pub mod integer;
pub mod pool;
pub mod prettify;
