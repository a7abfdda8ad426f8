pub mod logger;
pub mod transcode;
