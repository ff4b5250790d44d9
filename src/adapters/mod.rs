// Adapters layer: concrete implementations of the domain ports for
// external systems (filesystem, S3, warehouse REST API).

pub mod local;
pub mod s3;
pub mod warehouse;
