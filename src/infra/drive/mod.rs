pub mod drive_client;

pub use drive_client::{DriveClient, ServiceAccountAuth};
