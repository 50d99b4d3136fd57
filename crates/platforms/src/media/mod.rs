pub mod streamer_status;

pub use streamer_status::{StreamerStatus, StreamerStatusBuilder};
