#![allow(dead_code)]

mod log_capture;
mod messages;
mod mock_upstream;
mod stub_stage;

pub use log_capture::CapturedLogs;
pub use messages::{query, query_bytes, write_store};
pub use mock_upstream::{MockUpstream, UpstreamBehavior};
pub use stub_stage::StubStage;
