//! Events - 控制器事件广播

mod publisher;

pub use publisher::{ControllerEvent, EventPublisher};
