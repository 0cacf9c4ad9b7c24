pub mod loop_;
pub mod registry;

pub use loop_::AgentLoop;
pub use registry::ToolRegistry;
