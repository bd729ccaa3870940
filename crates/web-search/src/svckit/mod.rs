//! Agent tools built on the search providers

pub mod search_tool;

pub use search_tool::{SEARCH_TOOL_NAME, SearchTool};
