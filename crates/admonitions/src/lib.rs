pub mod admonition;
pub mod attributes;
pub mod build;
pub mod code_fence;
pub mod config;
pub mod discovery;
pub mod list_item;
pub mod output;
pub mod reader;
pub mod render;

pub use admonition::parser::{parse, parse_document};
pub use build::{build, render_file};
pub use render::pipeline::render_document;
