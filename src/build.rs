mod builder;
pub mod convert;
mod front_matter;
mod highlight;
mod loader;
mod markdown;
mod paths;
pub mod pipeline;
mod render;
pub mod site;
mod stylesheet;
mod writer;

pub use builder::Builder;
pub use highlight::SyntaxHighlighter;
