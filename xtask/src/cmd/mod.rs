pub mod check_docs_links;
pub mod preflight;
pub mod tool_docs;
