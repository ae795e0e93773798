pub mod assemble;
pub mod classify;
pub mod domain;
pub mod error;
pub mod render;
pub mod template;
pub mod transcript;
