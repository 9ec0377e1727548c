pub mod prompt;

pub use prompt::PromptComposer;
