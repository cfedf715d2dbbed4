pub mod assertion;
pub mod chain;
pub mod collector;
pub mod context;
pub mod diag;
pub mod literal;
pub mod payload;
pub mod registry;
pub mod suite;
pub mod translator;
pub mod verb;
pub mod walker;

pub use chain::{extract_chain, ChainItem};
pub use collector::{collect_commands, CollectError, CollectedCommands, DRIVER_CLASS};
pub use context::EmitCx;
pub use diag::{Diagnostic, Translation};
pub use registry::CommandRegistry;
pub use suite::{assemble_suites, AssembledSuites, GeneratedClass, DEFAULT_RECEIVER};
pub use translator::translate_chain;
pub use verb::Verb;
pub use walker::walk_block;
