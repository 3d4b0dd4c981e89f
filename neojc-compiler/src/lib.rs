//! JVM bytecode to NeoVM compiler.
//!
//! Source methods are converted one instruction at a time through a table of
//! per-family [`converters`]. Calls compile their callee on first use; the
//! [`NeoModule`] caches every method by identity so each is converted once,
//! recursive calls included. [`NeoModule::assemble`] resolves labels and call
//! references into the final script.
//!
//! ```no_run
//! use neojc_class::ClassPool;
//! use neojc_compiler::{CompileOptions, compile_class};
//!
//! let pool = ClassPool::open("contract.yaml".as_ref())?;
//! let options = CompileOptions::default();
//! let module = compile_class(Box::new(pool), "com/example/Token", options)?;
//! let script = module.assemble(&options)?;
//! println!("{} bytes", script.bytes.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod assemble;
mod compiler;
pub mod converters;
pub mod devpack;
mod emit;
pub mod error;
pub mod instruction;
pub mod literal;
pub mod method;
pub mod module;
pub mod unit;

pub use assemble::Script;
pub use compiler::{compile_class, compile_entry};
pub use emit::reverse_args;
pub use error::{CompileError, Result, Unresolved};
pub use instruction::{Label, NeoInstruction, Target};
pub use method::{NeoMethod, SourceMethod};
pub use module::{MethodId, MethodKey, MethodToken, NeoEvent, NeoModule};
pub use unit::{CompilationUnit, CompileOptions};
