use neojc_class::JvmOpcode;
use neojc_isa::EncodeError;
use thiserror::Error;

/// A reference the compiler could not resolve, even after walking the
/// superclass chain.
#[derive(Debug, Error)]
pub enum Unresolved {
    #[error("class {0}")]
    Class(String),

    #[error("method {owner}.{name}{desc}")]
    Method {
        owner: String,
        name: String,
        desc: String,
    },

    #[error("field {owner}.{name}")]
    Field { owner: String, name: String },

    #[error("contract hash of contract interface {0}")]
    ContractHash(String),
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Unsupported instruction {opcode} in method {method}")]
    UnsupportedInstruction { opcode: JvmOpcode, method: String },

    #[error("Unsupported call to {callee} in method {method}: {reason}")]
    UnsupportedCall {
        callee: String,
        method: String,
        reason: String,
    },

    #[error("Unsupported exception type {ty} in method {method}, only java.lang.Exception is supported")]
    UnsupportedException { ty: String, method: String },

    #[error("Could not resolve {0}")]
    ResolutionFailure(Unresolved),

    #[error("Invalid literal '{literal}' passed to {helper}: {reason}")]
    InvalidLiteral {
        helper: String,
        literal: String,
        reason: String,
    },

    #[error("Malformed {idiom} in method {method}: {detail}")]
    MalformedIdiom {
        idiom: &'static str,
        method: String,
        detail: String,
    },

    #[error("Malformed input in method {method}: {detail}")]
    MalformedInput { method: String, detail: String },

    #[error("Method {method} uses {count} {what}, the limit is {limit}")]
    LimitExceeded {
        what: &'static str,
        count: usize,
        limit: usize,
        method: String,
    },

    #[error("Invalid class metadata: {0}")]
    Class(#[from] neojc_class::Error),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
}

impl From<Unresolved> for CompileError {
    fn from(u: Unresolved) -> Self {
        CompileError::ResolutionFailure(u)
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
