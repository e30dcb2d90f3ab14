//! Constructor argument encoding.
//!
//! Deployment arguments arrive as plain strings; they are coerced against
//! the constructor declared in the contract ABI and ABI-encoded so they can
//! be appended to the creation bytecode.

use alloy_dyn_abi::{
    DynSolType,
    DynSolValue,
    JsonAbiExt,
};
use alloy_json_abi::{
    JsonAbi,
    Param,
};
use alloy_primitives::Bytes;

#[derive(thiserror::Error, Debug)]
pub enum EncodeArgsError {
    #[error("constructor takes {expected} argument(s) but {got} were provided")]
    ArityMismatch { expected: usize, got: usize },
    #[error("{0} constructor argument(s) provided but the contract has no constructor")]
    UnexpectedArgs(usize),
    #[error("Dynamic ABI Error: {0}")]
    DynAbiError(#[from] alloy_dyn_abi::Error),
    #[error("Error parsing ABI types: {0}")]
    ParseAbiError(#[from] alloy_dyn_abi::parser::Error),
}

type Result<T> = std::result::Result<T, EncodeArgsError>;

/// ABI-encodes `args` against the constructor declared in `abi`.
///
/// The returned bytes are ready to be appended to the creation bytecode.
/// Arity is validated here so a mismatch surfaces before any transaction is
/// signed or sent.
pub fn encode_constructor_args(abi: &JsonAbi, args: &[String]) -> Result<Bytes> {
    let Some(constructor) = abi.constructor() else {
        if args.is_empty() {
            return Ok(Bytes::new());
        }
        return Err(EncodeArgsError::UnexpectedArgs(args.len()));
    };

    if constructor.inputs.len() != args.len() {
        return Err(EncodeArgsError::ArityMismatch {
            expected: constructor.inputs.len(),
            got: args.len(),
        });
    }

    let sol_values = encode_args(&constructor.inputs, args)?;
    let encoded = constructor.abi_encode_input(&sol_values)?;
    Ok(Bytes::from(encoded))
}

pub fn encode_args<I, S>(inputs: &[Param], args: I) -> Result<Vec<DynSolValue>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    std::iter::zip(inputs, args)
        .map(|(input, arg)| coerce_value(&input.selector_type(), arg.as_ref()))
        .collect()
}

/// Helper function to coerce a value to a [DynSolValue] given a type string
pub fn coerce_value(ty: &str, arg: &str) -> Result<DynSolValue> {
    let ty = DynSolType::parse(ty)?;
    Ok(DynSolType::coerce_str(&ty, arg)?)
}
