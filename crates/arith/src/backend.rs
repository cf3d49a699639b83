// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;
use veil_acl::{AclError, Handle, Principal};

/// The plaintext type a handle encrypts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherKind {
    U64,
    Bool,
}

impl Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherKind::U64 => write!(f, "euint64"),
            CipherKind::Bool => write!(f, "ebool"),
        }
    }
}

/// Typed view over a [`Handle`].
pub trait Ciphertext: Copy + Eq + fmt::Debug {
    const KIND: CipherKind;
    fn handle(&self) -> Handle;
    fn from_handle(handle: Handle) -> Self;
}

/// Encrypted unsigned 64-bit integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncU64(Handle);

/// Encrypted boolean, the result of an encrypted comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncBool(Handle);

impl Ciphertext for EncU64 {
    const KIND: CipherKind = CipherKind::U64;
    fn handle(&self) -> Handle {
        self.0
    }
    fn from_handle(handle: Handle) -> Self {
        Self(handle)
    }
}

impl Ciphertext for EncBool {
    const KIND: CipherKind = CipherKind::Bool;
    fn handle(&self) -> Handle {
        self.0
    }
    fn from_handle(handle: Handle) -> Self {
        Self(handle)
    }
}

impl Display for EncU64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for EncBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ciphertext as produced by a client outside of the system.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalCiphertext(pub Vec<u8>);

/// Validity proof accompanying an [`ExternalCiphertext`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputProof(pub Vec<u8>);

/// Who submitted an input and which election it was produced for. A proof is only valid for the
/// exact pair it was created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputContext {
    pub owner: Principal,
    pub target: Principal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithError {
    #[error("input rejected: {0}")]
    InvalidProof(String),
    #[error("unknown ciphertext handle {0}")]
    UnknownHandle(Handle),
    #[error("ciphertext {handle} is not an {expected}")]
    KindMismatch { handle: Handle, expected: CipherKind },
    #[error(transparent)]
    Access(#[from] AclError),
}

/// Confidential arithmetic over ciphertext handles.
///
/// Implementations must be deterministic: the handle returned by every operation is a pure
/// function of the operation and its operands, so that replaying the same sequence of operations
/// reproduces the same state.
pub trait ConfidentialArithmetic {
    /// Trivially encrypt a public constant.
    fn encrypt(&mut self, value: u64) -> Result<EncU64, ArithError>;
    fn add(&mut self, a: &EncU64, b: &EncU64) -> Result<EncU64, ArithError>;
    /// Wrapping subtraction.
    fn sub(&mut self, a: &EncU64, b: &EncU64) -> Result<EncU64, ArithError>;
    fn mul(&mut self, a: &EncU64, b: &EncU64) -> Result<EncU64, ArithError>;
    fn eq(&mut self, a: &EncU64, b: &EncU64) -> Result<EncBool, ArithError>;
    /// Strictly greater than.
    fn gt(&mut self, a: &EncU64, b: &EncU64) -> Result<EncBool, ArithError>;
    /// Oblivious selection: `a` when `cond` encrypts true, `b` otherwise.
    fn select<T: Ciphertext>(&mut self, cond: &EncBool, a: &T, b: &T) -> Result<T, ArithError>;
    /// Verify an externally produced ciphertext and import it as an internal one.
    fn verify_and_decode(
        &mut self,
        input: &ExternalCiphertext,
        proof: &InputProof,
        context: &InputContext,
    ) -> Result<EncU64, ArithError>;
}
