// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::input::open_input;
use crate::{
    ArithError, CipherKind, Ciphertext, ConfidentialArithmetic, EncBool, EncU64,
    ExternalCiphertext, InputClient, InputContext, InputKey, InputProof,
};
use std::collections::BTreeMap;
use tracing::trace;
use veil_acl::Handle;

#[derive(Clone, Copy, Debug)]
struct Slot {
    kind: CipherKind,
    value: u64,
}

/// Deterministic reference backend.
///
/// Handles are content addressed: an operation's output handle is the hash of the operation tag
/// and its operand handles, so the same inputs always yield the same handle. Plaintexts live in a
/// private table that only the [`crate::DecryptionOracle`] implementation reads. Integer
/// arithmetic wraps at 64 bits.
pub struct MockArithmetic {
    slots: BTreeMap<Handle, Slot>,
    input_key: InputKey,
    operations: usize,
}

impl MockArithmetic {
    pub fn new(input_key: InputKey) -> Self {
        Self {
            slots: BTreeMap::new(),
            input_key,
            operations: 0,
        }
    }

    /// Client bound to this backend's input key.
    pub fn input_client(&self) -> InputClient {
        InputClient::new(self.input_key.clone())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of operations evaluated so far, including ones that produced an existing handle.
    pub fn operation_count(&self) -> usize {
        self.operations
    }

    pub(crate) fn read<T: Ciphertext>(&self, ct: &T) -> Result<u64, ArithError> {
        let handle = ct.handle();
        let slot = self
            .slots
            .get(&handle)
            .ok_or(ArithError::UnknownHandle(handle))?;
        if slot.kind != T::KIND {
            return Err(ArithError::KindMismatch {
                handle,
                expected: T::KIND,
            });
        }
        Ok(slot.value)
    }

    fn store<T: Ciphertext>(&mut self, handle: Handle, value: u64) -> T {
        self.operations += 1;
        self.slots.insert(
            handle,
            Slot {
                kind: T::KIND,
                value,
            },
        );
        T::from_handle(handle)
    }

    fn binary<T: Ciphertext>(
        &mut self,
        tag: &str,
        a: &EncU64,
        b: &EncU64,
        op: impl FnOnce(u64, u64) -> u64,
    ) -> Result<T, ArithError> {
        let (x, y) = (self.read(a)?, self.read(b)?);
        let handle = Handle::digest([
            tag.as_bytes(),
            a.handle().as_bytes().as_slice(),
            b.handle().as_bytes().as_slice(),
        ]);
        trace!(op = tag, lhs = %a, rhs = %b, out = %handle, "mock op");
        Ok(self.store(handle, op(x, y)))
    }
}

impl ConfidentialArithmetic for MockArithmetic {
    fn encrypt(&mut self, value: u64) -> Result<EncU64, ArithError> {
        let bytes = value.to_le_bytes();
        let handle = Handle::digest([b"trivial".as_slice(), bytes.as_slice()]);
        Ok(self.store(handle, value))
    }

    fn add(&mut self, a: &EncU64, b: &EncU64) -> Result<EncU64, ArithError> {
        self.binary("add", a, b, u64::wrapping_add)
    }

    fn sub(&mut self, a: &EncU64, b: &EncU64) -> Result<EncU64, ArithError> {
        self.binary("sub", a, b, u64::wrapping_sub)
    }

    fn mul(&mut self, a: &EncU64, b: &EncU64) -> Result<EncU64, ArithError> {
        self.binary("mul", a, b, u64::wrapping_mul)
    }

    fn eq(&mut self, a: &EncU64, b: &EncU64) -> Result<EncBool, ArithError> {
        self.binary("eq", a, b, |x, y| u64::from(x == y))
    }

    fn gt(&mut self, a: &EncU64, b: &EncU64) -> Result<EncBool, ArithError> {
        self.binary("gt", a, b, |x, y| u64::from(x > y))
    }

    fn select<T: Ciphertext>(&mut self, cond: &EncBool, a: &T, b: &T) -> Result<T, ArithError> {
        let flag = self.read(cond)?;
        let (x, y) = (self.read(a)?, self.read(b)?);
        let handle = Handle::digest([
            b"select".as_slice(),
            cond.handle().as_bytes().as_slice(),
            a.handle().as_bytes().as_slice(),
            b.handle().as_bytes().as_slice(),
        ]);
        // Both operands are always read, the flag only picks the stored value.
        let value = flag * x + (1 - flag) * y;
        Ok(self.store(handle, value))
    }

    fn verify_and_decode(
        &mut self,
        input: &ExternalCiphertext,
        proof: &InputProof,
        context: &InputContext,
    ) -> Result<EncU64, ArithError> {
        let value = open_input(&self.input_key, input, proof, context)?;
        let handle = Handle::digest([b"input".as_slice(), input.0.as_slice()]);
        Ok(self.store(handle, *value))
    }
}
