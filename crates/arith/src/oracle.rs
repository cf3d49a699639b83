// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{ArithError, Ciphertext, EncBool, EncU64, MockArithmetic};
use tracing::{info, warn};
use veil_acl::{AccessControlLedger, Principal};

/// The off-system decryption service. It opens a ciphertext only for a principal that holds a
/// committed persistent grant on its handle.
pub trait DecryptionOracle {
    fn decrypt_u64(
        &self,
        acl: &AccessControlLedger,
        value: &EncU64,
        requester: &Principal,
    ) -> Result<u64, ArithError>;

    fn decrypt_bool(
        &self,
        acl: &AccessControlLedger,
        value: &EncBool,
        requester: &Principal,
    ) -> Result<bool, ArithError>;
}

impl DecryptionOracle for MockArithmetic {
    fn decrypt_u64(
        &self,
        acl: &AccessControlLedger,
        value: &EncU64,
        requester: &Principal,
    ) -> Result<u64, ArithError> {
        if let Err(e) = acl.check_persistent(&value.handle(), requester) {
            warn!(handle = %value, %requester, "decryption refused");
            return Err(e.into());
        }
        info!(handle = %value, %requester, "decryption granted");
        self.read(value)
    }

    fn decrypt_bool(
        &self,
        acl: &AccessControlLedger,
        value: &EncBool,
        requester: &Principal,
    ) -> Result<bool, ArithError> {
        if let Err(e) = acl.check_persistent(&value.handle(), requester) {
            warn!(handle = %value, %requester, "decryption refused");
            return Err(e.into());
        }
        Ok(self.read(value)? == 1)
    }
}
