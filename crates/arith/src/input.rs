// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{ArithError, ExternalCiphertext, InputContext, InputProof};
use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce,
};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

const NONCE_LEN: usize = 12;
const PROOF_DOMAIN: &[u8] = b"veil/input-proof/v1";

/// Symmetric key shared between clients and the input verifier of the reference backend.
#[derive(Clone)]
pub struct InputKey(Zeroizing<[u8; 32]>);

impl InputKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0[..]))
    }

    fn proof_for(&self, ciphertext: &[u8], context: &InputContext) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(PROOF_DOMAIN);
        hasher.update(&self.0[..]);
        hasher.update(ciphertext);
        hasher.update(context.owner.as_bytes());
        hasher.update(context.target.as_bytes());
        hasher.finalize().to_vec()
    }
}

fn associated_data(context: &InputContext) -> Vec<u8> {
    let mut aad = Vec::with_capacity(40);
    aad.extend_from_slice(context.owner.as_bytes());
    aad.extend_from_slice(context.target.as_bytes());
    aad
}

/// Client side of input submission: seals a plaintext choice for one `(owner, target)` pair and
/// attaches the proof the backend will check.
#[derive(Clone)]
pub struct InputClient {
    key: InputKey,
}

impl InputClient {
    pub fn new(key: InputKey) -> Self {
        Self { key }
    }

    pub fn seal<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        value: u64,
        context: &InputContext,
    ) -> Result<(ExternalCiphertext, InputProof), ArithError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce_bytes);

        let plaintext = Zeroizing::new(value.to_le_bytes());
        let sealed = self
            .key
            .cipher()
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                Payload {
                    msg: &plaintext[..],
                    aad: &associated_data(context),
                },
            )
            .map_err(|_| ArithError::InvalidProof("could not seal input".to_string()))?;

        let mut bytes = Vec::with_capacity(NONCE_LEN + sealed.len());
        bytes.extend_from_slice(&nonce_bytes);
        bytes.extend_from_slice(&sealed);

        let proof = self.key.proof_for(&bytes, context);
        Ok((ExternalCiphertext(bytes), InputProof(proof)))
    }
}

/// Verify the proof and open the sealed value. Any mismatch is reported as
/// [`ArithError::InvalidProof`].
pub(crate) fn open_input(
    key: &InputKey,
    input: &ExternalCiphertext,
    proof: &InputProof,
    context: &InputContext,
) -> Result<Zeroizing<u64>, ArithError> {
    if key.proof_for(&input.0, context) != proof.0 {
        return Err(ArithError::InvalidProof(
            "proof does not match ciphertext and submitter".to_string(),
        ));
    }
    if input.0.len() <= NONCE_LEN {
        return Err(ArithError::InvalidProof("ciphertext too short".to_string()));
    }

    let (nonce, sealed) = input.0.split_at(NONCE_LEN);
    let opened = Zeroizing::new(
        key.cipher()
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: &associated_data(context),
                },
            )
            .map_err(|_| ArithError::InvalidProof("ciphertext failed authentication".to_string()))?,
    );

    let bytes: [u8; 8] = opened
        .as_slice()
        .try_into()
        .map_err(|_| ArithError::InvalidProof(format!("unexpected payload length {}", opened.len())))?;
    Ok(Zeroizing::new(u64::from_le_bytes(bytes)))
}
