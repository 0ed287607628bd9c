//! SHA-1 digests for container headers
//!
//! Every 1024-byte header in a SqPack file set ends with a 64-byte field that
//! holds the SHA-1 of the header bytes before it. The same 64-byte layout is
//! used for table and payload digests inside the index and data headers: the
//! 20-byte digest followed by 44 zero bytes.

use sha1::{Digest, Sha1};

/// Size of an on-disk digest field
pub const DIGEST_FIELD_SIZE: usize = 64;

/// Length of a raw SHA-1 digest
const SHA1_LEN: usize = 20;

/// Incremental SHA-1 over appended payload bytes
#[derive(Debug, Clone, Default)]
pub struct Sha1Digest {
    hasher: Sha1,
    len: u64,
}

impl Sha1Digest {
    /// Start an empty digest
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more bytes
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.len += data.len() as u64;
    }

    /// Number of bytes digested so far
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether no bytes have been digested
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current digest as a zero-padded 64-byte field, leaving the state intact
    pub fn field(&self) -> [u8; DIGEST_FIELD_SIZE] {
        let digest = self.hasher.clone().finalize();
        pad_digest(&digest)
    }
}

/// SHA-1 of `data` as a zero-padded 64-byte field
pub fn sha1_field(data: &[u8]) -> [u8; DIGEST_FIELD_SIZE] {
    pad_digest(&Sha1::digest(data))
}

/// Write the SHA-1 of everything before the trailing digest field into it
///
/// `header` is a complete fixed-size header whose last 64 bytes are the
/// digest field. Headers shorter than the field are left untouched.
pub fn seal_header(header: &mut [u8]) {
    let Some(body_len) = header.len().checked_sub(DIGEST_FIELD_SIZE) else {
        return;
    };
    let field = sha1_field(&header[..body_len]);
    header[body_len..].copy_from_slice(&field);
}

fn pad_digest(digest: &[u8]) -> [u8; DIGEST_FIELD_SIZE] {
    let mut field = [0u8; DIGEST_FIELD_SIZE];
    field[..SHA1_LEN].copy_from_slice(&digest[..SHA1_LEN]);
    field
}
