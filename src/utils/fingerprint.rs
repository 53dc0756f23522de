//! 资源内容指纹
//!
//! Fingerprints are lowercase hex digests of a file's raw bytes.  They only need to change
//! whenever the bytes change, so the digest is never compared against anything untrusted.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use md5::Md5;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::core::CachebustError;

/// Digest used for computing fingerprints
///
/// `Md5` reproduces the values written by the older Python `cachebust` tool, so pages that
/// were already fingerprinted with it keep their cached assets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "md5" => Ok(DigestAlgorithm::Md5),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha384" => Ok(DigestAlgorithm::Sha384),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(format!(
                "unknown digest algorithm \"{s}\" (expected md5, sha256, sha384 or sha512)"
            )),
        }
    }
}

/// Computes the fingerprint of an in-memory buffer
pub fn fingerprint_bytes(data: &[u8], algorithm: DigestAlgorithm) -> String {
    match algorithm {
        DigestAlgorithm::Md5 => format!("{:x}", Md5::digest(data)),
        DigestAlgorithm::Sha256 => format!("{:x}", Sha256::digest(data)),
        DigestAlgorithm::Sha384 => format!("{:x}", Sha384::digest(data)),
        DigestAlgorithm::Sha512 => format!("{:x}", Sha512::digest(data)),
    }
}

/// Reads the whole file and fingerprints its bytes
///
/// The file handle is closed before this returns.
pub fn fingerprint_file(path: &Path, algorithm: DigestAlgorithm) -> Result<String, CachebustError> {
    let data = fs::read(path).map_err(|source| CachebustError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(fingerprint_bytes(&data, algorithm))
}
