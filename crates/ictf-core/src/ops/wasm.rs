use crate::{
    domain::{ValidationError, wasm::verify_checksum},
    log,
    log::Topic,
};
use std::path::{Path, PathBuf};

///
/// WasmModule
/// Module bytes read from disk together with their digest.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WasmModule {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub sha256: String,
}

///
/// WasmOps
///

pub struct WasmOps;

impl WasmOps {
    /// Read a module and check it against the expected digest, if any.
    #[allow(clippy::cast_precision_loss)]
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> Result<WasmModule, ValidationError> {
        let bytes = std::fs::read(path).map_err(|source| ValidationError::WasmRead {
            path: path.to_path_buf(),
            source,
        })?;
        let sha256 = verify_checksum(&bytes, expected_sha256)?;

        log!(
            Topic::Lifecycle,
            Debug,
            "📄 wasm.load: {} ({:.2} KB, sha256 {sha256})",
            path.display(),
            bytes.len() as f64 / 1000.0
        );

        Ok(WasmModule {
            path: path.to_path_buf(),
            bytes,
            sha256,
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wasm::sha256_hex;

    #[test]
    fn load_reads_and_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.wasm");
        std::fs::write(&path, b"\0asm\x01\0\0\0").unwrap();

        let module = WasmOps::load(&path, None).unwrap();
        assert_eq!(module.bytes.len(), 8);
        assert_eq!(module.path, path);
        assert_eq!(module.sha256, sha256_hex(b"\0asm\x01\0\0\0"));
    }

    #[test]
    fn load_rejects_wrong_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.wasm");
        std::fs::write(&path, b"\0asm").unwrap();

        let err = WasmOps::load(&path, Some(&sha256_hex(b"other"))).unwrap_err();
        assert!(matches!(err, ValidationError::ChecksumMismatch { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = WasmOps::load(Path::new("/nonexistent/m.wasm"), None).unwrap_err();

        assert!(matches!(err, ValidationError::WasmRead { .. }));
    }
}
