// SPDX-License-Identifier: Apache-2.0

//! BLIF reading and writing for k-LUT networks.

pub mod emit;
pub mod parse;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::cutsel_error::CutselError;
use crate::klut::KlutNetwork;

pub use emit::emit_blif;
pub use parse::{parse_blif, ParseError};

fn open_reader(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let is_gz = path.extension().map(|e| e == "gz").unwrap_or(false);
    if is_gz {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Reads a BLIF file; paths ending in `.gz` are decompressed on the fly.
pub fn read_blif_path(path: &Path) -> Result<KlutNetwork, CutselError> {
    let io_err = |source: std::io::Error| CutselError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut text = String::new();
    open_reader(path)
        .and_then(|mut r| r.read_to_string(&mut text))
        .map_err(io_err)?;
    let ntk = parse_blif(&text).map_err(|error| CutselError::Blif {
        path: path.display().to_string(),
        error,
    })?;
    log::info!(
        "read_blif_path: {} inputs={} outputs={} luts={}",
        path.display(),
        ntk.num_inputs(),
        ntk.num_outputs(),
        ntk.num_luts()
    );
    Ok(ntk)
}

pub fn write_blif_path(path: &Path, ntk: &KlutNetwork) -> Result<(), CutselError> {
    std::fs::write(path, emit_blif(ntk)).map_err(|source| CutselError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::full_adder_sum;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_read_plain_and_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let text = emit_blif(&full_adder_sum());

        let plain = dir.path().join("fa.blif");
        std::fs::write(&plain, &text).unwrap();
        let from_plain = read_blif_path(&plain).unwrap();

        let gz = dir.path().join("fa.blif.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap();
        let from_gz = read_blif_path(&gz).unwrap();

        assert_eq!(from_plain.to_string(), from_gz.to_string());
        assert_eq!(from_plain.num_luts(), 1);
    }

    #[test]
    fn test_errors_carry_path_and_class() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.blif");
        let err = read_blif_path(&missing).unwrap_err();
        assert_eq!(err.class(), crate::cutsel_error::ErrorClass::Io);
        assert!(err.to_string().contains("missing.blif"));

        let bad = dir.path().join("bad.blif");
        std::fs::write(&bad, ".model m\n.subckt foo\n").unwrap();
        let err = read_blif_path(&bad).unwrap_err();
        assert_eq!(err.class(), crate::cutsel_error::ErrorClass::Network);
        assert!(err.to_string().contains("line 2"));
    }
}
