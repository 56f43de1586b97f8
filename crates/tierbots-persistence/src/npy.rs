//! A minimal reader/writer for the `.npy` dense-typed-array subset this
//! crate actually needs: `uint8` and `uint32`, 1-D or 2-D, C order, no
//! pickled objects. Not a full NumPy format implementation -- just the
//! standard uncompressed dense typed-array layout (dtype + shape header,
//! then raw bytes).

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::PersistenceError;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// A scalar type this module knows how to describe with a NumPy dtype
/// string and round-trip through little-endian bytes.
pub trait NpyScalar: Copy {
    const DESCR: &'static str;
    const ITEM_SIZE: usize;
    fn to_le_bytes(self) -> Vec<u8>;
    fn from_le_bytes(bytes: &[u8]) -> Self;
}

impl NpyScalar for u8 {
    const DESCR: &'static str = "|u1";
    const ITEM_SIZE: usize = 1;
    fn to_le_bytes(self) -> Vec<u8> {
        vec![self]
    }
    fn from_le_bytes(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl NpyScalar for u32 {
    const DESCR: &'static str = "<u4";
    const ITEM_SIZE: usize = 4;
    fn to_le_bytes(self) -> Vec<u8> {
        u32::to_le_bytes(self).to_vec()
    }
    fn from_le_bytes(bytes: &[u8]) -> Self {
        u32::from_le_bytes(bytes.try_into().unwrap())
    }
}

fn build_header(descr: &str, shape: &[usize]) -> Vec<u8> {
    let shape_str = match shape {
        [n] => format!("({},)", n),
        [w, h] => format!("({}, {})", w, h),
        _ => unreachable!("only 1-D and 2-D arrays are persisted"),
    };
    let dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        descr, shape_str
    );
    let prefix_len = 10; // magic(6) + version(2) + header_len(2)
    let unpadded = prefix_len + dict.len() + 1; // + trailing newline
    let padded = unpadded.div_ceil(64) * 64;
    let pad = padded - unpadded;
    let mut header = dict;
    header.push_str(&" ".repeat(pad));
    header.push('\n');

    let mut out = Vec::with_capacity(prefix_len + header.len());
    out.extend_from_slice(MAGIC);
    out.push(1); // major version
    out.push(0); // minor version
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    out
}

fn write_array<T: NpyScalar>(path: &Path, shape: &[usize], data: &[T]) -> io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(&build_header(T::DESCR, shape))?;
    let mut buf = Vec::with_capacity(data.len() * T::ITEM_SIZE);
    for &v in data {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    f.write_all(&buf)?;
    Ok(())
}

/// Parses a value out of `'key': <value>,` inside the header dict string,
/// stopping at the first top-level separator (`,` outside parens/quotes).
fn extract(dict: &str, key: &str) -> Option<String> {
    let needle = format!("'{}':", key);
    let start = dict.find(&needle)? + needle.len();
    let rest = dict[start..].trim_start();
    let mut depth = 0i32;
    let mut end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    Some(rest[..end].trim().to_string())
}

fn read_array<T: NpyScalar>(path: &Path) -> Result<(Vec<usize>, Vec<T>), PersistenceError> {
    let mut f = File::open(path)?;
    let mut magic = [0u8; 6];
    f.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(PersistenceError::MalformedNpy(
            "bad magic prefix".to_string(),
        ));
    }
    let mut version = [0u8; 2];
    f.read_exact(&mut version)?;
    let header_len = if version[0] == 1 {
        let mut b = [0u8; 2];
        f.read_exact(&mut b)?;
        u16::from_le_bytes(b) as usize
    } else {
        let mut b = [0u8; 4];
        f.read_exact(&mut b)?;
        u32::from_le_bytes(b) as usize
    };
    let mut header_bytes = vec![0u8; header_len];
    f.read_exact(&mut header_bytes)?;
    let header = String::from_utf8_lossy(&header_bytes);

    let descr = extract(&header, "descr")
        .ok_or_else(|| PersistenceError::MalformedNpy("missing descr".to_string()))?;
    let descr = descr.trim_matches('\'');
    if descr != T::DESCR {
        return Err(PersistenceError::MalformedNpy(format!(
            "dtype mismatch: expected {}, found {descr}",
            T::DESCR
        )));
    }
    let shape_str = extract(&header, "shape")
        .ok_or_else(|| PersistenceError::MalformedNpy("missing shape".to_string()))?;
    let shape: Vec<usize> = shape_str
        .trim_matches(|c| c == '(' || c == ')')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|e| PersistenceError::MalformedNpy(e.to_string()))?;

    let mut rest = Vec::new();
    f.read_to_end(&mut rest)?;
    let count: usize = shape.iter().product();
    if rest.len() != count * T::ITEM_SIZE {
        return Err(PersistenceError::MalformedNpy(
            "payload length does not match shape".to_string(),
        ));
    }
    let values = rest
        .chunks_exact(T::ITEM_SIZE)
        .map(T::from_le_bytes)
        .collect();
    Ok((shape, values))
}

/// Writes a `Grid`'s backing buffer as a 2-D array. `tierbots_common::Grid`
/// stores `(x, y)` at offset `x + y * width` -- a C-order array of shape
/// `(height, width)`, i.e. row `y`, column `x`. The shape is recorded in
/// that order so the file is a faithful, directly re-loadable description
/// of the exact bytes on disk.
pub fn write_2d<T: NpyScalar>(path: &Path, width: u32, height: u32, data: &[T]) -> io::Result<()> {
    write_array(path, &[height as usize, width as usize], data)
}

pub fn read_2d<T: NpyScalar>(path: &Path) -> Result<(u32, u32, Vec<T>), PersistenceError> {
    let (shape, data) = read_array(path)?;
    if shape.len() != 2 {
        return Err(PersistenceError::MalformedNpy(
            "expected a 2-D array".to_string(),
        ));
    }
    Ok((shape[1] as u32, shape[0] as u32, data))
}

pub fn write_1d<T: NpyScalar>(path: &Path, data: &[T]) -> io::Result<()> {
    write_array(path, &[data.len()], data)
}

pub fn read_1d<T: NpyScalar>(path: &Path) -> Result<Vec<T>, PersistenceError> {
    let (shape, data) = read_array(path)?;
    if shape.len() != 1 {
        return Err(PersistenceError::MalformedNpy(
            "expected a 1-D array".to_string(),
        ));
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_1d_u32() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.npy");
        let data: Vec<u32> = vec![0, 1, 2, 300, 70000];
        write_1d(&path, &data).unwrap();
        let back: Vec<u32> = read_1d(&path).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn roundtrip_2d_u8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.npy");
        let data: Vec<u8> = (0..20).collect();
        write_2d(&path, 4, 5, &data).unwrap();
        let (w, h, back) = read_2d::<u8>(&path).unwrap();
        assert_eq!((w, h), (4, 5));
        assert_eq!(back, data);
    }

    #[test]
    fn rejects_dtype_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.npy");
        write_1d(&path, &vec![1u32, 2, 3]).unwrap();
        let err = read_1d::<u8>(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::MalformedNpy(_)));
    }
}
