//! Embedded info store reader
//!
//! Image generators write their metadata as PNG text chunks: `tEXt`
//! (latin-1), `zTXt` (zlib-compressed latin-1) and `iTXt` (UTF-8, optionally
//! compressed). Other formats are still sniffed so that a file that is not an
//! image at all reports a decode error, but their store is empty.

use crate::error::MetadataError;
use bytes::Bytes;
use flate2::read::ZlibDecoder;
use image::{ImageFormat, ImageReader};
use img_parts::png::{Png, PngChunk};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};

/// Upper bound for one decompressed text chunk.
const MAX_TEXT_CHUNK_BYTES: u64 = 64 * 1024 * 1024;

/// Key/value text entries embedded in an image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoStore {
    entries: BTreeMap<String, String>,
}

impl InfoStore {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Later entries with the same key replace earlier ones.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read the info store of an encoded image.
pub fn read_info_store(data: &[u8]) -> Result<InfoStore, MetadataError> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| MetadataError::Decode("Cannot identify image file".to_string()))?;
    // Header only; pixel data is never decoded.
    reader.into_dimensions()?;

    if format != ImageFormat::Png {
        return Ok(InfoStore::default());
    }

    let png = Png::from_bytes(Bytes::copy_from_slice(data))
        .map_err(|e| MetadataError::Decode(e.to_string()))?;

    let mut store = InfoStore::default();
    for chunk in png.chunks() {
        let parsed = match &chunk.kind() {
            b"tEXt" => parse_text(chunk),
            b"zTXt" => parse_compressed_text(chunk),
            b"iTXt" => parse_international_text(chunk),
            _ => continue,
        };
        match parsed {
            Ok((key, value)) => store.insert(key, value),
            Err(e) => tracing::debug!(error = %e, "Skipping unreadable PNG text chunk"),
        }
    }
    Ok(store)
}

fn split_keyword<'a>(
    chunk: &'static str,
    contents: &'a [u8],
) -> Result<(String, &'a [u8]), MetadataError> {
    let nul = contents
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| malformed(chunk, "missing keyword terminator"))?;
    Ok((latin1(&contents[..nul]), &contents[nul + 1..]))
}

fn parse_text(chunk: &PngChunk) -> Result<(String, String), MetadataError> {
    let contents = chunk.contents();
    match split_keyword("tEXt", contents) {
        Ok((key, text)) => Ok((key, latin1(text))),
        // A keyword without a terminator still names an entry.
        Err(_) => Ok((latin1(contents), String::new())),
    }
}

fn parse_compressed_text(chunk: &PngChunk) -> Result<(String, String), MetadataError> {
    let (key, rest) = split_keyword("zTXt", chunk.contents())?;
    let (&method, compressed) = rest
        .split_first()
        .ok_or_else(|| malformed("zTXt", "missing compression method"))?;
    if method != 0 {
        return Err(malformed("zTXt", format!("unknown compression method {}", method)));
    }
    let text = inflate("zTXt", compressed)?;
    Ok((key, latin1(&text)))
}

fn parse_international_text(chunk: &PngChunk) -> Result<(String, String), MetadataError> {
    let (key, rest) = split_keyword("iTXt", chunk.contents())?;
    let [flag, method, rest @ ..] = rest else {
        return Err(malformed("iTXt", "missing compression fields"));
    };
    let (_language, rest) = split_keyword("iTXt", rest)?;
    let (_translated, text) = split_keyword("iTXt", rest)?;

    let raw = match (*flag, *method) {
        (0, _) => text.to_vec(),
        (1, 0) => inflate("iTXt", text)?,
        (1, m) => return Err(malformed("iTXt", format!("unknown compression method {}", m))),
        (f, _) => return Err(malformed("iTXt", format!("invalid compression flag {}", f))),
    };
    let value = String::from_utf8(raw).map_err(|e| malformed("iTXt", e.to_string()))?;
    Ok((key, value))
}

fn inflate(chunk: &'static str, compressed: &[u8]) -> Result<Vec<u8>, MetadataError> {
    let mut out = Vec::new();
    ZlibDecoder::new(compressed)
        .take(MAX_TEXT_CHUNK_BYTES)
        .read_to_end(&mut out)
        .map_err(|e| malformed(chunk, e.to_string()))?;
    Ok(out)
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn malformed(chunk: &'static str, reason: impl Into<String>) -> MetadataError {
    MetadataError::MalformedChunk {
        chunk,
        reason: reason.into(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use image::{Rgba, RgbaImage};
    use std::io::Write;

    pub fn blank_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 128, 255, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    /// Insert raw chunks just before `IEND`.
    pub fn png_with_chunks(chunks: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
        let mut png = Png::from_bytes(Bytes::from(blank_png())).unwrap();
        let at = png.chunks().len() - 1;
        for (offset, (kind, contents)) in chunks.into_iter().enumerate() {
            png.chunks_mut()
                .insert(at + offset, PngChunk::new(kind, Bytes::from(contents)));
        }
        png.encoder().bytes().to_vec()
    }

    pub fn text_chunk(key: &str, value: &str) -> ([u8; 4], Vec<u8>) {
        let mut contents = key.as_bytes().to_vec();
        contents.push(0);
        contents.extend_from_slice(value.as_bytes());
        (*b"tEXt", contents)
    }

    pub fn png_with_text(entries: &[(&str, &str)]) -> Vec<u8> {
        png_with_chunks(entries.iter().map(|(k, v)| text_chunk(k, v)).collect())
    }

    pub fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }
}
