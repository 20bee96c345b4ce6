//! The archive format and the symmetric encode/decode pipelines.
//!
//! Layout, all fields bit-packed into one stream:
//!
//! | field              | size                              |
//! |--------------------|-----------------------------------|
//! | `total_symbols`    | 8 bytes, big-endian               |
//! | `extension_length` | 1 byte                            |
//! | extension          | `extension_length` bytes          |
//! | tree               | preorder topology, variable       |
//! | body               | symbol codes, zero-padded to byte |
//!
//! `total_symbols` is a token count, not a byte count; decoding is
//! governed by it because the trailing padding bits of the body are
//! indistinguishable from code bits.
//!
//! Both directions buffer the whole file in memory. That bounds usable
//! file size to available memory and keeps each operation a single
//! sequential pass.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::huffman::{CodeTable, HuffmanTree};
use crate::model::FrequencyTable;
use crate::tokenizer::{Symbol, Tokenizer};

/// Extension carried by archive files, without the dot.
pub const ARCHIVE_EXTENSION: &str = "huff";

/// Encode `data` into `sink` as a complete archive.
///
/// `extension` is the original file extension (without the dot) to
/// restore on decode; it may be empty. Fails with [`Error::EmptyInput`]
/// when tokenization yields no symbols. The bit writer is flushed on
/// every exit path, so even a failed encode leaves whole bytes behind;
/// a partial archive is still invalid and callers should remove it.
pub fn encode_stream<W: Write>(
    data: &[u8],
    extension: &str,
    tokenizer: &Tokenizer,
    sink: W,
) -> Result<()> {
    if extension.len() > u8::MAX as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "extension longer than 255 bytes",
        )
        .into());
    }

    let symbols = tokenizer.tokenize(data);
    if symbols.is_empty() {
        return Err(Error::EmptyInput);
    }
    let table = FrequencyTable::from_symbols(&symbols);
    let total_symbols = table.total_symbols();
    debug_assert_eq!(total_symbols, symbols.len() as u64);

    let tree = HuffmanTree::build(&table)?;
    let codes = tree.code_table();
    debug!(
        "encoding {} bytes as {} symbols ({} distinct)",
        data.len(),
        total_symbols,
        table.len(),
    );

    let mut bw = BitWriter::new(sink);
    match write_archive(&mut bw, total_symbols, extension, &tree, &symbols, &codes) {
        Ok(()) => bw.finish().map_err(Error::from),
        Err(err) => {
            let _ = bw.finish();
            Err(err)
        }
    }
}

fn write_archive<W: Write>(
    bw: &mut BitWriter<W>,
    total_symbols: u64,
    extension: &str,
    tree: &HuffmanTree,
    symbols: &[Symbol],
    codes: &CodeTable,
) -> Result<()> {
    for byte in total_symbols.to_be_bytes() {
        bw.write_byte(byte)?;
    }
    bw.write_byte(extension.len() as u8)?;
    for &byte in extension.as_bytes() {
        bw.write_byte(byte)?;
    }
    tree.write(bw)?;
    for symbol in symbols {
        let code = codes.get(symbol).ok_or(Error::UnknownSymbol)?;
        bw.write_bits(code)?;
    }
    Ok(())
}

/// Decode an archive from `source`, writing the original bytes to
/// `sink`.
///
/// Returns the stored original extension, possibly empty. A short read
/// inside the fixed-size header or the extension bytes is
/// [`Error::CorruptHeader`]; one inside the tree or the body is
/// [`Error::CorruptTree`].
pub fn decode_stream<R: Read, W: Write>(source: R, sink: &mut W) -> Result<String> {
    let mut br = BitReader::new(source);

    let mut header = [0u8; 8];
    for slot in &mut header {
        *slot = br.read_byte()?.ok_or(Error::CorruptHeader)?;
    }
    let total_symbols = u64::from_be_bytes(header);

    let extension_length = br.read_byte()?.ok_or(Error::CorruptHeader)?;
    let mut extension = Vec::with_capacity(extension_length as usize);
    for _ in 0..extension_length {
        extension.push(br.read_byte()?.ok_or(Error::CorruptHeader)?);
    }
    let extension = String::from_utf8_lossy(&extension).into_owned();

    let tree = HuffmanTree::read(&mut br)?;
    debug!(
        "decoding {} symbols, original extension {:?}",
        total_symbols, extension,
    );
    tree.decode_symbols(&mut br, total_symbols, sink)?;
    Ok(extension)
}

/// Compress the file at `input`, writing `<stem>.huff` beside it.
///
/// The input path is split at the last `.`; the part after it is stored
/// in the archive so [`decode_file`] can restore it. Returns the archive
/// path.
pub fn encode_file(input: &Path, tokenizer: &Tokenizer) -> Result<PathBuf> {
    let data = fs::read(input)?;
    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_owned();

    let archive_path = input.with_extension(ARCHIVE_EXTENSION);
    let sink = BufWriter::new(File::create(&archive_path)?);
    encode_stream(&data, &extension, tokenizer, sink)?;
    debug!(
        "wrote archive {} ({} bytes in)",
        archive_path.display(),
        data.len(),
    );
    Ok(archive_path)
}

/// Decompress the archive at `archive`, restoring the original file
/// beside it.
///
/// The path must carry the `.huff` extension ([`Error::Format`]
/// otherwise). The output path is the archive's stem joined with the
/// stored original extension, or the bare stem when none was stored.
/// Returns the output path. Nothing is written to it unless the whole
/// body decodes.
pub fn decode_file(archive: &Path) -> Result<PathBuf> {
    match archive.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext == ARCHIVE_EXTENSION => {}
        _ => return Err(Error::Format(archive.to_owned())),
    }

    let source = BufReader::new(File::open(archive)?);
    let mut data = Vec::new();
    let extension = decode_stream(source, &mut data)?;

    let output_path = if extension.is_empty() {
        archive.with_extension("")
    } else {
        archive.with_extension(extension.as_str())
    };
    fs::write(&output_path, &data)?;
    Ok(output_path)
}
