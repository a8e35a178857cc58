//! Binary annotation stream.
//!
//! The stream is a sequence of little-endian 16-bit words, one per record,
//! holding `gap | (code << 10)` where `gap` is the distance in samples from
//! the previous record. A gap that does not fit the 10-bit field is written
//! as the extended marker `[0x00, 0xEC]` followed by an `i32` gap, after
//! which the record word carries only the code. The first record always uses
//! the extended form with its absolute offset. The stream ends with
//! `[0x00, 0x00]`.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::annotation::Annotation;
use crate::error::AnnotateError;
use crate::label::Label;

const EXTENDED: [u8; 2] = [0x00, 0xEC];
const EXTENDED_WORD: u16 = u16::from_le_bytes(EXTENDED);
const TERMINATOR: [u8; 2] = [0x00, 0x00];
const GAP_BITS: u16 = 10;
const MAX_SHORT_GAP: usize = (1 << GAP_BITS) - 1;

fn stream_error(err: std::io::Error) -> AnnotateError {
    AnnotateError::Stream {
        reason: err.to_string(),
    }
}

/// Encodes `annotations` onto `writer`.
///
/// # Errors
///
/// Fails when offsets decrease, when an offset exceeds `i32::MAX`, or when
/// the writer fails.
pub fn write_annotations<W: Write>(
    writer: &mut W,
    annotations: &[Annotation],
) -> Result<(), AnnotateError> {
    let mut previous = 0;
    for (index, a) in annotations.iter().enumerate() {
        if a.offset > i32::MAX as usize {
            return Err(AnnotateError::OffsetTooLarge { offset: a.offset });
        }
        if a.offset < previous {
            return Err(AnnotateError::UnsortedOffsets { index });
        }
        let gap = a.offset - previous;
        let code = u16::from(a.label.code()) << GAP_BITS;
        // A zero gap with code 0 would read back as the terminator.
        let extended = index == 0 || gap > MAX_SHORT_GAP || (gap == 0 && code == 0);
        let word = if extended {
            writer.write_all(&EXTENDED).map_err(stream_error)?;
            writer
                .write_all(&(gap as i32).to_le_bytes())
                .map_err(stream_error)?;
            code
        } else {
            gap as u16 | code
        };
        writer.write_all(&word.to_le_bytes()).map_err(stream_error)?;
        previous = a.offset;
    }
    writer.write_all(&TERMINATOR).map_err(stream_error)
}

fn read_array<R: Read, const N: usize>(
    reader: &mut R,
    index: usize,
) -> Result<[u8; N], AnnotateError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            AnnotateError::TruncatedStream { index }
        } else {
            stream_error(e)
        }
    })?;
    Ok(buf)
}

/// Decodes an annotation stream up to its terminator.
///
/// # Errors
///
/// Fails with [`AnnotateError::TruncatedStream`] when the data ends early,
/// [`AnnotateError::UnknownCode`] for a code outside the table, and
/// [`AnnotateError::UnsortedOffsets`] when a gap would make the offset
/// negative.
pub fn read_annotations<R: Read>(reader: &mut R) -> Result<Vec<Annotation>, AnnotateError> {
    let mut out = Vec::new();
    let mut previous: i64 = 0;
    loop {
        let index = out.len();
        let word = u16::from_le_bytes(read_array(reader, index)?);
        if word == 0 {
            break;
        }
        let (gap, word) = if word == EXTENDED_WORD {
            let gap = i32::from_le_bytes(read_array(reader, index)?);
            let word = u16::from_le_bytes(read_array(reader, index)?);
            (i64::from(gap), word)
        } else {
            (i64::from(word & MAX_SHORT_GAP as u16), word)
        };
        let code = word >> GAP_BITS;
        let label = u8::try_from(code)
            .ok()
            .and_then(Label::from_code)
            .ok_or(AnnotateError::UnknownCode { code, index })?;
        let offset = previous + gap;
        if offset < 0 {
            return Err(AnnotateError::UnsortedOffsets { index });
        }
        out.push(Annotation::new(offset as usize, label));
        previous = offset;
    }
    Ok(out)
}

/// Writes `annotations` to a new file at `path`.
pub fn save_annotations(
    path: impl AsRef<Path>,
    annotations: &[Annotation],
) -> Result<(), AnnotateError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| AnnotateError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    write_annotations(&mut writer, annotations)?;
    writer.flush().map_err(stream_error)?;
    debug!(path = %path.display(), records = annotations.len(), "annotations saved");
    Ok(())
}

/// Reads the annotation file at `path`.
pub fn load_annotations(path: impl AsRef<Path>) -> Result<Vec<Annotation>, AnnotateError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnnotateError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let list = read_annotations(&mut BufReader::new(file))?;
    debug!(path = %path.display(), records = list.len(), "annotations loaded");
    Ok(list)
}
