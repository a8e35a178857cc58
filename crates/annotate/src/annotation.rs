//! The annotation record.

use crate::error::AnnotateError;
use crate::label::Label;

/// One labelled sample position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Annotation {
    /// Sample index into the analysed signal.
    pub offset: usize,
    /// What happens at `offset`.
    pub label: Label,
    /// Auxiliary index; unused by detection.
    pub aux: Option<u32>,
}

impl Annotation {
    /// Creates an annotation without auxiliary data.
    pub fn new(offset: usize, label: Label) -> Self {
        Self {
            offset,
            label,
            aux: None,
        }
    }
}

/// Shifts every offset by `delta`, or fails without touching the list.
pub(crate) fn shift_offsets(
    annotations: &mut [Annotation],
    delta: i64,
) -> Result<(), AnnotateError> {
    let shifted = annotations
        .iter()
        .map(|a| {
            let target = a.offset as i64 + delta;
            if target < 0 {
                Err(AnnotateError::OffsetUnderflow {
                    offset: a.offset,
                    delta,
                })
            } else {
                Ok(target as usize)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    for (a, offset) in annotations.iter_mut().zip(shifted) {
        a.offset = offset;
    }
    Ok(())
}
