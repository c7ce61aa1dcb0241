//! List encoding: a list encodes as the concatenation of its elements'
//! encodings, in input order. Decoding walks the buffer until it is
//! consumed, letting each element determine its own size.

use crate::{Repr, Result};

/// Parse a concatenation of structures until the buffer is consumed.
pub fn parse_list<T: Repr>(mut buffer: &[u8]) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while !buffer.is_empty() {
        let item = T::parse(buffer)?;
        buffer = &buffer[item.buffer_len()..];
        items.push(item);
    }
    Ok(items)
}

/// Emit a concatenation of structures. The buffer must be sized by the
/// caller, e.g. with [`list_len`].
///
/// [`list_len`]: fn.list_len.html
pub fn emit_list<T: Repr>(items: &[T], buffer: &mut [u8]) -> Result<()> {
    let mut offset = 0;
    for item in items {
        item.emit(&mut buffer[offset..offset + item.buffer_len()])?;
        offset += item.buffer_len();
    }
    Ok(())
}

/// Return the total encoded length of a list.
pub fn list_len<T: Repr>(items: &[T]) -> usize {
    items.iter().map(T::buffer_len).sum()
}
