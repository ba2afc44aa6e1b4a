//! Span utility functions for diagnostic rendering.

/// Compute 1-based line number from a byte offset.
pub fn line_from_offset(source: &str, offset: u32) -> u32 {
    let end = (offset as usize).min(source.len());
    let newlines = source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count();
    u32::try_from(newlines).map_or(u32::MAX, |n| n.saturating_add(1))
}

/// Compute 1-based (line, column) from a byte offset.
///
/// The column counts characters, not bytes.
pub fn offset_to_line_col(source: &str, offset: u32) -> (u32, u32) {
    let end = (offset as usize).min(source.len());
    let line_start = source[..end].rfind('\n').map_or(0, |i| i + 1);
    let col = source[line_start..end].chars().count();
    let col = u32::try_from(col).map_or(u32::MAX, |c| c.saturating_add(1));
    (line_from_offset(source, offset), col)
}

/// Text of the line containing `offset`, without its newline.
pub fn line_text(source: &str, offset: u32) -> &str {
    let offset = (offset as usize).min(source.len());
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = source[offset..].find('\n').map_or(source.len(), |i| offset + i);
    &source[start..end]
}
