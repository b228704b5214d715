/// Storage key for chunk `index` of `key`.
///
/// The index is always the text after the final `:`, so logical keys that
/// themselves contain `:` still map to distinct chunk keys.
pub fn chunk_key(key: &str, index: usize) -> String {
    format!("{}:{}", key, index)
}

/// Inverse of [`chunk_key`]
#[cfg(test)]
pub fn split_chunk_key(stored: &str) -> Option<(&str, usize)> {
    let (key, index) = stored.rsplit_once(':')?;
    Some((key, index.parse().ok()?))
}
