//! Malformed streams surface as protocol errors.

use seqwire::{CodecOptions, CodecRegistry, Error, ErrorKind, Feed, Result};

fn chunk(len: u32, values: &[u32]) -> Vec<u8> {
    let mut bytes = len.to_le_bytes().to_vec();
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

#[test]
fn test_missing_terminator() {
    let registry = CodecRegistry::global();

    // A full stream minus its terminator.
    let mut bytes = registry.to_vec(&(0..5u32).collect::<Feed<_>>()).unwrap();
    bytes.truncate(bytes.len() - 4);

    let err = registry.from_slice::<Feed<u32>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::MissingTerminator { .. }));
    assert_eq!(err.kind(), ErrorKind::Protocol);

    // Nothing at all.
    let err = registry.from_slice::<Feed<u32>>(&[]).unwrap_err();
    assert!(matches!(err, Error::MissingTerminator { .. }));
}

#[test]
fn test_truncated_elements() {
    let registry = CodecRegistry::global();

    // Header promises three elements, only two follow.
    let bytes = chunk(3, &[1, 2]);
    let err = registry.from_slice::<Vec<u32>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));
    assert!(err.is_protocol());

    let err = registry.from_slice::<Feed<u32>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));

    // Header cut in half.
    let err = registry.from_slice::<Vec<u32>>(&[1, 0]).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));
}

#[test]
fn test_chunk_above_agreed_maximum() -> Result<()> {
    let strict = CodecRegistry::new(CodecOptions::default().with_max_chunk_len(4));

    let err = strict
        .from_slice::<Vec<u32>>(&chunk(5, &[0, 1, 2, 3, 4]))
        .unwrap_err();
    assert!(matches!(err, Error::ChunkTooLong { len: 5, max: 4 }));
    assert!(err.is_protocol());

    // Chunked streams are checked chunk by chunk.
    let mut bytes = chunk(4, &[0, 1, 2, 3]);
    bytes.extend(chunk(5, &[4, 5, 6, 7, 8]));
    bytes.extend(chunk(0, &[]));
    let err = strict.from_slice::<Feed<u32>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::ChunkTooLong { len: 5, .. }));

    // Within the limit everything decodes.
    let mut bytes = chunk(4, &[0, 1, 2, 3]);
    bytes.extend(chunk(1, &[4]));
    bytes.extend(chunk(0, &[]));
    let feed: Feed<u32> = strict.from_slice(&bytes)?;
    assert_eq!(feed.into_vec(), vec![0, 1, 2, 3, 4]);

    Ok(())
}

#[test]
fn test_oversized_header_does_not_preallocate() {
    // A hostile count fails on missing data, not on allocation.
    let err = CodecRegistry::global()
        .from_slice::<Vec<u64>>(&chunk(u32::MAX, &[]))
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));
}

#[test]
fn test_invalid_element_bytes() {
    let registry = CodecRegistry::global();

    let mut bytes = 2u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[1, 7]);
    let err = registry.from_slice::<Vec<bool>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::InvalidBool(7)));
    assert_eq!(err.kind(), ErrorKind::Data);

    let mut bytes = 1u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&[0xFF, 0xFE]);
    let err = registry.from_slice::<Vec<String>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::InvalidUtf8(_)));

    let mut bytes = 1u32.to_le_bytes().to_vec();
    bytes.push(9);
    let err = registry.from_slice::<Vec<Option<u8>>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::InvalidOptionTag(9)));
}

#[test]
fn test_trailing_data_after_terminator_is_left_alone() -> Result<()> {
    let registry = CodecRegistry::global();
    let mut bytes = chunk(2, &[10, 20]);
    bytes.extend(chunk(0, &[]));
    bytes.extend_from_slice(b"rest");

    let mut source = bytes.as_slice();
    let feed: Feed<u32> = registry.decode(&mut source)?;
    assert_eq!(feed.into_vec(), vec![10, 20]);
    assert_eq!(source, b"rest");

    Ok(())
}

#[test]
fn test_nested_collections_respect_registry_limits() -> Result<()> {
    let strict = CodecRegistry::new(CodecOptions::default().with_max_chunk_len(2));
    let lenient = CodecRegistry::global();

    let optional: Vec<Option<Vec<u32>>> = vec![Some(vec![1, 2, 3, 4, 5])];
    let bytes = lenient.to_vec(&optional)?;
    let err = strict
        .from_slice::<Vec<Option<Vec<u32>>>>(&bytes)
        .unwrap_err();
    assert!(matches!(err, Error::ChunkTooLong { len: 5, max: 2 }));

    let paired: Vec<(u8, Feed<u32>)> = vec![(1, (0..5).collect())];
    let bytes = lenient.to_vec(&paired)?;
    let err = strict.from_slice::<Vec<(u8, Feed<u32>)>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::ChunkTooLong { len: 5, max: 2 }));

    // Within the limit the nested values still decode.
    let small: Vec<Option<Vec<u32>>> = vec![Some(vec![1, 2]), None];
    assert_eq!(strict.from_slice::<Vec<Option<Vec<u32>>>>(&lenient.to_vec(&small)?)?, small);

    Ok(())
}

#[test]
fn test_hostile_string_length_does_not_preallocate() {
    let mut bytes = 1u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&u32::MAX.to_le_bytes());
    bytes.extend_from_slice(b"abc");

    let err = CodecRegistry::global()
        .from_slice::<Vec<String>>(&bytes)
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));
}

#[test]
fn test_long_string_spanning_read_blocks() -> Result<()> {
    let registry = CodecRegistry::global();
    let values: Vec<String> = vec!["x".repeat(10_000), String::new(), "yz".into()];
    assert_eq!(registry.from_slice::<Vec<String>>(&registry.to_vec(&values)?)?, values);
    Ok(())
}

#[cfg(target_pointer_width = "32")]
#[test]
fn test_pointer_sized_integers_out_of_range() {
    let registry = CodecRegistry::global();

    let mut bytes = 1u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&u64::MAX.to_le_bytes());
    let err = registry.from_slice::<Vec<usize>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::IntegerOutOfRange(_)));
    assert_eq!(err.kind(), ErrorKind::Data);

    let mut bytes = 1u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&i64::MIN.to_le_bytes());
    let err = registry.from_slice::<Vec<isize>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::IntegerOutOfRange(_)));
}

#[test]
fn test_pointer_sized_integer_extremes() -> Result<()> {
    let registry = CodecRegistry::global();
    let values: Vec<(usize, isize)> = vec![(usize::MAX, isize::MIN), (0, isize::MAX)];
    assert_eq!(registry.from_slice::<Vec<(usize, isize)>>(&registry.to_vec(&values)?)?, values);
    Ok(())
}
