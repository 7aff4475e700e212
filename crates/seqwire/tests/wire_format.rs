//! Byte-level layout of encoded collections.

use std::collections::{BTreeSet, LinkedList, VecDeque};

use seqwire::{CHUNK_HEADER_SIZE, CodecOptions, CodecRegistry, Feed, MAX_CHUNK, Result};

/// Walks a chunked stream of `u32` elements and returns every chunk header,
/// checking each element against the running counter.
fn chunk_headers(bytes: &[u8]) -> Vec<u32> {
    let mut headers = vec![];
    let mut pos = 0;
    let mut expected = 0u32;
    loop {
        let header = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
        pos += CHUNK_HEADER_SIZE;
        headers.push(header);
        if header == 0 {
            break;
        }
        for _ in 0..header {
            let value = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
            assert_eq!(value, expected);
            expected += 1;
            pos += 4;
        }
    }
    assert_eq!(pos, bytes.len(), "trailing bytes after the terminator");
    headers
}

fn feed(len: u32) -> Feed<u32> {
    (0..len).collect()
}

#[test]
fn test_indexable_single_chunk() -> Result<()> {
    let bytes = CodecRegistry::global().to_vec(&vec![1i32, 2, 3])?;

    let mut expected = vec![];
    expected.extend_from_slice(&3u32.to_le_bytes());
    for v in [1i32, 2, 3] {
        expected.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(bytes, expected);

    let decoded: Vec<i32> = CodecRegistry::global().from_slice(&bytes)?;
    assert_eq!(decoded, vec![1, 2, 3]);

    Ok(())
}

#[test]
fn test_known_length_empty_has_no_terminator() -> Result<()> {
    let registry = CodecRegistry::global();

    assert_eq!(registry.to_vec(&Vec::<i32>::new())?, 0u32.to_le_bytes());
    assert_eq!(registry.to_vec(&VecDeque::<i32>::new())?, 0u32.to_le_bytes());
    assert_eq!(registry.to_vec(&LinkedList::<i32>::new())?, 0u32.to_le_bytes());

    // Decoding stops after the single header: the bytes that follow are untouched.
    let mut bytes = 0u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0xAA, 0xBB]);
    let mut source = bytes.as_slice();
    let decoded: Vec<i32> = registry.decode(&mut source)?;
    assert!(decoded.is_empty());
    assert_eq!(source, &[0xAA, 0xBB]);

    Ok(())
}

#[test]
fn test_sized_only_single_chunk() -> Result<()> {
    let list: LinkedList<u32> = (0..5).collect();
    let bytes = CodecRegistry::global().to_vec(&list)?;

    assert_eq!(bytes.len(), CHUNK_HEADER_SIZE + 5 * 4);
    assert_eq!(&bytes[..4], &5u32.to_le_bytes());

    let set: BTreeSet<u32> = (0..2000).collect();
    let bytes = CodecRegistry::global().to_vec(&set)?;
    assert_eq!(&bytes[..4], &2000u32.to_le_bytes());
    assert_eq!(bytes.len(), CHUNK_HEADER_SIZE + 2000 * 4);

    Ok(())
}

#[test]
fn test_bare_empty_is_single_terminator() -> Result<()> {
    let bytes = CodecRegistry::global().to_vec(&feed(0))?;
    assert_eq!(bytes, 0u32.to_le_bytes());
    assert_eq!(chunk_headers(&bytes), vec![0]);
    Ok(())
}

#[test]
fn test_bare_exact_multiple() -> Result<()> {
    let bytes = CodecRegistry::global().to_vec(&feed(1024))?;
    assert_eq!(chunk_headers(&bytes), vec![1024, 0]);

    let bytes = CodecRegistry::global().to_vec(&feed(2048))?;
    assert_eq!(chunk_headers(&bytes), vec![1024, 1024, 0]);
    Ok(())
}

#[test]
fn test_bare_partial_tail() -> Result<()> {
    let registry = CodecRegistry::global();

    assert_eq!(chunk_headers(&registry.to_vec(&feed(1))?), vec![1, 0]);
    assert_eq!(chunk_headers(&registry.to_vec(&feed(1023))?), vec![1023, 0]);
    assert_eq!(chunk_headers(&registry.to_vec(&feed(1025))?), vec![1024, 1, 0]);
    assert_eq!(
        chunk_headers(&registry.to_vec(&feed(2050))?),
        vec![1024, 1024, 2, 0]
    );

    Ok(())
}

#[test]
fn test_bare_round_trip_2050() -> Result<()> {
    let source = feed(2050);
    let bytes = CodecRegistry::global().to_vec(&source)?;
    assert_eq!(bytes.len(), 4 * CHUNK_HEADER_SIZE + 2050 * 4);

    let decoded: Feed<u32> = CodecRegistry::global().from_slice(&bytes)?;
    assert_eq!(decoded, source);
    Ok(())
}

#[test]
fn test_custom_max_chunk() -> Result<()> {
    let registry = CodecRegistry::new(CodecOptions::default().with_max_chunk(3));

    assert_eq!(chunk_headers(&registry.to_vec(&feed(7))?), vec![3, 3, 1, 0]);
    assert_eq!(chunk_headers(&registry.to_vec(&feed(6))?), vec![3, 3, 0]);

    let one = CodecRegistry::new(CodecOptions::default().with_max_chunk(1));
    assert_eq!(chunk_headers(&one.to_vec(&feed(3))?), vec![1, 1, 1, 0]);

    Ok(())
}

#[test]
fn test_decode_is_chunk_size_agnostic() -> Result<()> {
    let small = CodecRegistry::new(CodecOptions::default().with_max_chunk(5));
    let bytes = small.to_vec(&feed(12))?;
    assert_eq!(chunk_headers(&bytes), vec![5, 5, 2, 0]);

    // A reader with the default chunk size decodes it all the same.
    let decoded: Feed<u32> = CodecRegistry::global().from_slice(&bytes)?;
    assert_eq!(decoded, feed(12));
    assert_eq!(MAX_CHUNK, 1024);

    Ok(())
}

#[test]
fn test_registry_and_fresh_build_agree() -> Result<()> {
    let fresh = CodecRegistry::new(CodecOptions::default());
    let values: Vec<String> = vec!["a".into(), "bc".into(), String::new()];

    assert_eq!(
        fresh.to_vec(&values)?,
        CodecRegistry::global().to_vec(&values)?
    );
    assert_eq!(fresh.to_vec(&feed(1500))?, fresh.to_vec(&feed(1500))?);

    Ok(())
}

#[test]
fn test_largest_max_chunk_buffers_only_what_it_sees() -> Result<()> {
    let registry = CodecRegistry::new(CodecOptions::default().with_max_chunk(u32::MAX as usize));

    assert_eq!(chunk_headers(&registry.to_vec(&feed(3))?), vec![3, 0]);
    assert_eq!(chunk_headers(&registry.to_vec(&feed(5000))?), vec![5000, 0]);

    Ok(())
}

#[test]
fn test_nested_collections_follow_registry_max_chunk() -> Result<()> {
    let registry = CodecRegistry::new(CodecOptions::default().with_max_chunk(2));

    fn chunk(len: u32, values: &[u32]) -> Vec<u8> {
        let mut bytes = len.to_le_bytes().to_vec();
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }
    // [2] [1] [0] for a three-element feed with max_chunk = 2.
    let inner = [chunk(2, &[0, 1]), chunk(1, &[2]), chunk(0, &[])].concat();

    let through_option = registry.to_vec(&vec![Some(feed(3))])?;
    let expected = [chunk(1, &[]), vec![1], inner.clone()].concat();
    assert_eq!(through_option, expected);

    let through_tuple = registry.to_vec(&vec![(7u8, feed(3))])?;
    let expected = [chunk(1, &[]), vec![7], inner].concat();
    assert_eq!(through_tuple, expected);

    Ok(())
}
