//! Integration tests for the streaming digest engine

use bytes::Bytes;
use cubehash_core::progress::{FnProvider, NullProvider};
use cubehash_core::{
    CubeHashFactory, DigestEngine, FileSource, HashParameters, HasherFactory, MemorySource,
};
use cubehash_test_utils::{ContentPattern, MockByteSource, TestDataBuilder};
use proptest::prelude::*;
use std::sync::Mutex;
use tempfile::TempDir;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

#[tokio::test]
async fn test_abc_one_chunk_vs_three_chunks() {
    let engine = DigestEngine::default();
    let params = HashParameters::new(1, 512);

    let mut whole = MemorySource::from_chunks([&b"abc"[..]]);
    let mut split = MemorySource::from_chunks([&b"a"[..], &b"b"[..], &b"c"[..]]);

    let whole = engine
        .compute_file_digest(&mut whole, params, &NullProvider)
        .await
        .unwrap();
    let split = engine
        .compute_file_digest(&mut split, params, &NullProvider)
        .await
        .unwrap();

    assert_eq!(whole.digest, split.digest);
    assert_eq!(whole.digest.bits(), 512);
    assert_eq!(
        whole.digest,
        engine.compute_string_digest("abc", params).unwrap()
    );
}

proptest! {
    #[test]
    fn test_chunk_boundaries_do_not_change_digest(
        data in proptest::collection::vec(any::<u8>(), 0..600),
        chunk_size in 1usize..200,
        revision in 1u32..=3,
    ) {
        let engine = DigestEngine::default();
        let params = HashParameters::new(revision, 256);
        let expected = CubeHashFactory.hash_bytes(params, &data).unwrap();

        let mut source = MemorySource::new(Bytes::from(data), chunk_size);
        let record = block_on(engine.compute_file_digest(&mut source, params, &NullProvider)).unwrap();

        prop_assert_eq!(record.digest, expected);
        prop_assert!(source.is_released());
    }
}

#[tokio::test]
async fn test_progress_is_monotonic_and_bounded() {
    let engine = DigestEngine::default();
    let data = TestDataBuilder::new()
        .with_size(10_000)
        .with_pattern(ContentPattern::Random(3))
        .build();
    let chunk_size = 1024;
    let chunks = data.len().div_ceil(chunk_size);

    let seen = Mutex::new(Vec::new());
    let provider = FnProvider::new(|f| seen.lock().unwrap().push(f));
    let mut source = MemorySource::new(Bytes::from(data), chunk_size);
    engine
        .compute_file_digest(&mut source, HashParameters::default(), &provider)
        .await
        .unwrap();

    let seen = seen.into_inner().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.len() <= chunks);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert!(seen.iter().all(|f| (0.0..=1.0).contains(f)));
}

#[tokio::test]
async fn test_progress_is_clamped_when_source_overdelivers() {
    let engine = DigestEngine::default();
    let seen = Mutex::new(Vec::new());
    let provider = FnProvider::new(|f| seen.lock().unwrap().push(f));

    let mut source = MockByteSource::new([&b"abcd"[..], &b"efgh"[..]]).with_declared_size(5);
    engine
        .compute_file_digest(&mut source, HashParameters::default(), &provider)
        .await
        .unwrap();

    assert_eq!(seen.into_inner().unwrap(), vec![0.8, 1.0]);
}

#[tokio::test]
async fn test_chunked_digest_matches_known_answer() {
    let engine = DigestEngine::default();
    let mut source = MemorySource::from_chunks([&b"a"[..], &b"b"[..], &b"c"[..]]);

    let record = engine
        .compute_file_digest(&mut source, HashParameters::new(1, 512), &NullProvider)
        .await
        .unwrap();

    assert_eq!(
        record.digest.to_hex(),
        "f83d39f3f4213dbe240aa14740b214741163f37be49750cc9bf64aaa58be8f8a\
         dee7874186475cec08f7993ca7e35839291816ccc377d6173987eb95e355ee73"
    );
}

#[tokio::test]
async fn test_zero_byte_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.bin");
    std::fs::write(&path, b"").unwrap();

    let engine = DigestEngine::default();
    let params = HashParameters::new(3, 512);
    let seen = Mutex::new(Vec::new());
    let provider = FnProvider::new(|f| seen.lock().unwrap().push(f));

    let mut source = FileSource::open(&path, 4096).await.unwrap();
    let record = engine
        .compute_file_digest(&mut source, params, &provider)
        .await
        .unwrap();

    assert!(seen.into_inner().unwrap().is_empty());
    assert_eq!(record.source_size_bytes, Some(0));
    assert_eq!(record.digest, engine.compute_string_digest("", params).unwrap());
    assert!(source.is_released());
}

#[tokio::test]
async fn test_file_on_disk_matches_in_memory() {
    let dir = TempDir::new().unwrap();
    let builder = TestDataBuilder::small_file();
    let path = builder.write_to(dir.path(), "small.bin").unwrap();

    let engine = DigestEngine::default();
    let params = HashParameters::new(2, 384);

    let mut file = FileSource::open(&path, 1000).await.unwrap();
    let from_file = engine
        .compute_file_digest(&mut file, params, &NullProvider)
        .await
        .unwrap();
    let mut memory = builder.build_source(4096);
    let from_memory = engine
        .compute_file_digest(&mut memory, params, &NullProvider)
        .await
        .unwrap();

    assert_eq!(from_file.digest, from_memory.digest);
    assert_eq!(from_file.source_size_bytes, Some(10 * 1024));
}

#[tokio::test]
async fn test_read_failure_releases_source_and_yields_no_record() {
    let engine = DigestEngine::default();
    let mut source = MockByteSource::new([&b"ab"[..], &b"cd"[..], &b"ef"[..]]).failing_after(2);
    let releases = source.release_counter();

    let err = engine
        .compute_file_digest(&mut source, HashParameters::default(), &NullProvider)
        .await
        .unwrap_err();

    assert!(err.is_source_read());
    assert_eq!(releases.count(), 1);
    assert_eq!(source.reads(), 2);
}

#[tokio::test]
async fn test_invalid_parameters_fail_before_any_read() {
    let engine = DigestEngine::default();

    for params in [
        HashParameters::new(0, 512),
        HashParameters::new(4, 512),
        HashParameters::new(3, 0),
        HashParameters::new(3, 100),
        HashParameters::new(3, 520),
    ] {
        let mut source = MockByteSource::new([&b"abc"[..]]);
        let err = engine
            .compute_file_digest(&mut source, params, &NullProvider)
            .await
            .unwrap_err();

        assert!(err.is_invalid_parameters(), "{params} should be rejected");
        assert_eq!(source.reads(), 0);
        assert!(source.is_released());
    }
}

#[test]
fn test_empty_string_digest_is_deterministic() {
    let engine = DigestEngine::default();
    for bits in [8, 128, 256, 512] {
        let params = HashParameters::new(3, bits);
        let first = engine.compute_string_digest("", params).unwrap();
        let second = engine.compute_string_digest("", params).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.bits(), bits);
    }
}
