//! Integration tests for the partitioned synthetic-dataset source.

use anyhow::Result;
use edgestream::io::glob::kron_shard_path;
use edgestream::io::window::SeekPlan;
use edgestream::testing::*;
use edgestream::*;
use std::fs;

#[test]
fn part_two_of_four_of_a_small_dataset() -> Result<()> {
    let edges = kron_edges(3, 4, 11);
    let (_tmp, dir) = mock_kron_dataset(3, 4, 10, &edges)?;

    let mut src = PartitionedSyntheticEdgeSource::open_part(&dir, 4, 2)?;
    assert_eq!(src.descriptor().total_nodes, 8);
    assert_eq!(src.descriptor().total_edges, 32);
    assert_eq!(src.slice(), EdgeSlice { begin: 8, length: 8 });
    assert_eq!(src.stats(), Some(GraphStats::new(8, 8)));

    let got = collect_edges(&mut src)?;
    assert_eq!(got.len(), 8);
    assert_eq!(got, edges[8..16]);
    assert_eq!(src.next_edge()?, None);
    Ok(())
}

#[test]
fn bound_source_never_leaves_its_slice() -> Result<()> {
    let edges = kron_edges(3, 4, 11);
    let (_tmp, dir) = mock_kron_dataset(3, 4, 10, &edges)?;
    let mut src = PartitionedSyntheticEdgeSource::open_part(&dir, 4, 2)?;

    // part 1 and part 3 belong to other workers
    assert!(!src.seek(0)?);
    assert!(!src.seek(7)?);
    assert!(!src.seek(16)?);
    assert_eq!(collect_edges(&mut src)?, edges[8..16]);

    // the window loaded at 12 reaches past 16, reading still stops there
    src.rewind()?;
    assert!(src.seek(12)?);
    assert!(src.cursor().window_begin + src.cursor().window_len as u64 > 16);
    assert_eq!(collect_edges(&mut src)?, edges[12..16]);
    assert!(!src.seek(20)?);
    assert_eq!(src.next_edge()?, None);
    Ok(())
}

#[test]
fn whole_dataset_reads_back_exactly() -> Result<()> {
    let edges = kron_edges(4, 3, 5);
    let (_tmp, dir) = mock_kron_dataset(4, 3, 7, &edges)?;
    let mut src = PartitionedSyntheticEdgeSource::open(&dir)?;
    assert_eq!(src.geometry().edges_per_shard, 7);
    assert_eq!(src.stats(), Some(GraphStats::new(16, 48)));
    assert_eq!(collect_edges(&mut src)?, edges);
    Ok(())
}

#[test]
fn all_parts_concatenate_to_the_dataset() -> Result<()> {
    let edges = kron_edges(3, 6, 2);
    let (_tmp, dir) = mock_kron_dataset(3, 6, 5, &edges)?;
    let mut joined = Vec::new();
    for part in 1..=6 {
        let mut src = PartitionedSyntheticEdgeSource::open_part(&dir, 6, part)?;
        joined.extend(collect_edges(&mut src)?);
    }
    assert_eq!(joined, edges);
    Ok(())
}

#[test]
fn rewind_returns_to_slice_start() -> Result<()> {
    let edges = kron_edges(3, 4, 3);
    let (_tmp, dir) = mock_kron_dataset(3, 4, 10, &edges)?;
    let mut src = PartitionedSyntheticEdgeSource::open_part(&dir, 2, 2)?;

    assert_eq!(src.next_edge()?, Some(edges[16]));
    assert_eq!(src.next_edge()?, Some(edges[17]));
    src.rewind()?;
    assert_eq!(src.cursor().consumed, 0);
    assert_eq!(collect_edges(&mut src)?, edges[16..32]);
    Ok(())
}

#[test]
fn config_errors_come_before_any_io() {
    // the directory does not exist; only the name is consulted
    let err = PartitionedSyntheticEdgeSource::open_part("/nowhere/kron-3-4", 5, 1).err().unwrap();
    assert!(matches!(err, LoadError::UnevenSplit { total: 32, parts: 5 }));
    assert_eq!(err.category(), ErrorCategory::Config);

    let err = PartitionedSyntheticEdgeSource::open_part("/nowhere/kron-3-4", 4, 5).err().unwrap();
    assert!(matches!(err, LoadError::PartOutOfBounds { part: 5, parts: 4 }));

    let err = PartitionedSyntheticEdgeSource::open_part("/nowhere/kron-3-4", 4, 1).err().unwrap();
    assert_eq!(err.category(), ErrorCategory::Io);
}

#[test]
fn unparsable_name_is_fatal() -> Result<()> {
    let tmp = TempDirPath::new()?;
    let dir = tmp.file_path("kronecker");
    fs::create_dir(&dir)?;
    fs::write(kron_shard_path(&dir, 0), [0u8; 16])?;
    let err = PartitionedSyntheticEdgeSource::open(&dir).err().unwrap();
    assert!(matches!(err, LoadError::DatasetName { .. }));
    assert_eq!(err.category(), ErrorCategory::Format);
    Ok(())
}

#[test]
fn misaligned_first_shard_is_a_format_error() -> Result<()> {
    let edges = kron_edges(3, 4, 0);
    let (_tmp, dir) = mock_kron_dataset(3, 4, 10, &edges)?;
    let first = kron_shard_path(&dir, 0);
    let mut bytes = fs::read(&first)?;
    bytes.pop();
    fs::write(&first, &bytes)?;

    let err = PartitionedSyntheticEdgeSource::open(&dir).err().unwrap();
    assert!(matches!(err, LoadError::PartialRecord { len: 159, .. }));
    Ok(())
}

#[test]
fn missing_shard_is_an_io_error_with_progress() -> Result<()> {
    let edges = kron_edges(3, 4, 0);
    let (_tmp, dir) = mock_kron_dataset(3, 4, 10, &edges)?;
    fs::remove_file(kron_shard_path(&dir, 2))?;

    let mut src = PartitionedSyntheticEdgeSource::open(&dir)?;
    for _ in 0..20 {
        src.next_edge()?;
    }
    match src.next_edge() {
        Err(LoadError::Io { path, delivered, .. }) => {
            assert_eq!(path, kron_shard_path(&dir, 2));
            assert_eq!(delivered, 20);
        }
        other => panic!("expected I/O error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn short_shard_is_a_layout_error() -> Result<()> {
    let edges = kron_edges(3, 4, 0);
    let (_tmp, dir) = mock_kron_dataset(3, 4, 10, &edges)?;
    let second = kron_shard_path(&dir, 1);
    let bytes = fs::read(&second)?;
    fs::write(&second, &bytes[..16 * 4])?;

    let mut src = PartitionedSyntheticEdgeSource::open(&dir)?;
    assert!(src.seek(3)?);
    let err = src.seek(12).unwrap_err();
    assert!(matches!(err, LoadError::Layout { .. }), "{err}");
    assert_eq!(err.category(), ErrorCategory::Format);
    Ok(())
}

#[test]
fn seek_past_end_is_a_no_op() -> Result<()> {
    let edges = kron_edges(3, 4, 9);
    let store = MemShardStore::from_edges(&edges, 10);
    let descriptor = KronDescriptor::parse("kron-3-4")?;
    let mut src = PartitionedSyntheticEdgeSource::with_store(descriptor, EdgeSlice::whole(32), store, 4)?;

    assert!(src.seek(5)?);
    assert!(!src.seek(32)?);
    assert!(!src.seek(u64::MAX)?);
    assert_eq!(src.next_edge()?, Some(edges[5]));
    Ok(())
}

#[test]
fn seeking_inside_the_window_does_no_io() -> Result<()> {
    let edges = kron_edges(3, 4, 9);
    let store = MemShardStore::from_edges(&edges, 10);
    let descriptor = KronDescriptor::parse("kron-3-4")?;
    let mut src = PartitionedSyntheticEdgeSource::with_store(descriptor, EdgeSlice::whole(32), store, 4)?;

    assert!(src.seek(12)?);
    assert_eq!(src.cursor().window_begin, 12);
    assert_eq!(src.cursor().window_len, 4);
    let plan = src.geometry().plan_seek(src.cursor(), 14);
    assert_eq!(plan, SeekPlan::Cached { cursor: 2 });

    let reads = src.store().reads();
    assert!(src.seek(14)?);
    assert!(src.seek(13)?);
    assert_eq!(src.next_edge()?, Some(edges[13]));
    assert_eq!(src.cursor().window_begin, 12);
    assert_eq!(src.store().reads(), reads);
    Ok(())
}

#[test]
fn reading_across_window_and_shard_boundaries_is_continuous() -> Result<()> {
    let edges = kron_edges(3, 4, 21);
    let descriptor = KronDescriptor::parse("kron-3-4")?;
    let store = MemShardStore::from_edges(&edges, 10);
    let mut src = PartitionedSyntheticEdgeSource::with_store(descriptor, EdgeSlice::whole(32), store, 3)?;

    // window of 3 starting at 7 ends at the shard 0 / shard 1 boundary
    assert!(src.seek(7)?);
    let got = collect_edges(&mut src)?;
    assert_eq!(got, edges[7..]);
    Ok(())
}

#[test]
fn slice_past_dataset_end_is_rejected() {
    let store = MemShardStore::from_edges(&kron_edges(3, 4, 0), 10);
    let descriptor = KronDescriptor::parse("kron-3-4").unwrap();
    let err = PartitionedSyntheticEdgeSource::with_store(descriptor, EdgeSlice { begin: 30, length: 4 }, store, 4)
        .err()
        .unwrap();
    assert!(matches!(err, LoadError::SliceOutOfRange { total: 32, .. }));
    assert_eq!(err.category(), ErrorCategory::Config);
}

#[test]
fn oversized_window_is_a_config_error() {
    let store = MemShardStore::from_edges(&kron_edges(3, 4, 0), 10);
    let descriptor = KronDescriptor::parse("kron-3-4").unwrap();
    let err = PartitionedSyntheticEdgeSource::with_store(descriptor, EdgeSlice::whole(32), store, usize::MAX)
        .err()
        .unwrap();
    assert!(matches!(err, LoadError::BufferTooLarge { records: usize::MAX, .. }));
    assert_eq!(err.category(), ErrorCategory::Config);
}

#[test]
fn window_capacity_is_capped_at_shard_size() -> Result<()> {
    let edges = kron_edges(3, 4, 4);
    let descriptor = KronDescriptor::parse("kron-3-4")?;
    let store = MemShardStore::from_edges(&edges, 8);
    let mut src = PartitionedSyntheticEdgeSource::with_store(descriptor, EdgeSlice::whole(32), store, 100)?;
    assert_eq!(src.geometry().capacity, 8);
    assert_eq!(collect_edges(&mut src)?, edges);
    // one full-shard window per shard
    assert_eq!(src.store().reads(), 4);
    assert_eq!(src.store().switches(), 3);
    Ok(())
}
