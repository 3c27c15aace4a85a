//! Loading a synthetic dataset with several workers at once.

#![cfg(feature = "parallel-load")]

use anyhow::Result;
use edgestream::testing::*;
use edgestream::*;

#[test]
fn parts_are_disjoint_and_cover_the_dataset() -> Result<()> {
    let edges = kron_edges(4, 4, 17);
    let (_tmp, dir) = mock_kron_dataset(4, 4, 12, &edges)?;
    let config = LoaderConfig {
        buffer_records: 5,
        ..LoaderConfig::default()
    };

    let results = load_parts_par(&dir, 8, Some(3), &config, |_| VecSink::default())?;
    assert_eq!(results.len(), 8);
    let mut joined = Vec::new();
    for (i, r) in results.into_iter().enumerate() {
        assert_eq!(r.part, i as u64 + 1);
        assert_eq!(r.report.edges, 8);
        assert_eq!(r.sink.reserved, Some(GraphStats::new(16, 8)));
        joined.extend(r.sink.edges);
    }
    assert_eq!(joined, edges);
    Ok(())
}

#[test]
fn uneven_split_fails_before_any_worker_runs() -> Result<()> {
    let (_tmp, dir) = mock_kron_dataset(3, 4, 10, &kron_edges(3, 4, 0))?;
    let err = load_parts_par(&dir, 5, None, &LoaderConfig::default(), |_| CountingSink::default())
        .unwrap_err();
    let load = err.downcast_ref::<LoadError>().expect("config error");
    assert!(matches!(load, LoadError::UnevenSplit { total: 32, parts: 5 }));
    Ok(())
}

#[test]
fn one_failing_part_fails_the_load() -> Result<()> {
    let (_tmp, dir) = mock_kron_dataset(3, 4, 8, &kron_edges(3, 4, 0))?;
    std::fs::remove_file(edgestream::io::glob::kron_shard_path(&dir, 3))?;
    let err = load_parts_par(&dir, 4, Some(2), &LoaderConfig::default(), |_| CountingSink::default())
        .unwrap_err();
    assert!(format!("{err:#}").contains("part 4/4"));
    Ok(())
}
