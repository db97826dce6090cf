//! Behavior-driven tests for universe acquisition and loading
//!
//! These tests verify HOW the reference table behaves end to end: built from
//! index constituents, persisted as CSV, and loaded back for a run.

use std::io::Write;

use sectorscope_core::{MarketDataSource, Universe};
use sectorscope_tests::{instrument, ScriptedSource};

#[tokio::test]
async fn universe_built_from_index_constituents_round_trips_through_csv() {
    // Given: an index source listing constituents, one of them twice
    let source = ScriptedSource::new().with_constituents(vec![
        instrument("RELIANCE", "Oil Gas & Consumable Fuels"),
        instrument("HDFCBANK", "Financial Services"),
        instrument("RELIANCE", "Duplicate Listing"),
    ]);
    let constituents = source
        .index_constituents("NIFTY 500")
        .await
        .expect("index fetch succeeds");

    // When: the universe is assembled and persisted
    let universe = Universe::from_instruments(constituents);
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("universe.csv");
    universe.to_csv_path(&path).expect("table writes");

    // Then: duplicates kept their first occurrence and the file loads back
    assert_eq!(universe.len(), 2);
    let loaded = Universe::from_csv_path(&path).expect("table loads");
    assert_eq!(loaded, universe);
    assert_eq!(loaded.instruments()[0].sector, "Oil Gas & Consumable Fuels");
}

#[test]
fn rows_without_a_usable_symbol_are_skipped() {
    // Given: a table with a blank symbol and an index self-row
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "symbol,sector,nse_identifier").expect("header writes");
    writeln!(file, "INFY,Information Technology,INFYEQN").expect("row writes");
    writeln!(file, ",Ghost Sector,GHOSTEQN").expect("row writes");
    writeln!(file, "NIFTY 500,,NIFTY500").expect("row writes");

    // When: the table is loaded
    let universe = Universe::from_csv_path(file.path()).expect("table loads");

    // Then: only the real listing survives
    assert_eq!(universe.len(), 1);
    assert_eq!(universe.instruments()[0].symbol.as_str(), "INFY");
}

#[test]
fn missing_identifier_defaults_to_symbol_convention() {
    // Given: a row that omits the chart identifier
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "symbol,sector,nse_identifier").expect("header writes");
    writeln!(file, "TATAMOTORS,Automobile and Auto Components,").expect("row writes");

    // When: the table is loaded
    let universe = Universe::from_csv_path(file.path()).expect("table loads");

    // Then: the conventional identifier is derived from the symbol
    assert_eq!(universe.instruments()[0].identifier, "TATAMOTORSEQN");
}
