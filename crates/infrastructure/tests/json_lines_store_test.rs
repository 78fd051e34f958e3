use mesh_dns_application::ports::HostRecordSource;
use mesh_dns_domain::StoreError;
use mesh_dns_infrastructure::store::JsonLinesHostStore;

mod helpers;
use helpers::{write_store, CapturedLogs};

#[test]
fn test_reads_records_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    write_store(
        dir.path(),
        &[
            r#"{"hostname":"a.mesh","ips":["fd00::a"]}"#,
            r#"{"hostname":"b.mesh","ips":["fd00::b","fd00::bb"]}"#,
        ],
    );
    let store = JsonLinesHostStore::new(dir.path());

    let records: Vec<_> = store.open().unwrap().collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].hostname, "a.mesh");
    assert_eq!(records[1].addresses, vec!["fd00::b", "fd00::bb"]);
}

#[test]
fn test_location_is_dns_json_in_state_dir() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonLinesHostStore::new(dir.path());

    assert_eq!(store.location(), dir.path().join("dns.json"));
}

#[test]
fn test_missing_file_is_logged_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonLinesHostStore::new(dir.path());
    let logs = CapturedLogs::default();

    let result = logs.capture(|| store.open().map(|records| records.count()));

    let expected = dir.path().join("dns.json");
    assert!(matches!(result, Err(StoreError::NotFound { ref path }) if *path == expected));
    let output = logs.contents();
    assert!(output.contains(&expected.display().to_string()));
    assert!(output.contains("not found"));
}

#[test]
fn test_malformed_line_is_logged_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_store(
        dir.path(),
        &[
            r#"{"hostname":"a.mesh","ips":["fd00::a"]}"#,
            r#"{"hostname": 42}"#,
            r#"{"hostname":"c.mesh","ips":["fd00::c"]}"#,
        ],
    );
    let store = JsonLinesHostStore::new(dir.path());
    let logs = CapturedLogs::default();

    let hostnames: Vec<String> = logs.capture(|| {
        store
            .open()
            .unwrap()
            .map(|record| record.hostname)
            .collect()
    });

    assert_eq!(hostnames, vec!["a.mesh", "c.mesh"]);
    assert!(logs.contents().contains("Error parsing mesh store line"));
}

#[test]
fn test_record_without_ips_has_no_addresses() {
    let dir = tempfile::tempdir().unwrap();
    write_store(dir.path(), &[r#"{"hostname":"bare.mesh"}"#]);
    let store = JsonLinesHostStore::new(dir.path());

    let records: Vec<_> = store.open().unwrap().collect();

    assert_eq!(records.len(), 1);
    assert!(records[0].addresses.is_empty());
}

#[test]
fn test_unknown_fields_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_store(
        dir.path(),
        &[r#"{"hostname":"peer.mesh","ips":["fd00::1"],"signature":"abc","expires":1700000000}"#],
    );
    let store = JsonLinesHostStore::new(dir.path());

    let records: Vec<_> = store.open().unwrap().collect();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hostname, "peer.mesh");
}

#[test]
fn test_file_is_reopened_on_every_read() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonLinesHostStore::new(dir.path());
    assert!(store.open().is_err());

    write_store(dir.path(), &[r#"{"hostname":"late.mesh","ips":["fd00::1"]}"#]);

    assert_eq!(store.open().unwrap().count(), 1);
}
