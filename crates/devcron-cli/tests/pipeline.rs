// The file → fold → delete → parse pipeline the binary runs before its loop.

use std::io::Write;

use devcron_core::{parse_crontab, text, TimeField};

#[test]
fn crontab_file_round_trips_through_the_pipeline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "# devcron delete --production\n\
         @weekly backup --production weekly\n\
         0,30 * * * * sync \\\n--production fast\n"
    )
    .unwrap();

    let raw = std::fs::read_to_string(file.path()).unwrap();
    let data = text::apply_deletions(&text::fold_lines(&raw));
    let entries = parse_crontab(&data).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].weekdays, TimeField::values([1]));
    assert_eq!(entries[1].minutes, TimeField::values([0, 30]));
    // The folded command lost its continuation marker and its deleted flag.
    assert_eq!(entries[1].to_string(), "0,30 * * * * sync  fast");
}

#[test]
fn malformed_files_never_reach_the_scheduler() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "* * * * * ok\n@hourly nope\n").unwrap();

    let raw = std::fs::read_to_string(file.path()).unwrap();
    assert!(parse_crontab(&text::fold_lines(&raw)).is_err());
}
