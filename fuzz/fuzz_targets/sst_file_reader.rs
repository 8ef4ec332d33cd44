#![no_main]

// Feeds raw bytes to the reader as a table file. Opening, iterating and
// verifying may fail but must never panic.

use std::io::Write;

use libfuzzer_sys::fuzz_target;
use sst_harness::{Options, SstFileReader};

fuzz_target!(|data: &[u8]| {
    let Ok(mut file) = tempfile::NamedTempFile::new() else {
        return;
    };
    if file.write_all(data).and_then(|_| file.flush()).is_err() {
        return;
    }

    let Ok(reader) = SstFileReader::open(Options::default(), file.path()) else {
        return;
    };
    let _ = reader.verify_checksum();
    let _ = reader.verify_num_entries();
    let _ = reader.range_deletions();
    for entry in reader.iter() {
        if entry.is_err() {
            break;
        }
    }
});
