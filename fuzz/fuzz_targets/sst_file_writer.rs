#![no_main]

// Generates operation sequences, normalizes them, writes them with
// SstFileWriter, reopens the file with SstFileReader and verifies its
// checksums. Any engine failure aborts, so the input is kept as a crash.

use libfuzzer_sys::fuzz_target;
use sst_harness::{OperationSequence, fuzz_one};

fuzz_target!(
    init: {
        let _ = sst_harness::log::init_from_env();
    },
    |input: OperationSequence| {
        fuzz_one(input);
    }
);
