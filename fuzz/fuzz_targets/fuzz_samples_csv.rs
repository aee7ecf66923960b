#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header and row errors are fine; panics are not.
    if let Ok(table) = fleet_config::parse_samples_csv(data) {
        for row in &table.rows {
            assert!(!row.device_id.is_empty());
        }
    }
});
