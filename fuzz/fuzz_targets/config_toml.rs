#![no_main]

use libfuzzer_sys::fuzz_target;
use pacer::config::types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let parsed: Option<ConfigFile> = toml::from_str(input).ok();
        let applied = pacer::fuzzing::apply_config_from_toml(input);
        if applied.is_ok() {
            if let Some(config) = parsed {
                if let Some(workers) = config.workers {
                    debug_assert!(workers > 0);
                }
                if let Some(rate) = config.rate {
                    debug_assert!(rate.is_finite() && rate > 0.0);
                }
            }
        }
    }
});
