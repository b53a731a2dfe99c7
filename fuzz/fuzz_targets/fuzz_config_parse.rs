#![no_main]

use libfuzzer_sys::fuzz_target;
use tipwire_core::{Placement, TooltipConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = Placement::parse(text);

    // Anything that loads must also pass validation.
    if let Ok(config) = TooltipConfig::from_toml_str(text) {
        assert!(config.validate().is_empty());
    }
    if let Ok(config) = TooltipConfig::from_json_str(text) {
        assert!(config.validate().is_empty());
    }
});
