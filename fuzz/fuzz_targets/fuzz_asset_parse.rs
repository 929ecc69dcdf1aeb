#![no_main]

use cryptobook_types::{AccountName, Asset, Symbol, SymbolCode};
use libfuzzer_sys::fuzz_target;

// Parsing arbitrary text never panics, and whatever parses prints back to
// text that parses to the same value.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(asset) = text.parse::<Asset>() {
        let again: Asset = asset.to_string().parse().expect("canonical asset text");
        assert_eq!(again, asset);
    }
    if let Ok(symbol) = text.parse::<Symbol>() {
        assert!(symbol.is_valid());
        assert_eq!(symbol.to_string().parse::<Symbol>().ok(), Some(symbol));
    }
    if let Ok(code) = text.parse::<SymbolCode>() {
        assert_eq!(code.to_string(), text);
    }
    if let Ok(name) = text.parse::<AccountName>() {
        assert_eq!(name.to_string(), text);
    }
});
