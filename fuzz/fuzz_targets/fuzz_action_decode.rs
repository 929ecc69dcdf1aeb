#![no_main]

use cryptobook_ledger::SignedAction;
use cryptobook_store::{AccountBalance, CurrencyStats, StakeRecord};
use libfuzzer_sys::fuzz_target;

// Decoding untrusted action JSON and stored record bytes never panics.
fuzz_target!(|data: &[u8]| {
    if let Ok(signed) = serde_json::from_slice::<SignedAction>(data) {
        let json = serde_json::to_string(&signed).expect("decoded action re-encodes");
        let again: SignedAction = serde_json::from_str(&json).expect("re-encoded action decodes");
        assert_eq!(again, signed);
    }

    let _ = bincode::deserialize::<CurrencyStats>(data);
    let _ = bincode::deserialize::<AccountBalance>(data);
    let _ = bincode::deserialize::<StakeRecord>(data);
});
