//! LMDB table integrity checks.
//!
//! Walks every row of the three tables and records problems instead of
//! stopping at the first one, so an operator sees the whole picture.

use std::collections::BTreeMap;

use heed::types::Bytes;
use heed::{Database, RoTxn};

use cryptobook_store::{AccountBalance, CurrencyStats, StakeRecord};
use cryptobook_types::{Asset, Symbol, SymbolCode};

use crate::codec::{decode, decode_account_key, decode_stats_key};
use crate::environment::{BALANCES_DB, STAKES_DB, STATS_DB};
use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check that every row decodes, sits under the key its content implies, and
/// uses the symbol registered for its code.
pub fn check_integrity(store: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = store.env.read_txn()?;

    let mut registry: BTreeMap<SymbolCode, Symbol> = BTreeMap::new();
    for entry in store.stats_db.iter(&rtxn)? {
        let (key, val) = entry?;
        report.total_entries += 1;
        let code = match decode_stats_key(key) {
            Ok(code) => code,
            Err(e) => {
                report.errors.push(e.to_string());
                continue;
            }
        };
        match decode::<CurrencyStats>(val) {
            Ok(stats) if stats.code() != code => report.errors.push(format!(
                "{STATS_DB}: row for {code} holds {}",
                stats.code()
            )),
            Ok(stats) => {
                if stats.supply > stats.max_supply {
                    report
                        .errors
                        .push(format!("{STATS_DB}: {code} supply above max supply"));
                }
                registry.insert(code, stats.supply.symbol);
            }
            Err(e) => report.errors.push(format!("{STATS_DB}: {code}: {e}")),
        }
    }

    check_account_table::<AccountBalance>(
        &rtxn,
        store.balances_db,
        BALANCES_DB,
        &registry,
        |b| b.balance,
        &mut report,
    )?;
    check_account_table::<StakeRecord>(
        &rtxn,
        store.stakes_db,
        STAKES_DB,
        &registry,
        |s| s.locked_balance,
        &mut report,
    )?;

    if report.is_healthy() {
        tracing::info!(entries = report.total_entries, "integrity check passed");
    } else {
        tracing::warn!(
            entries = report.total_entries,
            errors = report.errors.len(),
            "integrity check found problems"
        );
    }
    Ok(report)
}

fn check_account_table<T: serde::de::DeserializeOwned>(
    rtxn: &RoTxn,
    db: Database<Bytes, Bytes>,
    table: &'static str,
    registry: &BTreeMap<SymbolCode, Symbol>,
    amount_of: impl Fn(&T) -> Asset,
    report: &mut IntegrityReport,
) -> Result<(), LmdbError> {
    for entry in db.iter(rtxn)? {
        let (key, val) = entry?;
        report.total_entries += 1;
        let key = match decode_account_key(table, key) {
            Ok(key) => key,
            Err(e) => {
                report.errors.push(e.to_string());
                continue;
            }
        };
        let amount = match decode::<T>(val) {
            Ok(record) => amount_of(&record),
            Err(e) => {
                report.errors.push(format!("{table}: {key}: {e}"));
                continue;
            }
        };
        match registry.get(&key.code) {
            None => report
                .errors
                .push(format!("{table}: {key} has no registered token")),
            Some(symbol) if *symbol != amount.symbol => report.errors.push(format!(
                "{table}: {key} uses {} but the token is {symbol}",
                amount.symbol
            )),
            Some(_) if amount.amount < 0 => {
                report.errors.push(format!("{table}: {key} is negative"))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptobook_store::{AccountKey, LedgerStore, WriteBatch};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).expect("open env");
        (dir, env)
    }

    fn asset(s: &str) -> Asset {
        s.parse().unwrap()
    }

    #[test]
    fn empty_store_is_healthy() {
        let (_dir, env) = temp_env();
        let report = check_integrity(&env).unwrap();
        assert!(report.is_healthy());
        assert_eq!(report.total_entries, 0);
    }

    #[test]
    fn consistent_rows_pass() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        batch.put_stats(CurrencyStats {
            supply: asset("5.0000 CRW"),
            max_supply: asset("10.0000 CRW"),
            issuer: "cryptobook".parse().unwrap(),
        });
        batch.put_balance(
            AccountKey::new("alice".parse().unwrap(), "CRW".parse().unwrap()),
            AccountBalance {
                balance: asset("5.0000 CRW"),
            },
        );
        env.write(batch).unwrap();

        let report = check_integrity(&env).unwrap();
        assert!(report.is_healthy(), "{:?}", report.errors);
        assert_eq!(report.total_entries, 2);
    }

    #[test]
    fn orphan_and_mismatched_rows_are_reported() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        batch.put_stats(CurrencyStats {
            supply: asset("0.0000 CRW"),
            max_supply: asset("10.0000 CRW"),
            issuer: "cryptobook".parse().unwrap(),
        });
        // Wrong precision for CRW.
        batch.put_balance(
            AccountKey::new("alice".parse().unwrap(), "CRW".parse().unwrap()),
            AccountBalance {
                balance: asset("5.00 CRW"),
            },
        );
        // No XYZ token registered.
        batch.put_stake(
            AccountKey::new("bob".parse().unwrap(), "XYZ".parse().unwrap()),
            StakeRecord {
                locked_balance: asset("1 XYZ"),
            },
        );
        env.write(batch).unwrap();

        let report = check_integrity(&env).unwrap();
        assert_eq!(report.errors.len(), 2, "{:?}", report.errors);
        assert!(report.errors[0].starts_with("balances"));
        assert!(report.errors[1].starts_with("stakes"));
    }
}
