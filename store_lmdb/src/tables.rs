//! `cryptobook-store` trait implementations over the LMDB tables.

use heed::types::Bytes;
use heed::Database;
use serde::de::DeserializeOwned;

use cryptobook_store::{
    AccountBalance, AccountKey, BalanceStore, BatchEntry, CurrencyStats, LedgerStore,
    StakeRecord, StakeStore, StatsStore, StoreError, WriteBatch,
};
use cryptobook_types::SymbolCode;

use crate::codec::{decode, decode_account_key, encode, stats_key};
use crate::environment::{BALANCES_DB, STAKES_DB};
use crate::{LmdbEnvironment, LmdbError};

impl LmdbEnvironment {
    fn get_record<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match db.get(&rtxn, key)? {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn iter_account_table<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        table: &'static str,
    ) -> Result<Vec<(AccountKey, T)>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let mut result = Vec::new();
        for entry in db.iter(&rtxn)? {
            let (key, val) = entry?;
            result.push((decode_account_key(table, key)?, decode(val)?));
        }
        Ok(result)
    }

    fn apply_batch(&self, batch: &WriteBatch) -> Result<(), LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        for stats in batch.stats() {
            self.stats_db
                .put(&mut wtxn, &stats_key(&stats.code()), &encode(stats)?)?;
        }
        for (key, balance) in batch.balances() {
            self.balances_db
                .put(&mut wtxn, &key.to_bytes(), &encode(balance)?)?;
        }
        for (key, entry) in batch.stakes() {
            match entry {
                BatchEntry::Put(record) => {
                    self.stakes_db
                        .put(&mut wtxn, &key.to_bytes(), &encode(record)?)?;
                }
                BatchEntry::Delete => {
                    self.stakes_db.delete(&mut wtxn, &key.to_bytes())?;
                }
            }
        }
        // Dropping the transaction on an earlier error aborts every put.
        wtxn.commit()?;
        Ok(())
    }
}

impl StatsStore for LmdbEnvironment {
    fn get_stats(&self, code: &SymbolCode) -> Result<Option<CurrencyStats>, StoreError> {
        Ok(self.get_record(self.stats_db, &stats_key(code))?)
    }

    fn iter_stats(&self) -> Result<Vec<CurrencyStats>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.stats_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut result = Vec::new();
        for entry in iter {
            let (_, val) = entry.map_err(LmdbError::from)?;
            result.push(decode(val)?);
        }
        Ok(result)
    }
}

impl BalanceStore for LmdbEnvironment {
    fn get_balance(&self, key: &AccountKey) -> Result<Option<AccountBalance>, StoreError> {
        Ok(self.get_record(self.balances_db, &key.to_bytes())?)
    }

    fn iter_balances(&self) -> Result<Vec<(AccountKey, AccountBalance)>, StoreError> {
        Ok(self.iter_account_table(self.balances_db, BALANCES_DB)?)
    }
}

impl StakeStore for LmdbEnvironment {
    fn get_stake(&self, key: &AccountKey) -> Result<Option<StakeRecord>, StoreError> {
        Ok(self.get_record(self.stakes_db, &key.to_bytes())?)
    }

    fn iter_stakes(&self) -> Result<Vec<(AccountKey, StakeRecord)>, StoreError> {
        Ok(self.iter_account_table(self.stakes_db, STAKES_DB)?)
    }
}

impl LedgerStore for LmdbEnvironment {
    fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let rows = batch.len();
        self.apply_batch(&batch)?;
        tracing::trace!(rows, "batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptobook_types::Asset;

    const MAP_SIZE: usize = 16 * 1024 * 1024;

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), MAP_SIZE).expect("open env");
        (dir, env)
    }

    fn key(owner: &str) -> AccountKey {
        AccountKey::new(owner.parse().unwrap(), "CRW".parse().unwrap())
    }

    fn asset(s: &str) -> Asset {
        s.parse().unwrap()
    }

    fn crw_stats(supply: &str) -> CurrencyStats {
        CurrencyStats {
            supply: asset(supply),
            max_supply: asset("10000.0000 CRW"),
            issuer: "cryptobook".parse().unwrap(),
        }
    }

    #[test]
    fn batch_write_then_read() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        batch.put_stats(crw_stats("5.0000 CRW"));
        batch.put_balance(
            key("alice"),
            AccountBalance {
                balance: asset("5.0000 CRW"),
            },
        );
        batch.put_stake(
            key("alice"),
            StakeRecord {
                locked_balance: asset("1.0000 CRW"),
            },
        );
        env.write(batch).unwrap();

        let code: SymbolCode = "CRW".parse().unwrap();
        assert_eq!(env.get_stats(&code).unwrap(), Some(crw_stats("5.0000 CRW")));
        assert_eq!(
            env.get_balance(&key("alice")).unwrap().map(|b| b.balance),
            Some(asset("5.0000 CRW"))
        );
        assert_eq!(
            env.get_stake(&key("alice")).unwrap().map(|s| s.locked_balance),
            Some(asset("1.0000 CRW"))
        );
        assert_eq!(env.get_balance(&key("bob")).unwrap(), None);
    }

    #[test]
    fn staged_delete_removes_stake_row() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        batch.put_stake(
            key("alice"),
            StakeRecord {
                locked_balance: asset("1.0000 CRW"),
            },
        );
        env.write(batch).unwrap();

        let mut batch = WriteBatch::new();
        batch.delete_stake(key("alice"));
        env.write(batch).unwrap();
        assert!(env.iter_stakes().unwrap().is_empty());
    }

    #[test]
    fn iteration_follows_key_order() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        for owner in ["carol", "alice", "bob"] {
            batch.put_balance(
                key(owner),
                AccountBalance {
                    balance: asset("1.0000 CRW"),
                },
            );
        }
        env.write(batch).unwrap();
        let owners: Vec<String> = env
            .iter_balances()
            .unwrap()
            .into_iter()
            .map(|(k, _)| k.owner.to_string())
            .collect();
        assert_eq!(owners, ["alice", "bob", "carol"]);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let env = LmdbEnvironment::open(dir.path(), MAP_SIZE).unwrap();
            let mut batch = WriteBatch::new();
            batch.put_stats(crw_stats("0.0000 CRW"));
            env.write(batch).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), MAP_SIZE).unwrap();
        assert_eq!(env.iter_stats().unwrap(), vec![crw_stats("0.0000 CRW")]);
    }
}
