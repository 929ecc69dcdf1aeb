//! LMDB environment setup.

use std::path::{Path, PathBuf};

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

const MAX_DBS: u32 = 3;

pub(crate) const STATS_DB: &str = "stats";
pub(crate) const BALANCES_DB: &str = "balances";
pub(crate) const STAKES_DB: &str = "stakes";

/// Wraps the LMDB environment and the three ledger table handles.
///
/// Implements every `cryptobook-store` trait, so it can back a ledger
/// directly.
pub struct LmdbEnvironment {
    pub(crate) env: Env,
    pub(crate) stats_db: Database<Bytes, Bytes>,
    pub(crate) balances_db: Database<Bytes, Bytes>,
    pub(crate) stakes_db: Database<Bytes, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path`, creating the directory
    /// and the three tables if they are missing.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path
        // and never through a second handle while it is alive.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let stats_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(STATS_DB))?;
        let balances_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(BALANCES_DB))?;
        let stakes_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(STAKES_DB))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened ledger store");

        Ok(Self {
            env,
            stats_db,
            balances_db,
            stakes_db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn env(&self) -> &Env {
        &self.env
    }
}
