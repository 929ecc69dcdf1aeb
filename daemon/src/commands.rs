//! Command execution against an LMDB-backed ledger.

use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context};
use serde::Serialize;

use cryptobook_ledger::{Action, AuthContext, Ledger, SignedAction};
use cryptobook_store::{
    AccountKey, BalanceStore, LedgerStore, StakeRecord, StakeStore, StatsStore, WriteBatch,
};
use cryptobook_store_lmdb::{check_integrity, LmdbEnvironment};
use cryptobook_types::{AccountName, Asset, Symbol};

use crate::config::DaemonConfig;
use crate::host::{KnownAccounts, LogNotifier};
use crate::Command;

pub type CliLedger = Ledger<LmdbEnvironment, KnownAccounts, LogNotifier>;

pub fn open_ledger(config: &DaemonConfig) -> anyhow::Result<CliLedger> {
    let store = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;
    let directory = KnownAccounts::new(config.contract, config.accounts.iter().copied());
    tracing::debug!(
        contract = %config.contract,
        accounts = directory.len(),
        "ledger ready"
    );
    Ok(Ledger::new(config.contract, store, directory, LogNotifier))
}

pub(crate) fn run(ledger: &CliLedger, signers: &[AccountName], command: Command) -> anyhow::Result<()> {
    match command {
        Command::Create { issuer, max_supply } => {
            submit(ledger, signers, Action::Create { issuer, max_supply })
        }
        Command::Issue { to, quantity, memo } => {
            submit(ledger, signers, Action::Issue { to, quantity, memo })
        }
        Command::Transfer {
            from,
            to,
            quantity,
            memo,
        } => submit(
            ledger,
            signers,
            Action::Transfer {
                from,
                to,
                quantity,
                memo,
            },
        ),
        Command::Stake { owner, quantity } => {
            submit(ledger, signers, Action::Stake { owner, quantity })
        }
        Command::Unstake { owner, quantity } => {
            submit(ledger, signers, Action::Unstake { owner, quantity })
        }
        Command::Push { file } => push(ledger, &file),
        Command::OpenStake { owner, symbol } => open_stake(ledger.store(), owner, symbol),
        Command::Stats { symbol } => {
            let store = ledger.store();
            match symbol {
                Some(code) => print_json(&store.get_stats(&code)?),
                None => print_json(&store.iter_stats()?),
            }
        }
        Command::Balance { owner, symbol } => {
            let store = ledger.store();
            match symbol {
                Some(code) => print_json(&store.get_balance(&AccountKey::new(owner, code))?),
                None => {
                    let rows: Vec<_> = store
                        .iter_account_balances(&owner)?
                        .into_iter()
                        .map(|(_, row)| row)
                        .collect();
                    print_json(&rows)
                }
            }
        }
        Command::ShowStake { owner, symbol } => print_json(&ledger.stake_of(owner, symbol)?),
        Command::Snapshot { full } => {
            let snapshot = ledger.snapshot()?;
            if full {
                print_json(&snapshot)
            } else {
                println!("hash      {}", snapshot.hash_hex());
                println!("tokens    {}", snapshot.stats.len());
                println!("balances  {}", snapshot.balances.len());
                println!("stakes    {}", snapshot.stakes.len());
                Ok(())
            }
        }
        Command::Check => {
            let report = check_integrity(ledger.store())?;
            for error in &report.errors {
                println!("{error}");
            }
            if !report.is_healthy() {
                bail!("{} problem(s) in {} rows", report.errors.len(), report.total_entries);
            }
            println!("ok: {} rows", report.total_entries);
            Ok(())
        }
    }
}

/// Explicit signers win; otherwise the action's natural actor signs. For
/// Issue that is the token's registered issuer.
fn resolve_auth(
    ledger: &CliLedger,
    signers: &[AccountName],
    action: &Action,
) -> anyhow::Result<AuthContext> {
    if !signers.is_empty() {
        return Ok(AuthContext::new(signers.iter().copied()));
    }
    let actor = match (action.actor(ledger.contract()), action) {
        (Some(actor), _) => Some(actor),
        (None, Action::Issue { quantity, .. }) => issuer_of(ledger, quantity)?,
        (None, _) => None,
    };
    Ok(AuthContext::new(actor))
}

fn issuer_of(ledger: &CliLedger, quantity: &Asset) -> anyhow::Result<Option<AccountName>> {
    Ok(ledger.stats(&quantity.code())?.map(|stats| stats.issuer))
}

fn submit(ledger: &CliLedger, signers: &[AccountName], action: Action) -> anyhow::Result<()> {
    let auth = resolve_auth(ledger, signers, &action)?;
    ledger
        .apply(&auth, &action)
        .with_context(|| format!("{} rejected", action.name()))?;
    println!("{} applied", action.name());
    Ok(())
}

/// Each line is its own atomic unit. Stops at the first failure; earlier
/// lines stay applied.
fn push(ledger: &CliLedger, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening action file {}", path.display()))?;
    let mut applied = 0usize;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let lineno = index + 1;
        let line = line.with_context(|| format!("reading line {lineno}"))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let signed: SignedAction = serde_json::from_str(line)
            .with_context(|| format!("line {lineno}: malformed action"))?;
        let auth = resolve_auth(ledger, &signed.signers, &signed.action)?;
        ledger
            .apply(&auth, &signed.action)
            .with_context(|| format!("line {lineno}: {} rejected", signed.action.name()))?;
        applied += 1;
    }
    tracing::info!(applied, file = %path.display(), "action file applied");
    println!("{applied} action(s) applied");
    Ok(())
}

/// Seed the zero stake row the ledger needs before an owner's first stake.
fn open_stake(store: &LmdbEnvironment, owner: AccountName, symbol: Symbol) -> anyhow::Result<()> {
    let code = symbol.code();
    let stats = store
        .get_stats(&code)?
        .with_context(|| format!("token {code} does not exist"))?;
    if stats.supply.symbol != symbol {
        bail!("token {code} uses symbol {}, not {symbol}", stats.supply.symbol);
    }
    let key = AccountKey::new(owner, code);
    if store.get_stake(&key)?.is_some() {
        bail!("stake row {key} already exists");
    }

    let mut batch = WriteBatch::new();
    batch.put_stake(
        key,
        StakeRecord {
            locked_balance: Asset::zero(symbol),
        },
    );
    store.write(batch)?;
    tracing::info!(%key, "stake row opened");
    println!("stake row {key} opened");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
