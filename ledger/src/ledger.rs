//! The five ledger operations and their shared balance helpers.

use cryptobook_store::{
    AccountBalance, AccountKey, CurrencyStats, LedgerStore, StakeRecord, StoreError,
};
use cryptobook_types::{AccountName, Asset, SymbolCode};

use crate::action::Action;
use crate::auth::AuthContext;
use crate::host::{AccountDirectory, Notifier, TransferNotice};
use crate::session::Session;
use crate::snapshot::LedgerSnapshot;
use crate::LedgerError;

/// Longest memo accepted by issue and transfer, in bytes.
pub const MAX_MEMO_BYTES: usize = 256;

/// A token ledger bound to a store and its host collaborators.
///
/// `contract` is the ledger's own identity: only it may create tokens.
pub struct Ledger<S, D, N> {
    contract: AccountName,
    store: S,
    directory: D,
    notifier: N,
}

impl<S, D, N> Ledger<S, D, N>
where
    S: LedgerStore,
    D: AccountDirectory,
    N: Notifier,
{
    pub fn new(contract: AccountName, store: S, directory: D, notifier: N) -> Self {
        Self {
            contract,
            store,
            directory,
            notifier,
        }
    }

    pub fn contract(&self) -> AccountName {
        self.contract
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Register a new token class with zero supply.
    pub fn create(
        &self,
        auth: &AuthContext,
        issuer: AccountName,
        max_supply: Asset,
    ) -> Result<(), LedgerError> {
        self.run("create", |session| {
            self.stage_create(session, auth, issuer, max_supply)
        })
    }

    /// Mint `quantity` into the issuer's balance, then forward it to `to`.
    pub fn issue(
        &self,
        auth: &AuthContext,
        to: AccountName,
        quantity: Asset,
        memo: &str,
    ) -> Result<(), LedgerError> {
        self.run("issue", |session| {
            self.stage_issue(session, auth, to, quantity, memo)
        })
    }

    pub fn transfer(
        &self,
        auth: &AuthContext,
        from: AccountName,
        to: AccountName,
        quantity: Asset,
        memo: &str,
    ) -> Result<(), LedgerError> {
        self.run("transfer", |session| {
            self.stage_transfer(session, auth, from, to, quantity, memo)
        })
    }

    /// Raise the locked amount of an existing stake row.
    ///
    /// The balance row is only read, never debited.
    pub fn stake(
        &self,
        auth: &AuthContext,
        owner: AccountName,
        quantity: Asset,
    ) -> Result<(), LedgerError> {
        self.run("stake", |session| {
            self.stage_stake(session, auth, owner, quantity)
        })
    }

    /// Lower the locked amount; the row is removed when it reaches zero.
    pub fn unstake(
        &self,
        auth: &AuthContext,
        owner: AccountName,
        quantity: Asset,
    ) -> Result<(), LedgerError> {
        self.run("unstake", |session| {
            self.stage_unstake(session, auth, owner, quantity)
        })
    }

    /// Dispatch a decoded action to its operation.
    pub fn apply(&self, auth: &AuthContext, action: &Action) -> Result<(), LedgerError> {
        match action {
            Action::Create { issuer, max_supply } => self.create(auth, *issuer, *max_supply),
            Action::Issue { to, quantity, memo } => self.issue(auth, *to, *quantity, memo),
            Action::Transfer {
                from,
                to,
                quantity,
                memo,
            } => self.transfer(auth, *from, *to, *quantity, memo),
            Action::Stake { owner, quantity } => self.stake(auth, *owner, *quantity),
            Action::Unstake { owner, quantity } => self.unstake(auth, *owner, *quantity),
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn stats(&self, code: &SymbolCode) -> Result<Option<CurrencyStats>, LedgerError> {
        Ok(self.store.get_stats(code)?)
    }

    pub fn balance(
        &self,
        owner: AccountName,
        code: SymbolCode,
    ) -> Result<Option<AccountBalance>, LedgerError> {
        Ok(self.store.get_balance(&AccountKey::new(owner, code))?)
    }

    pub fn stake_of(
        &self,
        owner: AccountName,
        code: SymbolCode,
    ) -> Result<Option<StakeRecord>, LedgerError> {
        Ok(self.store.get_stake(&AccountKey::new(owner, code))?)
    }

    pub fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        LedgerSnapshot::capture(&self.store)
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Run one operation as an atomic unit: stage, then write or discard.
    fn run<F>(&self, op: &'static str, stage: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut Session<'_, S>) -> Result<(), LedgerError>,
    {
        let mut session = Session::new(&self.store);
        if let Err(e) = stage(&mut session) {
            tracing::debug!(op, error = %e, "operation rejected");
            return Err(e);
        }
        let batch = session.into_batch();
        let rows = batch.len();
        self.store.write(batch)?;
        tracing::debug!(op, rows, "operation applied");
        Ok(())
    }

    fn stage_create(
        &self,
        session: &mut Session<'_, S>,
        auth: &AuthContext,
        issuer: AccountName,
        max_supply: Asset,
    ) -> Result<(), LedgerError> {
        auth.require_auth(&self.contract)?;
        check_symbol(&max_supply)?;
        if !max_supply.is_amount_within_range() {
            return Err(LedgerError::InvalidQuantity("invalid supply".into()));
        }
        if !max_supply.is_positive() {
            return Err(LedgerError::InvalidQuantity(
                "max_supply must be positive".into(),
            ));
        }
        let code = max_supply.code();
        if session.stats(&code)?.is_some() {
            return Err(LedgerError::AlreadyExists(code));
        }

        session.put_stats(CurrencyStats {
            supply: Asset::zero(max_supply.symbol),
            max_supply,
            issuer,
        });
        Ok(())
    }

    fn stage_issue(
        &self,
        session: &mut Session<'_, S>,
        auth: &AuthContext,
        to: AccountName,
        quantity: Asset,
        memo: &str,
    ) -> Result<(), LedgerError> {
        check_symbol(&quantity)?;
        check_memo(memo)?;
        let code = quantity.code();
        let mut stats = session
            .stats(&code)?
            .ok_or_else(|| LedgerError::NotFound(format!("token {code}")))?;

        auth.require_auth(&stats.issuer)?;
        check_quantity(&quantity, "issue")?;
        check_same_symbol(&quantity, &stats.supply)?;
        if quantity.amount > stats.headroom() {
            return Err(LedgerError::SupplyExceeded {
                requested: quantity,
                available: Asset::new(stats.headroom(), stats.supply.symbol),
            });
        }

        stats.supply = stats.supply.checked_add(&quantity)?;
        let issuer = stats.issuer;
        session.put_stats(stats);
        add_balance(session, issuer, quantity)?;

        if to != issuer {
            // Runs under the issuer's authority, which was required above.
            self.stage_transfer(session, auth, issuer, to, quantity, memo)?;
        }
        Ok(())
    }

    fn stage_transfer(
        &self,
        session: &mut Session<'_, S>,
        auth: &AuthContext,
        from: AccountName,
        to: AccountName,
        quantity: Asset,
        memo: &str,
    ) -> Result<(), LedgerError> {
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }
        auth.require_auth(&from)?;
        if !self.directory.exists(&to) {
            return Err(LedgerError::NotFound(format!("account {to}")));
        }
        let code = quantity.code();
        let stats = session
            .stats(&code)?
            .ok_or_else(|| LedgerError::NotFound(format!("token {code}")))?;

        // Counterparties hear about the attempt whether or not the checks
        // below pass.
        let notice = TransferNotice {
            from,
            to,
            quantity,
            memo: memo.to_string(),
        };
        self.notifier.notify(&from, &notice);
        self.notifier.notify(&to, &notice);

        check_quantity(&quantity, "transfer")?;
        check_same_symbol(&quantity, &stats.supply)?;
        check_memo(memo)?;

        sub_balance(session, from, quantity)?;
        add_balance(session, to, quantity)
    }

    fn stage_stake(
        &self,
        session: &mut Session<'_, S>,
        auth: &AuthContext,
        owner: AccountName,
        quantity: Asset,
    ) -> Result<(), LedgerError> {
        auth.require_auth(&owner)?;
        check_symbol(&quantity)?;
        check_quantity(&quantity, "stake")?;

        let key = AccountKey::new(owner, quantity.code());
        let balance = session
            .balance(&key)?
            .ok_or_else(|| LedgerError::NotFound(format!("balance {key}")))?;
        let stake = session
            .stake(&key)?
            .ok_or_else(|| LedgerError::NotFound(format!("stake {key}")))?;

        let locked = stake.locked_balance.checked_add(&quantity)?;
        check_same_symbol(&locked, &balance.balance)?;
        if balance.balance < locked {
            return Err(LedgerError::Overdrawn {
                needed: locked,
                available: balance.balance,
            });
        }

        session.put_stake(
            key,
            StakeRecord {
                locked_balance: locked,
            },
        );
        Ok(())
    }

    fn stage_unstake(
        &self,
        session: &mut Session<'_, S>,
        auth: &AuthContext,
        owner: AccountName,
        quantity: Asset,
    ) -> Result<(), LedgerError> {
        auth.require_auth(&owner)?;
        check_symbol(&quantity)?;
        check_quantity(&quantity, "unstake")?;

        let key = AccountKey::new(owner, quantity.code());
        let stake = session
            .stake(&key)?
            .ok_or_else(|| LedgerError::NotFound(format!("stake {key}")))?;
        check_same_symbol(&quantity, &stake.locked_balance)?;
        if stake.locked_balance < quantity {
            return Err(LedgerError::Overdrawn {
                needed: quantity,
                available: stake.locked_balance,
            });
        }

        if stake.locked_balance == quantity {
            session.delete_stake(key);
        } else {
            session.put_stake(
                key,
                StakeRecord {
                    locked_balance: stake.locked_balance.checked_sub(&quantity)?,
                },
            );
        }
        Ok(())
    }
}

// ── Shared validation and balance arithmetic ───────────────────────────

fn check_symbol(quantity: &Asset) -> Result<(), LedgerError> {
    if !quantity.symbol.is_valid() {
        return Err(LedgerError::InvalidSymbol(format!(
            "{:#x} is not a valid symbol",
            quantity.symbol.raw()
        )));
    }
    Ok(())
}

fn check_quantity(quantity: &Asset, verb: &str) -> Result<(), LedgerError> {
    if !quantity.is_amount_within_range() {
        return Err(LedgerError::InvalidQuantity("invalid quantity".into()));
    }
    if !quantity.is_positive() {
        return Err(LedgerError::InvalidQuantity(format!(
            "must {verb} positive quantity"
        )));
    }
    Ok(())
}

fn check_same_symbol(quantity: &Asset, expected: &Asset) -> Result<(), LedgerError> {
    if quantity.symbol != expected.symbol {
        return Err(LedgerError::InvalidQuantity(format!(
            "symbol precision mismatch: {} vs {}",
            quantity.symbol, expected.symbol
        )));
    }
    Ok(())
}

fn check_memo(memo: &str) -> Result<(), LedgerError> {
    if memo.len() > MAX_MEMO_BYTES {
        return Err(LedgerError::MemoTooLong(memo.len()));
    }
    Ok(())
}

fn sub_balance<S: LedgerStore + ?Sized>(
    session: &mut Session<'_, S>,
    owner: AccountName,
    value: Asset,
) -> Result<(), LedgerError> {
    let key = AccountKey::new(owner, value.code());
    let from = session
        .balance(&key)?
        .ok_or_else(|| LedgerError::NotFound(format!("balance {key}")))?;
    if from.balance.amount < value.amount {
        return Err(LedgerError::Overdrawn {
            needed: value,
            available: from.balance,
        });
    }
    session.put_balance(
        key,
        AccountBalance {
            balance: from.balance.checked_sub(&value)?,
        },
    );
    Ok(())
}

fn add_balance<S: LedgerStore + ?Sized>(
    session: &mut Session<'_, S>,
    owner: AccountName,
    value: Asset,
) -> Result<(), LedgerError> {
    let key = AccountKey::new(owner, value.code());
    let balance = match session.balance(&key)? {
        Some(existing) => existing.balance.checked_add(&value)?,
        None => value,
    };
    session.put_balance(key, AccountBalance { balance });
    Ok(())
}
