#![no_main]

use arbitrary::Arbitrary;
use cryptobook_ledger::{AuthContext, Ledger};
use cryptobook_nullables::{NullDirectory, NullNotifier, NullStore};
use cryptobook_store::{BalanceStore, StatsStore};
use cryptobook_types::{AccountName, Asset, Symbol};
use libfuzzer_sys::fuzz_target;

const ACCOUNTS: [&str; 3] = ["cryptobook", "alice", "bob"];

#[derive(Arbitrary, Debug)]
enum Op {
    Issue { to: u8, amount: i64 },
    Transfer { from: u8, to: u8, amount: i64 },
    Stake { owner: u8, amount: i64 },
    Unstake { owner: u8, amount: i64 },
}

fn account(index: u8) -> AccountName {
    ACCOUNTS[index as usize % ACCOUNTS.len()]
        .parse()
        .expect("static account name")
}

// Any sequence of operations keeps supply equal to the sum of balances and
// never above the maximum.
fuzz_target!(|ops: Vec<Op>| {
    let contract = account(0);
    let ledger = Ledger::new(
        contract,
        NullStore::new(),
        NullDirectory::with_accounts(&ACCOUNTS),
        NullNotifier::new(),
    );
    let symbol: Symbol = "4,CRW".parse().expect("static symbol");
    let max = Asset::new(10_000_000_000, symbol);
    ledger
        .create(&AuthContext::single(contract), contract, max)
        .expect("create");

    for op in ops {
        let _ = match op {
            Op::Issue { to, amount } => ledger.issue(
                &AuthContext::single(contract),
                account(to),
                Asset::new(amount, symbol),
                "",
            ),
            Op::Transfer { from, to, amount } => ledger.transfer(
                &AuthContext::single(account(from)),
                account(from),
                account(to),
                Asset::new(amount, symbol),
                "",
            ),
            Op::Stake { owner, amount } => ledger.stake(
                &AuthContext::single(account(owner)),
                account(owner),
                Asset::new(amount, symbol),
            ),
            Op::Unstake { owner, amount } => ledger.unstake(
                &AuthContext::single(account(owner)),
                account(owner),
                Asset::new(amount, symbol),
            ),
        };
    }

    let store = ledger.store();
    let stats = store
        .get_stats(&symbol.code())
        .expect("read stats")
        .expect("token exists");
    let held: i64 = store
        .iter_balances()
        .expect("read balances")
        .iter()
        .map(|(_, row)| row.balance.amount)
        .sum();
    assert_eq!(held, stats.supply.amount);
    assert!(stats.supply.amount <= stats.max_supply.amount);
});
