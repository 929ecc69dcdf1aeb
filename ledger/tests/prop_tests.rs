use proptest::prelude::*;

use cryptobook_ledger::{AuthContext, Ledger};
use cryptobook_nullables::{NullDirectory, NullNotifier, NullStore};
use cryptobook_store::{AccountKey, BalanceStore, LedgerStore, StakeRecord, StatsStore, WriteBatch};
use cryptobook_types::{AccountName, Asset, Symbol};

type TestLedger = Ledger<NullStore, NullDirectory, NullNotifier>;

const ACCOUNTS: [&str; 4] = ["cryptobook", "alice", "bob", "carol"];
const MAX_SUPPLY: i64 = 10_000_000_000;

fn name(s: &str) -> AccountName {
    s.parse().unwrap()
}

fn crw() -> Symbol {
    "4,CRW".parse().unwrap()
}

fn setup() -> TestLedger {
    let contract = name("cryptobook");
    let ledger = Ledger::new(
        contract,
        NullStore::new(),
        NullDirectory::with_accounts(&ACCOUNTS),
        NullNotifier::new(),
    );
    ledger
        .create(
            &AuthContext::single(contract),
            contract,
            Asset::new(MAX_SUPPLY, crw()),
        )
        .unwrap();
    ledger
}

fn total_held(ledger: &TestLedger) -> i64 {
    ledger
        .store()
        .iter_balances()
        .unwrap()
        .iter()
        .map(|(_, row)| row.balance.amount)
        .sum()
}

fn supply(ledger: &TestLedger) -> i64 {
    ledger
        .store()
        .get_stats(&crw().code())
        .unwrap()
        .unwrap()
        .supply
        .amount
}

#[derive(Clone, Debug)]
enum Op {
    Issue(usize, i64),
    Transfer(usize, usize, i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ACCOUNTS.len(), -10i64..MAX_SUPPLY / 4).prop_map(|(to, a)| Op::Issue(to, a)),
        (0..ACCOUNTS.len(), 0..ACCOUNTS.len(), -10i64..MAX_SUPPLY / 4)
            .prop_map(|(f, t, a)| Op::Transfer(f, t, a)),
    ]
}

proptest! {
    /// Supply always equals the sum of balances and never exceeds the maximum,
    /// whatever mix of accepted and rejected operations ran.
    #[test]
    fn supply_matches_balances(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let ledger = setup();
        let issuer = name("cryptobook");
        for op in ops {
            let _ = match op {
                Op::Issue(to, amount) => ledger.issue(
                    &AuthContext::single(issuer),
                    name(ACCOUNTS[to]),
                    Asset::new(amount, crw()),
                    "",
                ),
                Op::Transfer(from, to, amount) => {
                    let from = name(ACCOUNTS[from]);
                    ledger.transfer(
                        &AuthContext::single(from),
                        from,
                        name(ACCOUNTS[to]),
                        Asset::new(amount, crw()),
                        "",
                    )
                }
            };
            prop_assert_eq!(total_held(&ledger), supply(&ledger));
            prop_assert!(supply(&ledger) <= MAX_SUPPLY);
        }
    }

    /// A rejected transfer leaves every table exactly as it was.
    #[test]
    fn rejected_transfer_changes_nothing(
        issued in 1i64..10_000_000,
        extra in 1i64..10_000_000,
    ) {
        let ledger = setup();
        let issuer = name("cryptobook");
        ledger
            .issue(&AuthContext::single(issuer), name("alice"), Asset::new(issued, crw()), "")
            .unwrap();
        let before = ledger.snapshot().unwrap();

        let alice = name("alice");
        let result = ledger.transfer(
            &AuthContext::single(alice),
            alice,
            name("bob"),
            Asset::new(issued + extra, crw()),
            "",
        );
        prop_assert!(result.is_err());
        prop_assert_eq!(ledger.snapshot().unwrap().hash, before.hash);
    }

    /// Staking then unstaking the same amount restores the stake row, and an
    /// unstake of everything removes it.
    #[test]
    fn stake_unstake_round_trip(
        balance in 1i64..10_000_000,
        seed_pct in 0i64..=100,
        delta_pct in 1i64..=100,
    ) {
        let ledger = setup();
        let alice = name("alice");
        let auth = AuthContext::single(alice);
        ledger
            .issue(&AuthContext::single(name("cryptobook")), alice, Asset::new(balance, crw()), "")
            .unwrap();

        let mut batch = WriteBatch::new();
        batch.put_stake(
            AccountKey::new(alice, crw().code()),
            StakeRecord { locked_balance: Asset::zero(crw()) },
        );
        ledger.store().write(batch).unwrap();

        // A stake row that reaches zero is removed, so keep something locked.
        let seeded = (balance * seed_pct / 100).max(1);
        ledger.stake(&auth, alice, Asset::new(seeded, crw())).unwrap();
        let before = ledger.stake_of(alice, crw().code()).unwrap();

        let delta = ((balance - seeded) * delta_pct / 100).max(1);
        let staked = ledger.stake(&auth, alice, Asset::new(delta, crw()));
        if seeded + delta <= balance {
            prop_assert!(staked.is_ok());
            ledger.unstake(&auth, alice, Asset::new(delta, crw())).unwrap();
        } else {
            prop_assert!(staked.is_err());
        }
        prop_assert_eq!(ledger.stake_of(alice, crw().code()).unwrap(), before.clone());

        prop_assert_eq!(before.map(|s| s.locked_balance.amount), Some(seeded));
        ledger.unstake(&auth, alice, Asset::new(seeded, crw())).unwrap();
        prop_assert!(ledger.stake_of(alice, crw().code()).unwrap().is_none());
        let held = ledger.balance(alice, crw().code()).unwrap().map(|b| b.balance.amount);
        prop_assert_eq!(held, Some(balance));
    }
}
