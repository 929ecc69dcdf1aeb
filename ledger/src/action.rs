//! Serializable form of the five operations.

use cryptobook_types::{AccountName, Asset};
use serde::{Deserialize, Serialize};

/// One ledger operation with its arguments.
///
/// In JSON the operation name sits in an `"action"` field next to the
/// arguments: `{"action": "stake", "owner": "alice", "quantity": "1.0000 CRW"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Create {
        issuer: AccountName,
        max_supply: Asset,
    },
    Issue {
        to: AccountName,
        quantity: Asset,
        #[serde(default)]
        memo: String,
    },
    Transfer {
        from: AccountName,
        to: AccountName,
        quantity: Asset,
        #[serde(default)]
        memo: String,
    },
    Stake {
        owner: AccountName,
        quantity: Asset,
    },
    Unstake {
        owner: AccountName,
        quantity: Asset,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create { .. } => "create",
            Action::Issue { .. } => "issue",
            Action::Transfer { .. } => "transfer",
            Action::Stake { .. } => "stake",
            Action::Unstake { .. } => "unstake",
        }
    }

    /// The identity whose authority this action needs, when it can be known
    /// without reading state. Issue needs the registry's issuer, so `None`.
    pub fn actor(&self, contract: AccountName) -> Option<AccountName> {
        match self {
            Action::Create { .. } => Some(contract),
            Action::Issue { .. } => None,
            Action::Transfer { from, .. } => Some(*from),
            Action::Stake { owner, .. } | Action::Unstake { owner, .. } => Some(*owner),
        }
    }
}

/// An action together with the identities that signed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAction {
    #[serde(default)]
    pub signers: Vec<AccountName>,
    #[serde(flatten)]
    pub action: Action,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tagged_json() {
        let json = r#"{"signers":["alice"],"action":"transfer","from":"alice","to":"bob","quantity":"300.0000 CRW","memo":"rent"}"#;
        let signed: SignedAction = serde_json::from_str(json).unwrap();
        assert_eq!(signed.signers, vec!["alice".parse::<AccountName>().unwrap()]);
        match signed.action {
            Action::Transfer { quantity, memo, .. } => {
                assert_eq!(quantity.to_string(), "300.0000 CRW");
                assert_eq!(memo, "rent");
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn memo_defaults_to_empty() {
        let json = r#"{"action":"issue","to":"alice","quantity":"1.0000 CRW"}"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert!(matches!(action, Action::Issue { ref memo, .. } if memo.is_empty()));
        assert_eq!(action.name(), "issue");
    }

    #[test]
    fn actor_is_natural_signer() {
        let contract: AccountName = "cryptobook".parse().unwrap();
        let alice: AccountName = "alice".parse().unwrap();
        let quantity: Asset = "1.0000 CRW".parse().unwrap();
        assert_eq!(
            Action::Create { issuer: alice, max_supply: quantity }.actor(contract),
            Some(contract)
        );
        assert_eq!(Action::Stake { owner: alice, quantity }.actor(contract), Some(alice));
        assert_eq!(
            Action::Issue { to: alice, quantity, memo: String::new() }.actor(contract),
            None
        );
    }
}
