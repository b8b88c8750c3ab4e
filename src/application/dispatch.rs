use super::engine::{HistoryEntry, WalletLedger};
use crate::error::{LedgerError, Result};
use std::fmt;
use std::str::FromStr;

/// Externally visible operation names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Init,
    InitWallet,
    Publish,
    Transfer,
    GetAccount,
    GetTxList,
}

impl Function {
    pub const fn name(self) -> &'static str {
        match self {
            Function::Init => "init",
            Function::InitWallet => "init_wallet",
            Function::Publish => "publish",
            Function::Transfer => "transfer",
            Function::GetAccount => "get_account",
            Function::GetTxList => "get_txList",
        }
    }
}

impl FromStr for Function {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let function = match s {
            "init" => Function::Init,
            "init_wallet" => Function::InitWallet,
            "publish" => Function::Publish,
            "transfer" => Function::Transfer,
            "get_account" => Function::GetAccount,
            "get_txList" => Function::GetTxList,
            other => return Err(LedgerError::UnknownFunction(other.to_string())),
        };
        Ok(function)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A function name plus its positional string arguments, as delivered by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub function: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(function: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function: function.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Empty,
    Text(String),
    History(Vec<HistoryEntry>),
}

impl Payload {
    /// Wire form of the payload; history is a JSON array.
    pub fn render(&self) -> Result<String> {
        match self {
            Payload::Empty => Ok(String::new()),
            Payload::Text(text) => Ok(text.clone()),
            Payload::History(entries) => Ok(serde_json::to_string(entries)?),
        }
    }
}

impl WalletLedger {
    /// Routes an invocation to the matching operation.
    pub async fn invoke(&self, invocation: &Invocation) -> Result<Payload> {
        let function: Function = invocation.function.parse()?;
        let args = invocation.args.as_slice();
        tracing::debug!(%function, ?args, "Invoke");

        match function {
            Function::Init => Ok(Payload::Empty),
            Function::InitWallet => self.create_wallet(args).await.map(|_| Payload::Empty),
            Function::Publish => self.mint(args).await.map(|_| Payload::Empty),
            Function::Transfer => self
                .transfer(args)
                .await
                .map(|receipt| Payload::Text(receipt.to_string())),
            Function::GetAccount => self.read_balance(args).await.map(Payload::Text),
            Function::GetTxList => self.read_history(args).await.map(Payload::History),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::infrastructure::in_memory::InMemoryLedgerStore;

    fn ledger() -> WalletLedger {
        let store = InMemoryLedgerStore::new();
        WalletLedger::new(
            Box::new(store.clone()),
            Box::new(store),
            LedgerConfig::default(),
        )
    }

    #[test]
    fn test_function_names_round_trip() {
        for function in [
            Function::Init,
            Function::InitWallet,
            Function::Publish,
            Function::Transfer,
            Function::GetAccount,
            Function::GetTxList,
        ] {
            assert_eq!(function.name().parse::<Function>().unwrap(), function);
        }
        assert!(matches!(
            "get_txlist".parse::<Function>(),
            Err(LedgerError::UnknownFunction(_))
        ));
    }

    #[tokio::test]
    async fn test_invoke_flow() {
        let ledger = ledger();

        let init = ledger.invoke(&Invocation::new("init", Vec::<String>::new())).await;
        assert_eq!(init.unwrap(), Payload::Empty);

        for account in ["admin", "alice", "bob"] {
            let created = ledger
                .invoke(&Invocation::new("init_wallet", [account, "admin", "20240101"]))
                .await
                .unwrap();
            assert_eq!(created, Payload::Empty);
        }
        ledger
            .invoke(&Invocation::new("publish", ["alice", "admin", "50", "20240102"]))
            .await
            .unwrap();

        let receipt = ledger
            .invoke(&Invocation::new("transfer", ["alice", "bob", "20", "1", "20240103"]))
            .await
            .unwrap();
        assert!(matches!(receipt, Payload::Text(ref id) if !id.is_empty()));

        let balance = ledger
            .invoke(&Invocation::new("get_account", ["bob"]))
            .await
            .unwrap();
        assert_eq!(balance, Payload::Text("20".to_string()));

        let history = ledger
            .invoke(&Invocation::new("get_txList", ["bob"]))
            .await
            .unwrap();
        let rendered: serde_json::Value =
            serde_json::from_str(&history.render().unwrap()).unwrap();
        let entries = rendered.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["value"]["balance"], 20);
        assert_eq!(entries[1]["value"]["txInfo"]["txType"], "2");
        assert_eq!(entries[1]["value"]["txInfo"]["trader"], "alice");
        assert_eq!(entries[1]["isDelete"], false);
        assert!(entries[1]["txId"].is_string());
    }

    #[tokio::test]
    async fn test_invoke_unknown_function() {
        let result = ledger()
            .invoke(&Invocation::new("delete_wallet", ["alice"]))
            .await;
        assert_eq!(result.unwrap_err().tag(), "UnknownFunction");
    }

    #[test]
    fn test_render() {
        assert_eq!(Payload::Empty.render().unwrap(), "");
        assert_eq!(Payload::Text("42".into()).render().unwrap(), "42");
        assert_eq!(Payload::History(vec![]).render().unwrap(), "[]");
    }
}
