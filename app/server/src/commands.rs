//! Wallet commands
//!
//! The NIP-47 methods this VASP integration honors. Incoming wallet requests
//! are gated against the configured list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{ConfigError, ConfigResult};

/// NIP-47 error code for a known method the wallet does not serve.
pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
/// NIP-47 catch-all error code.
pub const OTHER: &str = "OTHER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NwcCommand {
    PayInvoice,
    MakeInvoice,
    LookupInvoice,
    GetBalance,
    GetBudget,
    GetInfo,
    ListTransactions,
    PayKeysend,
    LookupUser,
    FetchQuote,
    ExecuteQuote,
    PayToAddress,
}

impl NwcCommand {
    pub const ALL: [NwcCommand; 12] = [
        NwcCommand::PayInvoice,
        NwcCommand::MakeInvoice,
        NwcCommand::LookupInvoice,
        NwcCommand::GetBalance,
        NwcCommand::GetBudget,
        NwcCommand::GetInfo,
        NwcCommand::ListTransactions,
        NwcCommand::PayKeysend,
        NwcCommand::LookupUser,
        NwcCommand::FetchQuote,
        NwcCommand::ExecuteQuote,
        NwcCommand::PayToAddress,
    ];

    /// NIP-47 method name
    pub fn as_str(&self) -> &'static str {
        match self {
            NwcCommand::PayInvoice => "pay_invoice",
            NwcCommand::MakeInvoice => "make_invoice",
            NwcCommand::LookupInvoice => "lookup_invoice",
            NwcCommand::GetBalance => "get_balance",
            NwcCommand::GetBudget => "get_budget",
            NwcCommand::GetInfo => "get_info",
            NwcCommand::ListTransactions => "list_transactions",
            NwcCommand::PayKeysend => "pay_keysend",
            NwcCommand::LookupUser => "lookup_user",
            NwcCommand::FetchQuote => "fetch_quote",
            NwcCommand::ExecuteQuote => "execute_quote",
            NwcCommand::PayToAddress => "pay_to_address",
        }
    }
}

impl fmt::Display for NwcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NwcCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NwcCommand::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CommandError::Unknown(s.to_string()))
    }
}

/// Why an incoming wallet request was turned away
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown method: {0}")]
    Unknown(String),

    #[error("method not supported by this VASP: {0}")]
    NotSupported(NwcCommand),
}

impl CommandError {
    /// NIP-47 error code to put in the response
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Unknown(_) => OTHER,
            CommandError::NotSupported(_) => NOT_IMPLEMENTED,
        }
    }
}

/// Ordered, duplicate-free list of the commands a VASP accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SupportedCommands(Vec<NwcCommand>);

impl SupportedCommands {
    /// Wrap a list, rejecting duplicates
    pub fn new(commands: Vec<NwcCommand>) -> ConfigResult<Self> {
        let mut seen = HashSet::new();
        for c in &commands {
            if !seen.insert(*c) {
                return Err(ConfigError::InvalidCommands(format!("duplicate entry {}", c)));
            }
        }
        Ok(Self(commands))
    }

    /// Build from command names, e.g. a comma-separated env value
    pub fn from_names<I, S>(names: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let commands = names
            .into_iter()
            .map(|n| {
                n.as_ref()
                    .trim()
                    .parse::<NwcCommand>()
                    .map_err(|e| ConfigError::InvalidCommands(e.to_string()))
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Self::new(commands)
    }

    /// Commands in configured order
    pub fn commands(&self) -> &[NwcCommand] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `command` is enabled
    pub fn contains(&self, command: NwcCommand) -> bool {
        self.0.contains(&command)
    }

    /// Resolve an incoming method name, rejecting anything not listed
    pub fn gate(&self, method: &str) -> Result<NwcCommand, CommandError> {
        let command = method.parse::<NwcCommand>()?;
        if self.contains(command) {
            Ok(command)
        } else {
            Err(CommandError::NotSupported(command))
        }
    }

    /// Gate result as a bool
    pub fn accepts(&self, method: &str) -> bool {
        self.gate(method).is_ok()
    }

    /// Wire names in configured order
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(NwcCommand::as_str).collect()
    }
}

impl Default for SupportedCommands {
    fn default() -> Self {
        Self(NwcCommand::ALL.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_matches_vasp_commands_in_order() {
        let names = SupportedCommands::default().names();
        assert_eq!(
            names,
            vec![
                "pay_invoice",
                "make_invoice",
                "lookup_invoice",
                "get_balance",
                "get_budget",
                "get_info",
                "list_transactions",
                "pay_keysend",
                "lookup_user",
                "fetch_quote",
                "execute_quote",
                "pay_to_address",
            ]
        );
    }

    #[test]
    fn default_list_has_no_duplicates() {
        let commands = SupportedCommands::default();
        let unique: HashSet<_> = commands.commands().iter().collect();
        assert_eq!(unique.len(), commands.len());
    }

    #[test]
    fn names_parse_back_to_the_same_command() {
        for c in NwcCommand::ALL {
            assert_eq!(c.as_str().parse::<NwcCommand>().unwrap(), c);
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&NwcCommand::PayToAddress).unwrap();
        assert_eq!(json, r#""pay_to_address""#);
        let c: NwcCommand = serde_json::from_str(r#""lookup_user""#).unwrap();
        assert_eq!(c, NwcCommand::LookupUser);
    }

    #[test]
    fn from_names_trims_and_rejects_unknown() {
        let list = SupportedCommands::from_names(" pay_invoice, get_info".split(',')).unwrap();
        assert_eq!(list.commands(), &[NwcCommand::PayInvoice, NwcCommand::GetInfo]);

        let err = SupportedCommands::from_names(["pay_invoice", "multi_pay_invoice"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCommands(_)));
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = SupportedCommands::from_names(["get_balance", "get_info", "get_balance"]).unwrap_err();
        assert!(err.to_string().contains("duplicate entry get_balance"));
    }

    #[test]
    fn gate_accepts_listed_and_rejects_the_rest() {
        let list = SupportedCommands::from_names(["pay_invoice", "get_balance"]).unwrap();
        assert!(list.accepts("pay_invoice"));
        assert!(list.accepts("get_balance"));

        let not_listed = list.gate("make_invoice").unwrap_err();
        assert_eq!(not_listed, CommandError::NotSupported(NwcCommand::MakeInvoice));
        assert_eq!(not_listed.code(), NOT_IMPLEMENTED);

        let unknown = list.gate("sign_message").unwrap_err();
        assert_eq!(unknown.code(), OTHER);
        assert!(!list.accepts("sign_message"));
    }
}
