//! Named command registry owned by one remote.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::command::IrCommand;
use crate::error::RegistryError;

/// Mapping from command name to captured IR code.
///
/// Names are unique within a registry and never overwritten implicitly:
/// capturing over an existing name must be an explicit caller decision.
///
/// The serde form is a JSON object of name → hex string, so a registry
/// file with a single malformed code fails deserialization as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandRegistry {
    commands: HashMap<String, IrCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `code` under `name`. Fails without mutation when the name
    /// is already present or empty.
    pub fn insert(&mut self, name: &str, code: IrCommand) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.commands.contains_key(name) {
            return Err(RegistryError::AlreadyExists(name.to_string()));
        }
        self.commands.insert(name.to_string(), code);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&IrCommand> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted for stable display. Ordering is not part
    /// of the contract.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut reg = CommandRegistry::new();
        reg.insert("foo", IrCommand::new(vec![1, 2, 3])).unwrap();
        reg.insert("bar", IrCommand::new(vec![16, 17, 42, 12]))
            .unwrap();

        assert!(reg.contains("foo"));
        assert_eq!(reg.get("bar").unwrap().as_bytes(), &[16, 17, 42, 12]);
        assert_eq!(reg.names(), vec!["bar".to_string(), "foo".to_string()]);
    }

    #[test]
    fn duplicate_insert_fails_without_mutation() {
        let mut reg = CommandRegistry::new();
        reg.insert("foo", IrCommand::new(vec![1, 2, 3])).unwrap();

        let err = reg.insert("foo", IrCommand::new(vec![2, 3])).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyExists("foo".to_string()));
        assert_eq!(reg.get("foo").unwrap().as_bytes(), &[1, 2, 3]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn empty_name_rejected() {
        let mut reg = CommandRegistry::new();
        assert_eq!(
            reg.insert("", IrCommand::new(vec![1])).unwrap_err(),
            RegistryError::EmptyName
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn serde_round_trip() {
        let mut reg = CommandRegistry::new();
        reg.insert("power", IrCommand::new(vec![0x26, 0x00, 0x0a]))
            .unwrap();
        reg.insert("mute", IrCommand::new(vec![0x26, 0x01])).unwrap();

        let raw = serde_json::to_string(&reg).unwrap();
        let back: CommandRegistry = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, reg);
    }

    #[test]
    fn load_is_all_or_nothing() {
        // One malformed hex value fails the whole document.
        let raw = r#"{"power": "260a", "broken": "12320"}"#;
        assert!(serde_json::from_str::<CommandRegistry>(raw).is_err());
    }
}
