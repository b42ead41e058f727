//! Remotes: named command registries as the service layer sees them.

use serde::{Deserialize, Serialize};

use crate::command::CommandRegistry;

/// A named remote control owning one command registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Remote {
    pub name: String,
    pub commands: CommandRegistry,
}

impl Remote {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            commands: CommandRegistry::new(),
        }
    }
}

/// Collection of remotes, persisted as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteList {
    remotes: Vec<Remote>,
}

impl RemoteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &str) -> Option<&Remote> {
        self.remotes.iter().find(|r| r.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Remote> {
        self.remotes.iter_mut().find(|r| r.name == name)
    }

    /// The remote named `name`, created empty if absent.
    pub fn find_or_create(&mut self, name: &str) -> &mut Remote {
        if let Some(idx) = self.remotes.iter().position(|r| r.name == name) {
            return &mut self.remotes[idx];
        }
        self.remotes.push(Remote::new(name));
        self.remotes.last_mut().unwrap()
    }

    pub fn names(&self) -> Vec<String> {
        self.remotes.iter().map(|r| r.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Remote> {
        self.remotes.iter()
    }

    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::IrCommand;

    #[test]
    fn find_or_create_reuses_existing() {
        let mut list = RemoteList::new();
        list.find_or_create("amp")
            .commands
            .insert("power", IrCommand::new(vec![1]))
            .unwrap();

        let again = list.find_or_create("amp");
        assert!(again.commands.contains("power"));
        assert_eq!(list.len(), 1);

        list.find_or_create("tv");
        assert_eq!(list.names(), vec!["amp".to_string(), "tv".to_string()]);
    }

    #[test]
    fn serde_round_trip() {
        let mut list = RemoteList::new();
        list.find_or_create("amp")
            .commands
            .insert("power", IrCommand::new(vec![0x26, 0x01]))
            .unwrap();

        let raw = serde_json::to_string(&list).unwrap();
        let back: RemoteList = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, list);
        assert_eq!(
            back.find("amp").unwrap().commands.get("power").unwrap(),
            &IrCommand::new(vec![0x26, 0x01])
        );
    }
}
