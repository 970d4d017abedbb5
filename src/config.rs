// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;

use rollcall_core::Roster;
use rollcall_core::SearchParams;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;

/// The class being called on, as read from a TOML file.
///
/// ```toml
/// sessions = 30
/// picks_per_session = 5
/// class_size = 40
/// names = ["Alice", "Bob"]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassConfig {
    /// Number of class sessions in the term.
    pub sessions: usize,
    /// Average number of students called per session.
    pub picks_per_session: usize,
    /// Number of students in the class.
    pub class_size: usize,
    /// Student names. Missing names are filled in with placeholders.
    pub names: Vec<String>,
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            sessions: 30,
            picks_per_session: 5,
            class_size: 40,
            names: Vec::new(),
        }
    }
}

impl ClassConfig {
    /// Load the class file at `path`, or the defaults if there is none.
    pub fn load(path: Option<&str>) -> Fallible<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let path = Path::new(path);
        if !path.exists() {
            return fail(format!("config file does not exist: {}", path.display()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClassConfig = toml::from_str(&content)?;
        log::debug!("Loaded class config from {}", path.display());
        Ok(config)
    }

    pub fn with_overrides(
        self,
        sessions: Option<usize>,
        picks_per_session: Option<usize>,
        class_size: Option<usize>,
    ) -> Self {
        Self {
            sessions: sessions.unwrap_or(self.sessions),
            picks_per_session: picks_per_session.unwrap_or(self.picks_per_session),
            class_size: class_size.unwrap_or(self.class_size),
            names: self.names,
        }
    }

    pub fn params(&self) -> SearchParams {
        SearchParams::new(self.sessions, self.picks_per_session, self.class_size)
    }

    pub fn roster(&self) -> Roster {
        Roster::new(&self.names, self.class_size)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults() -> Fallible<()> {
        let config = ClassConfig::load(None)?;
        assert_eq!(config.params(), SearchParams::new(30, 5, 40));
        assert_eq!(config.roster().len(), 40);
        Ok(())
    }

    #[test]
    fn test_load_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("class.toml");
        write(
            &path,
            "sessions = 10\nclass_size = 3\nnames = [\"Alice\", \"Bob\"]\n",
        )?;
        let config = ClassConfig::load(Some(&path.display().to_string()))?;
        assert_eq!(config.params(), SearchParams::new(10, 5, 3));
        assert_eq!(config.roster().names(), ["Alice", "Bob", "Student 3"]);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = ClassConfig::load(Some("./derpherp.toml"));
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: config file does not exist: ./derpherp.toml".to_string())
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("class.toml");
        write(&path, "students = 3\n")?;
        assert!(ClassConfig::load(Some(&path.display().to_string())).is_err());
        Ok(())
    }

    #[test]
    fn test_overrides() {
        let config = ClassConfig::default().with_overrides(Some(2), None, Some(4));
        assert_eq!(config.params(), SearchParams::new(2, 5, 4));
    }
}
