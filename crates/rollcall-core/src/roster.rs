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

use serde::Serialize;

/// The display names of a class, index-aligned with slot indices.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster of exactly `class_size` names. Blank names are
    /// dropped, missing names are filled with placeholders, and extra names
    /// are cut off.
    pub fn new<I, S>(names: I, class_size: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .take(class_size)
            .collect();
        for i in names.len()..class_size {
            names.push(placeholder(i));
        }
        Self { names }
    }

    /// Build a roster from text with one name per line.
    pub fn parse(text: &str, class_size: usize) -> Self {
        Self::new(text.lines(), class_size)
    }

    pub fn name(&self, slot: usize) -> Option<&str> {
        self.names.get(slot).map(String::as_str)
    }

    /// The one-based label shown to people, e.g. `"3 : Carol"`.
    pub fn label(&self, slot: usize) -> Option<String> {
        self.name(slot).map(|name| format!("{} : {name}", slot + 1))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn placeholder(slot: usize) -> String {
    format!("Student {}", slot + 1)
}
