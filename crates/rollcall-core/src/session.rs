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

use rand::Rng;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::roster::Roster;

/// Where a call session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No pool has been loaded.
    Uninitialized,
    /// A pool is loaded and nobody has been called yet.
    Ready,
    /// Some, but not all, of the pool has been called.
    Active,
    /// Every entry in the pool has been called.
    Exhausted,
}

/// A single student being called on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Call {
    pub slot: usize,
    pub name: String,
}

/// Draws students from a pool without replacement until the pool runs out.
///
/// A slot that appears `k` times in what is left of the pool is `k` times as
/// likely to be drawn as one that appears once.
#[derive(Default)]
pub struct CallSession {
    loaded: Option<Loaded>,
}

struct Loaded {
    pool: Vec<usize>,
    roster: Roster,
    /// Slots drawn so far, in draw order.
    used: Vec<usize>,
    /// For each slot, how many more times it can be drawn.
    remaining: Vec<usize>,
    remaining_total: usize,
}

impl CallSession {
    pub fn new() -> Self {
        Self { loaded: None }
    }

    /// Load a pool and roster, discarding any previous session.
    ///
    /// Fails without changing anything if the pool refers to a slot the
    /// roster has no name for.
    pub fn start(&mut self, pool: Vec<usize>, roster: Roster) -> Fallible<()> {
        let mut remaining: Vec<usize> = vec![0; roster.len()];
        for slot in pool.iter() {
            match remaining.get_mut(*slot) {
                Some(count) => *count += 1,
                None => {
                    return fail(format!(
                        "slot {slot} is out of range for a roster of {} names",
                        roster.len()
                    ));
                }
            }
        }
        log::debug!("Starting call session with {} calls", pool.len());
        self.loaded = Some(Loaded {
            remaining_total: pool.len(),
            pool,
            roster,
            used: Vec::new(),
            remaining,
        });
        Ok(())
    }

    /// Call on the next student using the thread-local RNG. Returns `None`
    /// when there is nobody left to call.
    pub fn draw(&mut self) -> Option<Call> {
        self.draw_with(&mut rand::rng())
    }

    pub fn draw_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Call> {
        let loaded = self.loaded.as_mut()?;
        if loaded.remaining_total == 0 {
            return None;
        }
        let mut pick: usize = rng.random_range(0..loaded.remaining_total);
        let mut chosen: usize = 0;
        for (slot, count) in loaded.remaining.iter().enumerate() {
            if pick < *count {
                chosen = slot;
                break;
            }
            pick -= count;
        }
        loaded.remaining[chosen] -= 1;
        loaded.remaining_total -= 1;
        loaded.used.push(chosen);
        let call = loaded.call(chosen);
        log::debug!("Called {} ({} left)", call.name, loaded.remaining_total);
        Some(call)
    }

    /// Discard the pool, the roster, and the call history.
    pub fn reset(&mut self) {
        self.loaded = None;
    }

    pub fn state(&self) -> SessionState {
        match &self.loaded {
            None => SessionState::Uninitialized,
            Some(loaded) if loaded.remaining_total == 0 => SessionState::Exhausted,
            Some(loaded) if loaded.used.is_empty() => SessionState::Ready,
            Some(_) => SessionState::Active,
        }
    }

    pub fn remaining_count(&self) -> usize {
        self.loaded.as_ref().map_or(0, |l| l.remaining_total)
    }

    pub fn pool_len(&self) -> usize {
        self.loaded.as_ref().map_or(0, |l| l.pool.len())
    }

    /// Everyone called so far, oldest first.
    pub fn used_list(&self) -> Vec<Call> {
        match &self.loaded {
            Some(loaded) => loaded.used.iter().map(|slot| loaded.call(*slot)).collect(),
            None => Vec::new(),
        }
    }

    pub fn last_call(&self) -> Option<Call> {
        let loaded = self.loaded.as_ref()?;
        loaded.used.last().map(|slot| loaded.call(*slot))
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.loaded.as_ref().map(|l| &l.roster)
    }
}

impl Loaded {
    fn call(&self, slot: usize) -> Call {
        Call {
            slot,
            name: self.roster.name(slot).unwrap_or_default().to_string(),
        }
    }
}
