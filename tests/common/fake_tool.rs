//! In-process stand-in for the pin-update tool
//!
//! Edits the manifest JSON directly, so workflow tests need no external
//! executable or network.

#![allow(dead_code)]

use async_trait::async_trait;
use pin_updater::error::{Error, Result};
use pin_updater::tool::PinTool;
use pin_updater::types::RepoSlug;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// Fake pin tool with scripted update results
#[derive(Default)]
pub struct FakePinTool {
    updates: Mutex<HashMap<String, String>>,
    reformat: Mutex<HashSet<String>>,
    failures: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    seen_by_update: Mutex<HashMap<String, Value>>,
}

impl FakePinTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// `update` moves `name` to `revision`
    pub fn set_update(&self, name: &str, revision: &str) {
        self.updates
            .lock()
            .unwrap()
            .insert(name.to_string(), revision.to_string());
    }

    /// `update` rewrites the file compactly without changing the revision
    pub fn set_reformat(&self, name: &str) {
        self.reformat.lock().unwrap().insert(name.to_string());
    }

    /// `update` fails for `name`
    pub fn fail_update(&self, name: &str) {
        self.fail("update", name);
    }

    /// `command` (`drop`, `add`, `update`, `modify`) fails for `name`
    pub fn fail(&self, command: &str, name: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(format!("{command} {name}"));
    }

    fn check(&self, command: &str, name: &str) -> Result<()> {
        if self.failures.lock().unwrap().contains(&format!("{command} {name}")) {
            return Err(Error::PinTool(format!("cannot {command} {name}")));
        }
        Ok(())
    }

    /// Every invocation as `"<command> <args...>"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose command is `command`
    pub fn calls_of(&self, command: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.split(' ').next() == Some(command))
            .collect()
    }

    /// The pin as `update` saw it
    pub fn seen_by_update(&self, name: &str) -> Option<Value> {
        self.seen_by_update.lock().unwrap().get(name).cloned()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn load(manifest: &Path) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(&fs::read_to_string(manifest)?)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::PinTool("manifest is not an object".to_string())),
    }
}

fn store(manifest: &Path, map: Map<String, Value>) -> Result<()> {
    fs::write(manifest, serde_json::to_string_pretty(&Value::Object(map))?)?;
    Ok(())
}

/// Move a pin to `revision`, re-deriving its archive URL like niv does
fn set_revision(pin: &mut Map<String, Value>, revision: &str) {
    let old = pin.get("rev").and_then(Value::as_str).map(ToString::to_string);
    if let (Some(old), Some(Value::String(url))) = (old, pin.get_mut("url")) {
        *url = url.replace(&old, revision);
    }
    pin.insert("rev".to_string(), json!(revision));
}

fn pin_mut<'a>(map: &'a mut Map<String, Value>, name: &str) -> Result<&'a mut Map<String, Value>> {
    map.get_mut(name)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| Error::PinTool(format!("no pin named {name}")))
}

#[async_trait]
impl PinTool for FakePinTool {
    async fn drop_pin(&self, manifest: &Path, name: &str) -> Result<()> {
        self.log(format!("drop {name}"));
        self.check("drop", name)?;
        let mut map = load(manifest)?;
        map.shift_remove(name);
        store(manifest, map)
    }

    async fn add_pin(
        &self,
        manifest: &Path,
        name: &str,
        repo: &RepoSlug,
        revision: &str,
        branch: Option<&str>,
    ) -> Result<()> {
        let location = match &repo.host {
            Some(host) => format!("{host}/{}", repo.full_name()),
            None => repo.full_name(),
        };
        self.log(format!(
            "add {name} {location} {revision} {}",
            branch.unwrap_or("-")
        ));
        self.check("add", name)?;

        let mut map = load(manifest)?;
        let mut pin = json!({"owner": repo.owner, "repo": repo.repo, "rev": revision});
        if let Some(branch) = branch {
            pin["branch"] = json!(branch);
        }
        map.insert(name.to_string(), pin);
        store(manifest, map)
    }

    async fn update_pin(&self, manifest: &Path, name: &str) -> Result<()> {
        self.log(format!("update {name}"));
        let mut map = load(manifest)?;
        if let Some(pin) = map.get(name) {
            self.seen_by_update
                .lock()
                .unwrap()
                .insert(name.to_string(), pin.clone());
        }

        self.check("update", name)?;

        if self.reformat.lock().unwrap().contains(name) {
            fs::write(manifest, serde_json::to_string(&Value::Object(map))?)?;
            return Ok(());
        }

        let next = self.updates.lock().unwrap().get(name).cloned();
        match next {
            Some(revision) => {
                set_revision(pin_mut(&mut map, name)?, &revision);
                store(manifest, map)
            }
            None => Ok(()),
        }
    }

    async fn modify_pin(&self, manifest: &Path, name: &str, revision: &str) -> Result<()> {
        self.log(format!("modify {name} {revision}"));
        self.check("modify", name)?;
        let mut map = load(manifest)?;
        pin_mut(&mut map, name)?.insert("rev".to_string(), json!(revision));
        store(manifest, map)
    }
}
