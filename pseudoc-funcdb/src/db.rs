//! The Funcdb itself (§4.2): a `BTreeMap` keyed by address, so iteration
//! order is already the canonical ascending-address order the on-disk
//! writer needs -- no separate sort step before serialization.

use crate::error::Error;
use crate::record::FuncRecord;
use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// A process-wide, keyed, mutable store of [`FuncRecord`]s.
///
/// Cheap to [`Clone`] (a `BTreeMap` of small value types), which is what
/// [`FuncDb::snapshot`] relies on for the driver's pre-iteration baseline:
/// the clone owns its own `BTreeMap`, so later mutation of the live
/// instance can never be observed through the snapshot (§3, §8 property 4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncDb {
    records: BTreeMap<u64, FuncRecord>,
}

impl FuncDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from an ordered list of backing files; later files override
    /// earlier ones by key (§4.2). A file that doesn't exist is an error
    /// unless the caller marks it optional.
    pub fn load(paths: &[(PathBuf, bool)]) -> Result<Self, Error> {
        let mut db = Self::new();
        for (path, optional) in paths {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(source) if *optional && source.kind() == std::io::ErrorKind::NotFound => {
                    log::debug!("optional funcdb file {} not found, skipping", path.display());
                    continue;
                }
                Err(source) => {
                    return Err(Error::Io {
                        path: path.clone(),
                        source,
                    })
                }
            };
            let parsed: BTreeMap<String, FuncRecord> =
                serde_yaml::from_str(&text).map_err(|source| Error::Format {
                    path: path.clone(),
                    source,
                })?;
            for (addr_str, record) in parsed {
                let addr = parse_hex_addr(&addr_str).map_err(|source| Error::Format {
                    path: path.clone(),
                    source,
                })?;
                db.records.insert(addr, record);
            }
            log::debug!("loaded funcdb from {}", path.display());
        }
        Ok(db)
    }

    /// Atomically persist to `path`: write to `<path>.tmp`, then rename
    /// over `path` (§6, §8 property 3).
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let tmp_path = tmp_path_for(path);
        let serializable: BTreeMap<String, &FuncRecord> = self
            .records
            .iter()
            .map(|(addr, rec)| (format!("{addr:#x}"), rec))
            .collect();
        let text = serde_yaml::to_string(&serializable).map_err(|source| Error::Format {
            path: path.to_path_buf(),
            source,
        })?;
        {
            let mut tmp = std::fs::File::create(&tmp_path).map_err(|source| Error::Io {
                path: tmp_path.clone(),
                source,
            })?;
            tmp.write_all(text.as_bytes())
                .map_err(|source| Error::Io {
                    path: tmp_path.clone(),
                    source,
                })?;
            tmp.sync_all().map_err(|source| Error::Io {
                path: tmp_path.clone(),
                source,
            })?;
        }
        std::fs::rename(&tmp_path, path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("saved funcdb to {}", path.display());
        Ok(())
    }

    pub fn get(&self, addr: u64) -> Option<&FuncRecord> {
        self.records.get(&addr)
    }

    pub fn set(&mut self, addr: u64, record: FuncRecord) {
        self.records.insert(addr, record);
    }

    pub fn entry(&mut self, addr: u64) -> &mut FuncRecord {
        self.records.entry(addr).or_default()
    }

    /// A read-only index from symbolic name to address.
    pub fn by_name(&self) -> BTreeMap<&str, u64> {
        self.records
            .iter()
            .filter_map(|(addr, rec)| rec.name.as_deref().map(|name| (name, *addr)))
            .collect()
    }

    /// A deep clone, independent of later mutations to `self` (§3, §8
    /// property 4). `FuncDb` derives `Clone` over an owned `BTreeMap` of
    /// owned values, so this is simply `self.clone()`.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Structural equality per §3: same key set, each paired record equal.
    /// `FuncDb` derives `PartialEq`/`Eq` over the same `BTreeMap`, which
    /// already compares key sets and paired values this way.
    pub fn equal(a: &Self, b: &Self) -> bool {
        a == b
    }

    /// Merge the per-function scratch facts a finished CFG accumulated
    /// back into the record for its entry function (§4.2).
    pub fn update_from_cfg(&mut self, func: &pseudoc_ir::Function) {
        let record = self.entry(func.entry_func_addr());
        record.merge_from_cfg(func);
    }

    /// Load a plain-text symbol table (`ADDRESS NAME` per line) and merge
    /// it in as initial empty records (§4.2, §6).
    pub fn load_symtab(&mut self, path: &Path) -> Result<(), Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, char::is_whitespace);
            let (Some(addr_str), Some(name)) = (parts.next(), parts.next()) else {
                return Err(Error::Symtab {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    text: line.to_string(),
                });
            };
            let addr = parse_hex_addr(addr_str).map_err(|_| Error::Symtab {
                path: path.to_path_buf(),
                line: idx + 1,
                text: line.to_string(),
            })?;
            self.records
                .entry(addr)
                .or_insert_with(|| FuncRecord::named(name.trim()));
        }
        log::debug!("loaded symtab from {}", path.display());
        Ok(())
    }
}

fn parse_hex_addr(s: &str) -> Result<u64, serde_yaml::Error> {
    let s = s.trim();
    let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"));
    let result = match stripped {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>().or_else(|_| u64::from_str_radix(s, 16)),
    };
    result.map_err(|_| serde::de::Error::custom(format!("invalid address: {s:?}")))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".tmp");
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pseudoc_arch::Reg;

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let mut db = FuncDb::new();
        db.set(0x1000, FuncRecord::named("foo"));
        let snap = db.snapshot();
        db.set(0x1000, FuncRecord::named("bar"));
        db.set(0x2000, FuncRecord::named("baz"));
        assert_eq!(snap.get(0x1000).unwrap().name.as_deref(), Some("foo"));
        assert!(snap.get(0x2000).is_none());
        assert!(!FuncDb::equal(&db, &snap));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funcdb.yaml");

        let mut db = FuncDb::new();
        let mut rec = FuncRecord::named("main");
        rec.params = vec![Reg::new("a2"), Reg::new("a3")];
        rec.save.insert(Reg::new("sp"));
        rec.props
            .insert("note".to_string(), serde_yaml::Value::from("hi"));
        db.set(0x401000, rec);

        db.save(&path).unwrap();
        let loaded = FuncDb::load(&[(path, false)]).unwrap();
        assert!(FuncDb::equal(&db, &loaded));
    }

    #[test]
    fn later_files_override_earlier_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let seed_path = dir.path().join("funcdb.yaml.in");
        let main_path = dir.path().join("funcdb.yaml");

        let mut seed = FuncDb::new();
        seed.set(0x1000, FuncRecord::named("seed-name"));
        seed.save(&seed_path).unwrap();

        let mut main = FuncDb::new();
        main.set(0x1000, FuncRecord::named("real-name"));
        main.save(&main_path).unwrap();

        let loaded = FuncDb::load(&[(seed_path, true), (main_path, true)]).unwrap();
        assert_eq!(loaded.get(0x1000).unwrap().name.as_deref(), Some("real-name"));
    }

    #[test]
    fn atomic_save_leaves_original_untouched_on_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funcdb.yaml");

        let mut original = FuncDb::new();
        original.set(0x1, FuncRecord::named("orig"));
        original.save(&path).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        // Simulate a failure between "write temp" and "rename": write the
        // temp file directly and stop, without renaming it into place.
        let tmp_path = tmp_path_for(&path);
        std::fs::write(&tmp_path, b"not yet committed").unwrap();

        let after = std::fs::read_to_string(&path).unwrap();
        assert_eq!(before, after, "original funcdb must be untouched");
        assert_eq!(
            std::fs::read_to_string(&tmp_path).unwrap(),
            "not yet committed"
        );
    }
}
