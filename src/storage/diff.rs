//! One-level structural diff between two trees.
//!
//! Unlike `git diff-tree -r`, this never descends: comparing two tables roots
//! yields one record per changed table, comparing two table trees yields one
//! record per changed column. Callers recurse themselves.

use std::collections::BTreeMap;

use git2::Repository;

use crate::storage::error::StorageResult;
use crate::storage::tree::TreeHandle;
use crate::storage::types::{HashDiff, TreeEntry, TreeId};

/// compare the direct children of two trees
///
/// entries are matched by name; an entry is reported when it exists on only
/// one side or when its content id or mode differs. Results are sorted by name.
pub fn diff_trees(repo: &Repository, from: TreeId, to: TreeId) -> StorageResult<Vec<HashDiff>> {
    if from == to {
        return Ok(Vec::new());
    }

    let old = TreeHandle::find(repo, from)?;
    let new = TreeHandle::find(repo, to)?;
    Ok(diff_entries(old.entries(), new.entries()))
}

/// match two entry lists by name
pub(crate) fn diff_entries(old: Vec<TreeEntry>, new: Vec<TreeEntry>) -> Vec<HashDiff> {
    let mut sides: BTreeMap<String, (Option<TreeEntry>, Option<TreeEntry>)> = BTreeMap::new();
    for entry in old {
        let name = entry.name.clone();
        sides.entry(name).or_default().0 = Some(entry);
    }
    for entry in new {
        let name = entry.name.clone();
        sides.entry(name).or_default().1 = Some(entry);
    }

    sides
        .into_iter()
        .filter_map(|(name, (src, dst))| {
            let src = src.unwrap_or_else(|| TreeEntry::absent(name.as_str()));
            let dst = dst.unwrap_or_else(|| TreeEntry::absent(name.as_str()));
            if src.oid == dst.oid && src.mode == dst.mode {
                return None;
            }
            Some(HashDiff { name, src, dst })
        })
        .collect()
}
