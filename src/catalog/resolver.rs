use std::collections::HashSet;

use crate::catalog::Catalog;

/// Expand a pack into its eligible word ids.
///
/// The pack's own `content` comes first, followed by the `content` of each
/// included pack in `include` order. Inclusion is resolved one level deep only.
/// Duplicates keep their first position; ids that are missing from the library
/// or archived are dropped. An unknown pack expands to nothing.
pub fn expand<'a>(catalog: &'a Catalog, pack_id: &str) -> Vec<&'a str> {
    let Some(pack) = catalog.pack(pack_id) else {
        return Vec::new();
    };

    let included = pack
        .include
        .iter()
        .filter_map(|inc| catalog.pack(inc))
        .flat_map(|inc| inc.content.iter());

    let mut seen: HashSet<&str> = HashSet::new();
    pack.content
        .iter()
        .chain(included)
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .filter(|id| catalog.is_eligible(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::catalog::{Meta, Pack, WordEntry};

    fn pack(id: &str, content: &[&str], include: &[&str]) -> Pack {
        Pack {
            id: id.to_string(),
            title: id.to_uppercase(),
            content: content.iter().map(|s| s.to_string()).collect(),
            include: include.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn catalog(words: &[&str], archived: &[&str], packs: Vec<Pack>) -> Catalog {
        let mut library = BTreeMap::new();
        for &id in words {
            let mut entry = WordEntry::new(id, "");
            entry.archived = archived.contains(&id);
            library.insert(id.to_string(), entry);
        }
        Catalog::new(Meta::default(), library, packs)
    }

    #[test]
    fn deduplicates_preserving_first_seen_order() {
        let c = catalog(&["a", "b", "c"], &[], vec![pack("p", &["a", "b", "a", "c"], &[])]);
        assert_eq!(expand(&c, "p"), vec!["a", "b", "c"]);
    }

    #[test]
    fn drops_archived_and_missing_ids_anywhere() {
        let c = catalog(
            &["a", "b", "c"],
            &["b"],
            vec![pack("p", &["ghost", "a", "b", "c", "ghost"], &[])],
        );
        assert_eq!(expand(&c, "p"), vec!["a", "c"]);
    }

    #[test]
    fn includes_are_appended_one_level_only() {
        let c = catalog(
            &["a", "b", "c", "d"],
            &[],
            vec![
                pack("top", &["a"], &["mid", "missing"]),
                pack("mid", &["b", "a"], &["leaf"]),
                pack("leaf", &["d"], &[]),
                pack("other", &["c"], &[]),
            ],
        );
        assert_eq!(expand(&c, "top"), vec!["a", "b"]);
    }

    #[test]
    fn unknown_pack_is_empty() {
        let c = catalog(&["a"], &[], vec![pack("p", &["a"], &[])]);
        assert!(expand(&c, "nope").is_empty());
    }

    #[test]
    fn expansion_is_idempotent() {
        let c = catalog(
            &["a", "b", "c"],
            &[],
            vec![pack("p", &["c", "a"], &["q"]), pack("q", &["a", "b"], &[])],
        );
        let first = expand(&c, "p");
        let second = expand(&c, "p");
        assert_eq!(first, second);
        assert_eq!(first, vec!["c", "a", "b"]);
    }
}
