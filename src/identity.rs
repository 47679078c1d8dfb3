use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::normalize::clean_str;

/// Privacy-preserving identity shown to non-admin viewers in place of the
/// student's real name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub icon: String,
    pub code_name: String,
}

impl Identity {
    pub fn new(icon: &str, code_name: &str) -> Identity {
        Identity {
            icon: icon.to_string(),
            code_name: code_name.to_string(),
        }
    }

    /// Sentinel for names that miss the assignment map (e.g. a divergent
    /// normalization between two pipeline stages). Lookups fall back to
    /// this instead of failing the roster build.
    pub fn unknown() -> Identity {
        Identity::new("❓", "Unknown")
    }
}

/// Ordered, immutable identity palette. Passed explicitly into the
/// assigner so tests can exercise wraparound with small palettes and a
/// deployment can swap the list from config.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<Identity>,
}

impl Palette {
    pub fn new(entries: Vec<Identity>) -> Palette {
        Palette { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Identity> {
        self.entries.get(index)
    }

    /// The stock 30-animal palette used by the deployed leaderboard.
    pub fn builtin() -> Palette {
        let entries = [
            ("🦁", "Lion"),
            ("🦊", "Fox"),
            ("🐼", "Panda"),
            ("🐯", "Tiger"),
            ("🐺", "Wolf"),
            ("🦄", "Unicorn"),
            ("🐉", "Dragon"),
            ("🦅", "Eagle"),
            ("🦋", "Butterfly"),
            ("🐬", "Dolphin"),
            ("🦈", "Shark"),
            ("🐻", "Bear"),
            ("🦝", "Raccoon"),
            ("🦜", "Parrot"),
            ("🐙", "Octopus"),
            ("🦩", "Flamingo"),
            ("🐊", "Croc"),
            ("🦚", "Peacock"),
            ("🦭", "Seal"),
            ("🐆", "Leopard"),
            ("🦓", "Zebra"),
            ("🦒", "Giraffe"),
            ("🐘", "Elephant"),
            ("🦛", "Hippo"),
            ("🦦", "Otter"),
            ("🦥", "Sloth"),
            ("🦔", "Hedgehog"),
            ("🐳", "Whale"),
            ("🦑", "Squid"),
            ("🐲", "Wyrm"),
        ];
        Palette::new(
            entries
                .iter()
                .map(|(icon, name)| Identity::new(icon, name))
                .collect(),
        )
    }
}

/// Assign a stable identity to each unique cleaned name: dedupe, sort
/// lexicographically ascending, take `palette[i % len]` in sorted order.
/// Only the set of unique names affects the result, so the same roster
/// gets the same identities on every load regardless of row order. When
/// unique names outnumber the palette, assignments wrap around and icons
/// repeat.
pub fn assign_identities<'a, I>(names: I, palette: &Palette) -> BTreeMap<String, Identity>
where
    I: IntoIterator<Item = &'a str>,
{
    let unique: BTreeSet<String> = names
        .into_iter()
        .map(clean_str)
        .filter(|n| !n.is_empty())
        .collect();

    let mut map = BTreeMap::new();
    if palette.is_empty() {
        return map;
    }
    for (i, name) in unique.into_iter().enumerate() {
        let identity = palette
            .get(i % palette.len())
            .cloned()
            .unwrap_or_else(Identity::unknown);
        map.insert(name, identity);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_palette() -> Palette {
        Palette::new(vec![Identity::new("A", "Alpha"), Identity::new("B", "Beta")])
    }

    #[test]
    fn assignment_ignores_input_order() {
        let pal = Palette::builtin();
        let forward = assign_identities(["Anna", "Ben", "Chloe"], &pal);
        let backward = assign_identities(["Chloe", "Ben", "Anna"], &pal);
        assert_eq!(forward, backward);
    }

    #[test]
    fn assignment_follows_sorted_order() {
        let pal = tiny_palette();
        let map = assign_identities(["Ben", "Anna"], &pal);
        assert_eq!(map["Anna"].code_name, "Alpha");
        assert_eq!(map["Ben"].code_name, "Beta");
    }

    #[test]
    fn wraps_around_small_palette() {
        let pal = tiny_palette();
        let map = assign_identities(["Anna", "Ben", "Chloe"], &pal);
        assert_eq!(map["Chloe"].code_name, "Alpha");
    }

    #[test]
    fn identity_depends_only_on_names_at_or_below() {
        // Adding names that sort after the existing set must not move the
        // existing assignments.
        let pal = Palette::builtin();
        let small = assign_identities(["Anna", "Ben"], &pal);
        let grown = assign_identities(["Anna", "Ben", "Zoe"], &pal);
        assert_eq!(small["Anna"], grown["Anna"]);
        assert_eq!(small["Ben"], grown["Ben"]);
    }

    #[test]
    fn dedupes_and_drops_empty() {
        let pal = tiny_palette();
        let map = assign_identities(["Anna", " Anna ", "", "  "], &pal);
        assert_eq!(map.len(), 1);
        assert_eq!(map["Anna"].code_name, "Alpha");
    }
}
