use std::{collections::HashMap, hash::Hash};

#[macro_export]
#[cfg(feature = "debug-print")]
macro_rules! debug_print {
    ($( $args:expr ),*) => { log::debug!( $( $args ),* ); }
}

#[macro_export]
// Non-debug version
#[cfg(not(feature = "debug-print"))]
macro_rules! debug_print {
    ($( $args:expr ),*) => {
        true;
    };
}

/// Group items sharing a key. Groups come out in the order their key was
/// first seen and items keep their relative order inside a group.
pub(crate) fn group_by_ordered<T, K, F>(
    items: impl IntoIterator<Item = T>,
    mut key: F,
) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match positions.get(&k) {
            Some(&pos) => groups[pos].1.push(item),
            None => {
                positions.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }
    groups
}

/// Render names as a comma separated list of SQL string literals, e.g.
/// `'public','audit'`. Embedded single quotes are doubled.
pub(crate) fn escaped_object_list<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name.as_ref().replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",")
}
