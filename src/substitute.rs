//! Cross-reference substitution over flat maps.
//!
//! A value (or list element) containing the splitter token is split into
//! parts; each part holding the marker is resolved against already-known
//! entries and the parts are joined back by plain string concatenation.
//! Resolution iterates to a fixed point so references can chain through
//! values that are themselves still unresolved.

use tracing::trace;

use crate::codec::FlatMap;
use crate::error::ConfigError;
use crate::key::KeyChain;
use crate::value::Value;

/// Default token separating the parts of a composed value.
pub const SUBSTITUTION_SPLITTER: &str = " + ";

/// Default marker opening a reference to another key-chain.
pub const SUBSTITUTION_MARKER: &str = "$";

/// Rewrites every value referencing other keys to its fully concatenated
/// form, returning a new flat map.
///
/// Entries without the splitter seed the resolved set; the rest are
/// retried pass by pass, each pass only consulting values already
/// resolved. A pass that completes no entry while some remain pending
/// means a missing key or a reference cycle and fails with
/// [`ConfigError::UnresolvedReference`] naming the stuck key-chains.
/// Running this on an already-resolved map returns it unchanged.
pub fn resolve_substitutions(
    flat: &FlatMap,
    splitter: &str,
    marker: &str,
) -> Result<FlatMap, ConfigError> {
    let mut resolved = FlatMap::new();
    let mut pending: Vec<(KeyChain, Value)> = Vec::new();

    for (chain, value) in flat {
        if contains_splitter(value, splitter) {
            pending.push((chain.clone(), value.clone()));
        } else {
            resolved.insert(chain.clone(), value.clone());
        }
    }

    while !pending.is_empty() {
        let before = pending.len();
        let mut still_pending = Vec::new();

        for (chain, value) in pending {
            match substitute_value(&value, &resolved, splitter, marker) {
                Some(complete) => {
                    resolved.insert(chain, complete);
                }
                None => still_pending.push((chain, value)),
            }
        }

        pending = still_pending;
        if pending.len() == before {
            let stuck = pending.into_iter().map(|(chain, _)| chain).collect();
            return Err(ConfigError::UnresolvedReference(stuck));
        }
        trace!(
            resolved = resolved.len(),
            pending = pending.len(),
            "substitution pass complete"
        );
    }

    Ok(resolved)
}

fn contains_splitter(value: &Value, splitter: &str) -> bool {
    match value {
        Value::Str(s) => s.contains(splitter),
        Value::List(items) => items.iter().any(|item| item.contains(splitter)),
    }
}

/// Returns the fully substituted value, or `None` if any referenced key
/// is not yet resolved.
fn substitute_value(
    value: &Value,
    resolved: &FlatMap,
    splitter: &str,
    marker: &str,
) -> Option<Value> {
    match value {
        Value::Str(s) => substitute_string(s, resolved, splitter, marker).map(Value::Str),
        Value::List(items) => {
            let mut complete = Vec::with_capacity(items.len());
            for item in items {
                if !item.contains(splitter) {
                    complete.push(item.clone());
                    continue;
                }
                complete.push(substitute_string(item, resolved, splitter, marker)?);
            }
            Some(Value::List(complete))
        }
    }
}

fn substitute_string(
    value: &str,
    resolved: &FlatMap,
    splitter: &str,
    marker: &str,
) -> Option<String> {
    let mut joined = String::new();
    for part in value.split(splitter) {
        // a part may carry a literal prefix before its marker,
        // e.g. "pre$key1" concatenates "pre" with the value of key1
        let Some(marker_at) = part.find(marker) else {
            joined.push_str(part);
            continue;
        };
        let (literal, reference) = part.split_at(marker_at);
        joined.push_str(literal);

        let chain = KeyChain::from_dotted(&reference[marker.len()..]);
        match resolved.get(&chain)? {
            Value::Str(s) => joined.push_str(s),
            // list values cannot be spliced into a string
            Value::List(_) => return None,
        }
    }
    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(flat: &FlatMap) -> Result<FlatMap, ConfigError> {
        resolve_substitutions(flat, SUBSTITUTION_SPLITTER, SUBSTITUTION_MARKER)
    }

    fn chain(dotted: &str) -> KeyChain {
        KeyChain::from_dotted(dotted)
    }

    #[test]
    fn test_substitution_fixture() {
        let mut flat = FlatMap::new();
        flat.insert(chain("key1"), Value::from("value1"));
        flat.insert(chain("key2"), Value::from("value2"));
        flat.insert(
            chain("list1"),
            Value::list(["$key1 + $key2", "pre$key1 + suf"]),
        );
        flat.insert(chain("lvl1.lvl2.key1"), Value::from("value3rd"));
        flat.insert(chain("check"), Value::from("$lvl1.lvl2.key1 + .txt"));

        let resolved = resolve(&flat).unwrap();

        assert_eq!(
            resolved.get(&chain("list1")),
            Some(&Value::list(["value1value2", "prevalue1suf"]))
        );
        assert_eq!(
            resolved.get(&chain("check")),
            Some(&Value::from("value3rd.txt"))
        );
        assert_eq!(resolved.get(&chain("key1")), Some(&Value::from("value1")));
        assert_eq!(resolved.len(), flat.len());
    }

    #[test]
    fn test_chained_references_converge() {
        let mut flat = FlatMap::new();
        flat.insert(chain("c"), Value::from("$b + !"));
        flat.insert(chain("b"), Value::from("$a +  world"));
        flat.insert(chain("a"), Value::from("hello"));

        let resolved = resolve(&flat).unwrap();
        assert_eq!(resolved.get(&chain("c")), Some(&Value::from("hello world!")));
    }

    #[test]
    fn test_cyclic_references_fail() {
        let mut flat = FlatMap::new();
        flat.insert(chain("a"), Value::from("$b + x"));
        flat.insert(chain("b"), Value::from("$a + y"));

        let err = resolve(&flat).unwrap_err();
        let ConfigError::UnresolvedReference(mut stuck) = err else {
            panic!("expected UnresolvedReference");
        };
        stuck.sort();
        assert_eq!(stuck, [chain("a"), chain("b")]);
    }

    #[test]
    fn test_missing_reference_fails() {
        let mut flat = FlatMap::new();
        flat.insert(chain("a"), Value::from("$nowhere + .txt"));

        assert!(matches!(
            resolve(&flat),
            Err(ConfigError::UnresolvedReference(stuck)) if stuck == [chain("a")]
        ));
    }

    #[test]
    fn test_idempotent_on_resolved_input() {
        let mut flat = FlatMap::new();
        flat.insert(chain("key1"), Value::from("value1"));
        flat.insert(chain("list1"), Value::list(["a", "b"]));
        flat.insert(chain("markerless"), Value::from("$not-a-ref-no-splitter"));

        assert_eq!(resolve(&flat).unwrap(), flat);
    }

    #[test]
    fn test_list_entry_pends_until_every_element_resolves() {
        let mut flat = FlatMap::new();
        flat.insert(chain("late"), Value::from("$base + !"));
        flat.insert(chain("base"), Value::from("v"));
        flat.insert(chain("combo"), Value::list(["$late + ?", "plain"]));

        let resolved = resolve(&flat).unwrap();
        assert_eq!(
            resolved.get(&chain("combo")),
            Some(&Value::list(["v!?", "plain"]))
        );
    }

    #[test]
    fn test_list_valued_reference_is_unresolvable() {
        let mut flat = FlatMap::new();
        flat.insert(chain("items"), Value::list(["a", "b"]));
        flat.insert(chain("bad"), Value::from("$items + .txt"));

        assert!(matches!(
            resolve(&flat),
            Err(ConfigError::UnresolvedReference(_))
        ));
    }
}
