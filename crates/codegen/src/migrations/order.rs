//! Dependency-ordered emission
//!
//! Entities are emitted in passes. Each pass takes every entity whose
//! prerequisites are already emitted, in name order, and gives each one
//! the next timestamp. Emitted names are then struck from the remaining
//! prerequisite sets.

use autotable_core::{EngineError, EngineResult};
use autotable_ir::DependencyMap;

/// One emitted entity with its timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub entity: String,
    pub timestamp: i64,
}

/// Check that every prerequisite named in the map is itself in the map
pub fn check_prerequisites(map: &DependencyMap) -> EngineResult<()> {
    for (name, prerequisites) in map.iter() {
        if let Some(missing) = prerequisites.iter().find(|p| !map.contains(p)) {
            return Err(EngineError::EntityNotFound(format!(
                "{} (required by '{}')",
                missing, name
            )));
        }
    }
    Ok(())
}

/// Order the entities of a dependency map.
///
/// Timestamps start at `start` and grow by `tick` (at least one) per
/// emitted entity. A pass that emits nothing while entities remain fails
/// with `CircularDependency`.
pub fn emission_order(map: &DependencyMap, start: i64, tick: i64) -> EngineResult<Vec<Emission>> {
    check_prerequisites(map)?;

    let tick = tick.max(1);
    let mut remaining = map.clone();
    let mut order = Vec::with_capacity(remaining.len());
    let mut timestamp = start;

    while !remaining.is_empty() {
        let ready = remaining.ready();
        if ready.is_empty() {
            let names = remaining.names().map(String::from).collect();
            return Err(EngineError::CircularDependency(names));
        }

        tracing::debug!(pass = order.len(), ready = ?ready, "Emitting entities");

        for name in &ready {
            order.push(Emission {
                entity: name.clone(),
                timestamp,
            });
            timestamp += tick;
            remaining.remove(name);
        }
        remaining.resolve(&ready);
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(order: &[Emission]) -> Vec<&str> {
        order.iter().map(|e| e.entity.as_str()).collect()
    }

    #[test]
    fn test_independent_entities_sorted() {
        let mut map = DependencyMap::new();
        map.register("user");
        map.register("comment");
        map.register("account");

        let order = emission_order(&map, 100, 1).unwrap();
        assert_eq!(names(&order), vec!["account", "comment", "user"]);
        assert_eq!(
            order.iter().map(|e| e.timestamp).collect::<Vec<_>>(),
            vec![100, 101, 102]
        );
    }

    #[test]
    fn test_prerequisites_emitted_first() {
        let mut map = DependencyMap::new();
        map.register("user");
        map.register("post");
        map.register("tag");
        map.register("post_tag");
        map.add_edge("post", "user");
        map.add_edge("post_tag", "post");
        map.add_edge("post_tag", "tag");

        let order = emission_order(&map, 0, 1).unwrap();
        assert_eq!(names(&order), vec!["tag", "user", "post", "post_tag"]);
    }

    #[test]
    fn test_tick_is_at_least_one() {
        let mut map = DependencyMap::new();
        map.register("a");
        map.register("b");

        let order = emission_order(&map, 10, 0).unwrap();
        assert_eq!(order[0].timestamp, 10);
        assert_eq!(order[1].timestamp, 11);

        let order = emission_order(&map, 10, 60).unwrap();
        assert_eq!(order[1].timestamp, 70);
    }

    #[test]
    fn test_cycle_is_an_error() {
        let mut map = DependencyMap::new();
        map.register("a");
        map.register("b");
        map.register("c");
        map.add_edge("a", "b");
        map.add_edge("b", "a");

        let err = emission_order(&map, 0, 1).unwrap_err();
        match err {
            EngineError::CircularDependency(names) => {
                assert_eq!(names, vec!["a".to_string(), "b".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_prerequisite() {
        let mut map = DependencyMap::new();
        map.register("post");
        map.add_edge("post", "user");

        let err = emission_order(&map, 0, 1).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("user"));
    }

    #[test]
    fn test_empty_map() {
        assert!(emission_order(&DependencyMap::new(), 0, 1).unwrap().is_empty());
    }
}
