//! # Registry Verification Tests
//!
//! End-to-end verification of the storage engine's contract:
//!
//! 1. **Lifecycle scenario**: the canonical create/emplace/remove/destroy
//!    sequence with exact query results
//! 2. **Capacity**: the allocator hands out the null entity at the cap,
//!    nothing else changes
//! 3. **Churn**: deterministic create/destroy pressure - recycled ids must
//!    never leak state between lives
//!
//! Run with: cargo test --test registry_verification -- --nocapture

use strata_core::{EcsError, EntityId, Registry, Signature};

#[derive(Clone, Debug, PartialEq)]
struct Pos {
    x: i32,
    y: i32,
    z: i32,
}

#[derive(Clone, Debug, PartialEq)]
struct Vel {
    dx: i32,
    dy: i32,
    dz: i32,
}

// ============================================================================
// SCENARIO 1: LIFECYCLE
// ============================================================================

#[test]
fn verify_lifecycle_scenario() {
    let mut registry = Registry::new();

    let e1 = registry.create_entity();
    let e2 = registry.create_entity();
    let e3 = registry.create_entity();

    registry.emplace(e1, Pos { x: 0, y: 0, z: 0 });
    registry.emplace(e2, Pos { x: 0, y: 0, z: 1 });
    registry.emplace(e1, Vel { dx: 1, dy: 0, dz: 0 });
    registry.emplace(e2, Vel { dx: 0, dy: 1, dz: 1 });
    registry.emplace(e3, Vel { dx: 0, dy: 1, dz: 3 });

    registry.remove::<Vel>(e2);
    registry.remove_entity(e3);

    // view(pos, vel): e1 only - e2 lost vel, e3 is gone
    let moving = registry.view::<(Pos, Vel)>();
    assert_eq!(moving.len(), 1);
    let (id, (pos, vel)) = &moving[0];
    assert_eq!(*id, e1);
    assert_eq!(*pos, Pos { x: 0, y: 0, z: 0 });
    assert_eq!(*vel, Vel { dx: 1, dy: 0, dz: 0 });

    // view(vel): e1 only
    let carriers = registry.view::<(Vel,)>();
    assert_eq!(carriers.len(), 1);
    assert_eq!(carriers[0].0, e1);

    // view(pos): e1 and e2, each exactly once
    let mut placed: Vec<EntityId> = registry
        .view::<(Pos,)>()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    placed.sort_by_key(|id| id.index());
    assert_eq!(placed, vec![e1, e2]);

    // get_entity(pos, vel) on e1 succeeds
    let (pos, vel) = registry.get_entity::<(Pos, Vel)>(e1);
    assert_eq!(pos.x + vel.dx, 1);
}

#[test]
#[should_panic(expected = "does not have component")]
fn verify_lifecycle_scenario_fatal_branch() {
    let mut registry = Registry::new();

    let e1 = registry.create_entity();
    let e2 = registry.create_entity();
    registry.emplace(e1, Pos { x: 0, y: 0, z: 0 });
    registry.emplace(e2, Pos { x: 0, y: 0, z: 1 });
    registry.emplace(e1, Vel { dx: 1, dy: 0, dz: 0 });
    registry.emplace(e2, Vel { dx: 0, dy: 1, dz: 1 });
    registry.remove::<Vel>(e2);

    // e2 no longer owns vel: this dereference is a contract violation
    let _ = registry.get_entity::<(Pos, Vel)>(e2);
}

// ============================================================================
// SCENARIO 2: CAPACITY
// ============================================================================

#[test]
fn verify_capacity_cap_returns_null() {
    let mut registry = Registry::new();
    let limit = registry.entity_limit();

    let mut issued = Vec::with_capacity(limit);
    for _ in 0..limit {
        let id = registry.create_entity();
        assert!(!id.is_null());
        issued.push(id);
    }

    // The cap is a hard stop, not a panic
    assert!(registry.create_entity().is_null());
    assert_eq!(
        registry.try_create_entity(),
        Err(EcsError::EntityLimitReached { limit })
    );
    assert_eq!(registry.alive_count(), limit);

    // Ids were never duplicated
    issued.sort_by_key(|id| id.index());
    issued.dedup();
    assert_eq!(issued.len(), limit);

    // Destroying one entity frees exactly one slot
    registry.remove_entity(issued[limit / 2]);
    assert!(!registry.create_entity().is_null());
    assert!(registry.create_entity().is_null());
}

// ============================================================================
// SCENARIO 3: CHURN
// ============================================================================

/// Deterministic integer mixer, stands in for an RNG.
fn mix(seed: u32) -> u32 {
    seed.wrapping_mul(0x9E37_79B9)
}

#[test]
fn verify_churn_recycled_ids_never_leak_state() {
    let mut registry = Registry::with_entity_limit(64);
    let mut live: Vec<EntityId> = Vec::new();

    for round in 0..2_000_u32 {
        let roll = mix(round);
        if roll % 3 != 0 || live.is_empty() {
            let id = registry.create_entity();
            if id.is_null() {
                continue;
            }
            // A fresh or recycled entity starts with nothing
            assert_eq!(registry.signature_of(id), Some(Signature::EMPTY));
            assert!(!registry.contains_component::<Pos>(id));
            assert!(!registry.contains_component::<Vel>(id));

            if roll % 2 == 0 {
                registry.emplace(
                    id,
                    Pos {
                        x: roll as i32,
                        y: 0,
                        z: 0,
                    },
                );
            }
            if roll % 5 == 0 {
                registry.emplace(
                    id,
                    Vel {
                        dx: round as i32,
                        dy: 0,
                        dz: 0,
                    },
                );
            }
            live.push(id);
        } else {
            let victim = live.swap_remove(roll as usize % live.len());
            registry.remove_entity(victim);
            assert!(!registry.contains(victim));
        }

        assert_eq!(registry.alive_count(), live.len());
    }

    // Each live entity is reachable through a query matching its signature
    for &id in &live {
        let signature = registry.signature_of(id).expect("tracked entity is live");
        let in_pos_view = registry.view::<(Pos,)>().iter().any(|(seen, _)| *seen == id);
        assert_eq!(in_pos_view, registry.contains_component::<Pos>(id));
        let in_vel_view = registry.view::<(Vel,)>().iter().any(|(seen, _)| *seen == id);
        assert_eq!(in_vel_view, registry.contains_component::<Vel>(id));
        if signature == Signature::EMPTY {
            assert!(!in_pos_view && !in_vel_view);
        }
    }
}

// ============================================================================
// SCENARIO 4: QUERY PRECISION UNDER MIXED SIGNATURES
// ============================================================================

#[test]
fn verify_query_precision_across_signatures() {
    let mut registry = Registry::new();
    let mut expect_both = Vec::new();
    let mut expect_pos = Vec::new();

    for step in 0..60_i32 {
        let id = registry.create_entity();
        let has_pos = step % 2 == 0;
        let has_vel = step % 3 == 0;
        if has_pos {
            registry.emplace(id, Pos { x: step, y: 0, z: 0 });
            expect_pos.push(id);
        }
        if has_vel {
            registry.emplace(id, Vel { dx: step, dy: 0, dz: 0 });
        }
        if has_pos && has_vel {
            expect_both.push(id);
        }
    }

    // Four signatures in play: {}, {pos}, {vel}, {pos, vel}
    assert_eq!(registry.distinct_signatures(), 4);

    let mut both: Vec<EntityId> = registry
        .view::<(Pos, Vel)>()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    both.sort_by_key(|id| id.index());
    assert_eq!(both, expect_both);

    let mut positioned = Vec::new();
    registry.each_entity::<(Pos,), _>(|id, (pos,)| {
        pos.y += 1;
        positioned.push(id);
    });
    positioned.sort_by_key(|id| id.index());
    assert_eq!(positioned, expect_pos);

    // each visited every match exactly once
    for (_, (pos,)) in registry.view::<(Pos,)>() {
        assert_eq!(pos.y, 1);
    }
}
