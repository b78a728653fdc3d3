#![allow(dead_code)]

use std::sync::Once;

use sparse_ecs::{freeze_components, register_component, EntityManager};

pub const AGENTS_SMALL: usize = 10_000;
pub const AGENTS_MED: usize = 100_000;
pub const AGENTS_LARGE: usize = 1_000_000;

#[derive(Clone, Copy)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

#[derive(Clone, Copy)]
pub struct Wealth {
    pub value: f32,
}

#[derive(Clone, Copy)]
pub struct Dormant;

static INIT: Once = Once::new();

pub fn init_components() {
    INIT.call_once(|| {
        register_component::<Position>();
        register_component::<Velocity>();
        register_component::<Wealth>();
        register_component::<Dormant>();
        freeze_components();
    });
}

/// Spawns `agent_count` entities carrying Position, Velocity, and Wealth;
/// every tenth one is also tagged Dormant.
pub fn populate(world: &mut EntityManager, agent_count: usize) {
    world.reserve_entities(agent_count);
    for i in 0..agent_count {
        let agent = world.spawn();
        world.attach(agent, Position { x: 0.0, y: 0.0 }).unwrap();
        world.attach(agent, Velocity { dx: 1.0, dy: 0.5 }).unwrap();
        world.attach(agent, Wealth { value: 100.0 }).unwrap();
        if i % 10 == 0 {
            world.attach(agent, Dormant).unwrap();
        }
    }
}
