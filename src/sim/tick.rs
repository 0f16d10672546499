//! Fixed-step simulation tick
//!
//! Core game loop that advances one frame deterministically. The stage order
//! below is part of the contract; tests replay against it.

use super::gate::Side;
use super::state::{GameState, SessionPhase};
use crate::consts::PASS_THROUGH_DEPTH;
use crate::perspective_scale;

/// Input for a single frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// One steer step this frame (key press, not key hold)
    pub steer: Option<Side>,
    /// Demo mode - steer toward the better side of the next gate
    pub autopilot: bool,
}

impl TickInput {
    pub fn steer(side: Side) -> Self {
        Self {
            steer: Some(side),
            ..Default::default()
        }
    }

    pub fn autopilot() -> Self {
        Self {
            autopilot: true,
            ..Default::default()
        }
    }
}

/// Depth advanced this frame by an entity at depth `z`: far things crawl,
/// near things rush past
#[inline]
pub fn scroll_delta(scroll_step: f32, z: f32) -> f32 {
    scroll_step * perspective_scale(z.max(0.0))
}

/// Advance the session by one frame. No-op once won or lost.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase.is_terminal() {
        return;
    }

    let steer = if input.autopilot {
        autopilot_steer(state)
    } else {
        input.steer
    };
    if let Some(side) = steer {
        state.crowd.steer(side.direction());
    }

    // Road scroll
    let step = state.tuning.scroll_step();
    for gate in &mut state.gates {
        gate.z += scroll_delta(step, gate.z);
    }
    for enemy in &mut state.enemies {
        enemy.pos.y += scroll_delta(step, enemy.pos.y);
    }
    for hazard in &mut state.hazards {
        hazard.pos.y += scroll_delta(step, hazard.pos.y);
    }

    run_spawns(state);

    // Crowd
    state.crowd.update_formation();
    if let Some(shot) = state.crowd.select_target_and_fire(&state.enemies) {
        state.projectiles.push(shot);
    }

    // Collisions against this frame's enemy snapshot. Partition entries index
    // into `state.enemies`, which must not be reordered or shrunk before prune.
    state.partition.rebuild(&state.enemies);
    for projectile in &mut state.projectiles {
        projectile.advance(&state.enemies);
        if let Some(id) = projectile.resolve_hit(&state.partition, &mut state.enemies) {
            log::debug!("Projectile hit enemy {:?}", id);
        }
    }

    for enemy in &mut state.enemies {
        enemy.seek(&mut state.crowd);
    }

    for hazard in &mut state.hazards {
        if let Some(lost) = hazard.resolve(&mut state.crowd) {
            log::info!(
                "Lava pit swallowed {} units ({} left)",
                lost,
                state.crowd.population()
            );
        }
    }

    let mut wave_released = false;
    for gate in &mut state.gates {
        if let Some(pass) = gate.resolve(&mut state.crowd, &mut state.rng) {
            state.gates_passed += 1;
            wave_released = true;
            log::info!(
                "Gate {}/{}: {:?} {} ({} -> {})",
                state.gates_passed,
                state.tuning.gates_needed,
                pass.side,
                pass.operation,
                pass.before,
                pass.after
            );
        }
    }
    if wave_released {
        state.activate_enemies();
    }

    prune(state);

    state.distance += state.tuning.scroll_speed;

    evaluate(state);
}

/// Timed spawns; each timer redraws its next due frame after firing
fn run_spawns(state: &mut GameState) {
    state.frame += 1;
    let frame = state.frame;

    if frame >= state.schedule.next_gate {
        state.spawn_gate();
        state.schedule.next_gate = frame + state.tuning.gate_interval.sample(&mut state.rng) as u64;
    }

    if frame >= state.schedule.next_enemy {
        state.spawn_wave();
        state.schedule.next_enemy =
            frame + state.tuning.enemy_interval.sample(&mut state.rng) as u64;
    }

    if state.level.hazards_enabled() && frame >= state.schedule.next_hazard {
        state.spawn_hazard();
        state.schedule.next_hazard =
            frame + state.tuning.hazard_interval.sample(&mut state.rng) as u64;
    }
}

/// Drop everything that is spent or behind the player
fn prune(state: &mut GameState) {
    state.gates.retain(|g| g.z < PASS_THROUGH_DEPTH);
    state
        .enemies
        .retain(|e| e.alive && e.depth() < PASS_THROUGH_DEPTH);
    state.projectiles.retain(|p| p.active);
    state
        .hazards
        .retain(|h| h.active && h.depth() < PASS_THROUGH_DEPTH);
}

fn evaluate(state: &mut GameState) {
    if state.crowd.is_empty() {
        state.phase = SessionPhase::Lost;
        log::info!(
            "Crowd wiped out on level {} after {} gates",
            state.level.number(),
            state.gates_passed
        );
    } else if state.gates_passed >= state.tuning.gates_needed {
        state.phase = SessionPhase::Won;
        log::info!(
            "Level {} cleared with {} survivors",
            state.level.number(),
            state.crowd.population()
        );
    }
}

/// Demo steering: look at the nearest unused gate ahead and move toward the
/// side whose operation leaves the bigger crowd
pub fn autopilot_steer(state: &GameState) -> Option<Side> {
    let lead = state.crowd.lead_depth()?;
    let gate = state
        .gates
        .iter()
        .filter(|g| !g.used && g.z < lead)
        .max_by(|a, b| a.z.partial_cmp(&b.z).unwrap_or(std::cmp::Ordering::Equal))?;

    let population = state.crowd.population();
    let left = gate.left.apply(population);
    let right = gate.right.apply(population);
    let want = match left.cmp(&right) {
        std::cmp::Ordering::Greater => Side::Left,
        std::cmp::Ordering::Less => Side::Right,
        std::cmp::Ordering::Equal => return None,
    };

    (Side::of(state.crowd.center_x()) != want).then_some(want)
}
