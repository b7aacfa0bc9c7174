use crate::{
    body::{Body, Color},
    simulation::{Extent, Simulation, WorldParams},
};
use ultraviolet::Vec2;

/// Returns null when the extent or time step is invalid.
#[unsafe(no_mangle)]
pub extern "C" fn Simulation_Create(width: f32, height: f32, dt: f32) -> *mut Simulation {
    let params = WorldParams {
        dt,
        ..WorldParams::default()
    };
    let sim = Extent::new(width, height)
        .and_then(|extent| Simulation::with_bodies(Vec::new(), extent, params));
    match sim {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(e) => {
            log::warn!("Simulation_Create: {e}");
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Destroy(handle: *mut Simulation) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Step(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.step();
    }
}

/// Returns 0 on success, -1 on a null handle or invalid input.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Reset(handle: *mut Simulation, n: usize, seed: u64) -> i32 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return -1;
    };
    match sim.reset(n, seed) {
        Ok(()) => 0,
        Err(e) => {
            log::warn!("Simulation_Reset: {e}");
            -1
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_SetGravity(handle: *mut Simulation, gx: f32, gy: f32) -> i32 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return -1;
    };
    if !gx.is_finite() || !gy.is_finite() {
        return -1;
    }
    sim.params.gravity = Vec2::new(gx, gy);
    0
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetBodyCount(handle: *const Simulation) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |sim| sim.bodies.len())
}

/// Pointer to `Simulation_GetBodyCount` contiguous bodies, valid until the next mutating call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetBodies(handle: *const Simulation) -> *const Body {
    unsafe { handle.as_ref() }.map_or(std::ptr::null(), |sim| sim.bodies.as_ptr())
}

/// Returns 0 on success, -1 on a null handle, an invalid body or one wider than the world.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_AddBody(
    handle: *mut Simulation,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    density: f32,
    elasticity: f32,
    color: Color,
) -> i32 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return -1;
    };
    let body = Body::new(Vec2::new(x, y), Vec2::new(vx, vy), radius)
        .and_then(|b| b.with_density(density))
        .and_then(|b| b.with_elasticity(elasticity))
        .map(|b| b.with_color(color))
        .and_then(|b| sim.add_body(b));
    match body {
        Ok(()) => 0,
        Err(e) => {
            log::warn!("Simulation_AddBody: {e}");
            -1
        }
    }
}
