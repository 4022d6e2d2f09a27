//! # Circular Orbits
//!
//! An [`Orbit`] is a fixed circle (radius, tilt, offset) plus one mutable
//! rotation angle. A [`TimedOrbit`] drives that angle from the simulation clock.
//!
//! A point in an orbit's local frame is carried into the parent frame by
//!
//! ```text
//! tilt_offset · rotate · radius · v
//! ```
//!
//! i.e. push the point `R` units along local x, revolve it about local z by the
//! current angle, then orient and shift the whole orbital plane.

use crate::transform;
use glam::{DMat4, DVec3, DVec4};

/// A circular orbit in its parent's frame.
///
/// `Clone` copies all matrices, so a clone never shares rotation state with
/// its source.
#[derive(Clone, Debug, PartialEq)]
pub struct Orbit {
    radius: DMat4,
    radius_inv: DMat4,
    rotate: DMat4,
    angle: f64,
    tilt_and_offset: DMat4,
    tilt_and_offset_inv: DMat4,
}

impl Orbit {
    /// Build an orbit from its centre offset, tilt (radians) and radius.
    ///
    /// The rotation starts at angle 0.
    pub fn new(offset: DVec3, tilt: DVec3, radius: f64) -> Self {
        let radius_mx = transform::radius_translation(radius);
        let tilt_and_offset = transform::tilt_and_offset(offset, tilt);
        Orbit {
            radius: radius_mx,
            // Rigid transforms are always invertible
            radius_inv: radius_mx.inverse(),
            rotate: transform::rotation_z(0.0),
            angle: 0.0,
            tilt_and_offset,
            tilt_and_offset_inv: tilt_and_offset.inverse(),
        }
    }

    /// Set the absolute rotation angle (radians) about the local z axis.
    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        self.rotate = transform::rotation_z(angle);
        self.angle = angle;
        self
    }

    /// Angle last passed to [`Orbit::rotate`].
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Local orbit frame to parent frame.
    pub fn transform(&self, v: DVec4) -> DVec4 {
        let v = self.radius * v;
        let v = self.rotate * v;
        self.tilt_and_offset * v
    }

    /// Parent frame to local orbit frame; exact inverse of [`Orbit::transform`].
    pub fn itransform(&self, v: DVec4) -> DVec4 {
        let v = self.tilt_and_offset_inv * v;
        // Pure rotation: inverse is the transpose
        let v = self.rotate.transpose() * v;
        self.radius_inv * v
    }
}

/// An [`Orbit`] whose angle is a function of simulation time.
///
/// After `set_time(t)` the angle is exactly `t * speed - phase_offset`; it is
/// recomputed from scratch on every call, never accumulated.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedOrbit {
    orbit: Orbit,
    speed: f64,
    phase_offset: f64,
}

impl TimedOrbit {
    /// Wrap `orbit`; the result is already in its `t = 0` state.
    pub fn new(mut orbit: Orbit, speed: f64, phase_offset: f64) -> Self {
        orbit.rotate(-phase_offset);
        TimedOrbit {
            orbit,
            speed,
            phase_offset,
        }
    }

    pub fn set_time(&mut self, time: f64) -> &mut Self {
        self.orbit.rotate(time * self.speed - self.phase_offset);
        self
    }

    /// Signed angular rate in radians per simulation year.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Phase offset in radians.
    pub fn phase_offset(&self) -> f64 {
        self.phase_offset
    }

    pub fn angle(&self) -> f64 {
        self.orbit.angle()
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    pub fn transform(&self, v: DVec4) -> DVec4 {
        self.orbit.transform(v)
    }

    pub fn itransform(&self, v: DVec4) -> DVec4 {
        self.orbit.itransform(v)
    }
}
