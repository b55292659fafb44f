//! The single-lane roadway
//!
//! Owns the vehicles in road order, rearmost first. Adjacency is index based:
//! the vehicle at `i` follows the one at `i + 1`.

use log::debug;
use ordered_float::OrderedFloat;
use rand::Rng;

use super::params::SimParams;
use super::types::{VehicleId, REMOVAL_THRESHOLD, SPAWN_CLEARANCE, SPEED_SCALE};
use super::vehicle::{StepOutcome, Vehicle, VehicleAttributes};

/// Summary of what changed on the road during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Vehicle created this tick, if any
    pub spawned: Option<VehicleId>,
    /// Number of vehicles that left the road
    pub removed: usize,
    /// Number of collisions detected
    pub crashes: usize,
    /// Number of vehicles that left the crashed state
    pub recoveries: usize,
}

#[derive(Debug, Default)]
pub struct Roadway {
    /// Ordered rear to front
    vehicles: Vec<Vehicle>,
    next_id: usize,
}

impl Roadway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vehicles in road order, rearmost first
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id() == id)
    }

    /// The front-most vehicle
    pub fn lead_mut(&mut self) -> Option<&mut Vehicle> {
        self.vehicles.last_mut()
    }

    /// Remove every vehicle
    pub fn clear(&mut self) {
        debug!("Clearing roadway ({} vehicles)", self.vehicles.len());
        self.vehicles.clear();
    }

    /// Whether a new vehicle has room to enter
    pub fn is_free(&self) -> bool {
        self.vehicles
            .iter()
            .map(|v| OrderedFloat(v.position()))
            .min()
            .is_none_or(|rearmost| rearmost.into_inner() > SPAWN_CLEARANCE)
    }

    /// Place a vehicle on the road, keeping position order
    pub fn add_vehicle(&mut self, attributes: &VehicleAttributes) -> VehicleId {
        let id = self.next_vehicle_id();
        let idx = self
            .vehicles
            .iter()
            .position(|v| v.position() > attributes.position)
            .unwrap_or(self.vehicles.len());
        self.vehicles.insert(idx, Vehicle::new(id, attributes));
        self.relink();
        id
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Point every vehicle at the one directly ahead of it
    fn relink(&mut self) {
        let count = self.vehicles.len();
        for (idx, vehicle) in self.vehicles.iter_mut().enumerate() {
            let ahead = (idx + 1 < count).then_some(idx + 1);
            vehicle.link_ahead(ahead);
        }
    }

    /// Advance every vehicle by one tick, then spawn and remove
    pub fn step<R: Rng>(
        &mut self,
        dt: f32,
        spawn_due: bool,
        params: &SimParams,
        rng: &mut R,
    ) -> TickReport {
        let mut report = TickReport::default();

        // Links must be complete before anyone steps
        self.relink();

        for idx in 0..self.vehicles.len() {
            let outcome = match self.vehicles[idx].ahead() {
                Some(ahead_idx) => {
                    let (rear, front) = self.vehicles.split_at_mut(ahead_idx);
                    rear[idx].step(dt, Some(&mut front[0]))
                }
                None => self.vehicles[idx].step(dt, None),
            };

            match outcome {
                StepOutcome::Crashed => {
                    report.crashes += 1;
                    let vehicle = &self.vehicles[idx];
                    debug!(
                        "Vehicle {} crashed at {:.2} into the vehicle ahead",
                        vehicle.id(),
                        vehicle.position()
                    );
                }
                StepOutcome::Recovered => {
                    report.recoveries += 1;
                    debug!("Vehicle {} recovered", self.vehicles[idx].id());
                }
                StepOutcome::Moved | StepOutcome::Held => {}
            }
        }

        if spawn_due && self.is_free() {
            report.spawned = Some(self.spawn(params, rng));
        }

        let before = self.vehicles.len();
        self.vehicles.retain(|v| v.position() < REMOVAL_THRESHOLD);
        report.removed = before - self.vehicles.len();
        if report.removed > 0 {
            debug!("{} vehicle(s) left the road", report.removed);
        }

        self.relink();
        report
    }

    /// Create a vehicle behind the visible road as the new rearmost
    fn spawn<R: Rng>(&mut self, params: &SimParams, rng: &mut R) -> VehicleId {
        let drawn = rng.random_range(params.min_speed..=params.max_speed);
        let attributes = VehicleAttributes::spawned(drawn / SPEED_SCALE, params.dynamics());
        let id = self.next_vehicle_id();
        self.vehicles.insert(0, Vehicle::new(id, &attributes));
        debug!(
            "Spawned vehicle {} with cruise speed {:.2}",
            id,
            attributes.initial_speed
        );
        id
    }
}
