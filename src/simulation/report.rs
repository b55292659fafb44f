//! Text output for headless runs

use super::experiment::Simulation;
use super::types::{Status, ROAD_LENGTH};

/// Character used for empty road in the strip
const ROAD_GLYPH: char = '.';

impl Simulation {
    /// Print a summary of the simulation state
    pub fn print_summary(&self) {
        let stats = self.stats();
        let vehicles = self.roadway().vehicles();
        let crashed = vehicles
            .iter()
            .filter(|v| v.status() == Status::Crashed)
            .count();

        println!("=== Highway Simulation Summary ===");
        println!("Ticks: {}, Time: {:.2}s", stats.ticks, stats.elapsed);
        println!("Vehicles on road: {} ({} crashed)", vehicles.len(), crashed);
        println!(
            "Spawned: {}, Left the road: {}, Crashes: {}, Recoveries: {}",
            stats.total_spawned, stats.total_removed, stats.total_crashes, stats.total_recoveries
        );

        if !vehicles.is_empty() {
            println!("--- Vehicles (front first) ---");
            for vehicle in vehicles.iter().rev() {
                println!(
                    "  Vehicle {}: position={:.1}, speed={:.2}/{:.2}, status={:?}",
                    vehicle.id(),
                    vehicle.position(),
                    vehicle.speed(),
                    vehicle.initial_speed(),
                    vehicle.status()
                );
            }
        }
    }

    /// Render the visible road as a single line of `width` characters.
    ///
    /// Each vehicle body is drawn with its status glyph; parts outside the
    /// visible road are dropped.
    pub fn render_road(&self, width: usize) -> String {
        let mut strip = vec![ROAD_GLYPH; width];
        if width == 0 {
            return String::new();
        }

        let to_col = |x: f32| (x / ROAD_LENGTH * width as f32).floor();

        for vehicle in self.roadway().vehicles() {
            if vehicle.front() <= 0.0 || vehicle.position() >= ROAD_LENGTH {
                continue;
            }
            let start = to_col(vehicle.position()).max(0.0);
            // Always cover at least one cell for a visible vehicle
            let end = to_col(vehicle.front()).min(width as f32 - 1.0).max(start);
            for col in start as usize..=end as usize {
                strip[col] = vehicle.status().glyph();
            }
        }

        strip.into_iter().collect()
    }

    /// Draw the road strip in the terminal
    pub fn draw_road(&self, width: usize) {
        println!("Legend: = constant, > accelerating, < slowing, X crashed");
        println!("|{}|", self.render_road(width));
    }
}
